//! JSON body extractor
//!
//! Same as `axum::Json`, but rejections use the error envelope. Field rules
//! are checked by the services, not here.

use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::response::ApiError;

fn reject(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(e) => ApiError::invalid_body(e.body_text()),
        JsonRejection::JsonSyntaxError(_) => ApiError::invalid_body("Malformed JSON body"),
        JsonRejection::MissingJsonContentType(_) => ApiError::invalid_body("Expected a JSON body"),
        _ => ApiError::invalid_body("Invalid request body"),
    }
}

#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(reject)?;
        Ok(JsonBody(value))
    }
}

/// Like [`JsonBody`], but an empty body yields `T::default()`
#[derive(Debug, Clone)]
pub struct OptionalJsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for OptionalJsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::invalid_body("Invalid request body"))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(OptionalJsonBody(T::default()));
        }

        let Json(value) = Json::<T>::from_bytes(&bytes).map_err(reject)?;
        Ok(OptionalJsonBody(value))
    }
}
