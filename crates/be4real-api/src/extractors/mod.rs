//! Axum extractors for request handling
//!
//! Bearer authentication, plus JSON bodies and query strings that reject
//! with the error envelope.

mod auth;
mod body;
mod query;

pub use auth::{AuthUser, OptionalAuthUser};
pub use body::{JsonBody, OptionalJsonBody};
pub use query::QueryParams;
