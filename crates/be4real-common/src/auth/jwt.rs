//! JWT utilities for authentication
//!
//! HS256 access tokens bound to a fixed issuer and audience. There is no
//! refresh flow; a token simply expires.

use be4real_core::Snowflake;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Get the user ID as a Snowflake
    ///
    /// # Errors
    /// Returns `InvalidToken` if the subject is not a valid id
    pub fn user_id(&self) -> Result<Snowflake, AppError> {
        Snowflake::parse(&self.sub).map_err(|_| AppError::InvalidToken)
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Issued access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// JWT service for issuing and resolving credentials
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_secs: i64,
}

impl JwtService {
    pub const ISSUER: &'static str = "Be4Real";
    pub const AUDIENCE: &'static str = "users";

    #[must_use]
    pub fn new(secret: &str, expiry_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_secs,
        }
    }

    /// Issue an access token for a user
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue(&self, user_id: Snowflake) -> Result<AccessToken, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iss: Self::ISSUER.to_string(),
            aud: Self::AUDIENCE.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.expiry_secs)).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode JWT: {e}")))?;

        Ok(AccessToken {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.expiry_secs,
        })
    }

    /// Decode and validate a token: signature, expiry, issuer and audience
    ///
    /// # Errors
    /// `TokenExpired` for expired tokens, `InvalidToken` for anything else
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[Self::ISSUER]);
        validation.set_audience(&[Self::AUDIENCE]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })
    }

    /// Resolve a bearer credential to the user it was issued for
    ///
    /// # Errors
    /// Returns an authentication error if the token is invalid or expired
    pub fn resolve(&self, token: &str) -> Result<Snowflake, AppError> {
        self.decode_token(token)?.user_id()
    }

    pub fn expiry_secs(&self) -> i64 {
        self.expiry_secs
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiry_secs", &self.expiry_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIX_WEEKS: i64 = 6 * 7 * 24 * 60 * 60;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret-key-that-is-long-enough", SIX_WEEKS)
    }

    #[test]
    fn test_issue_and_resolve() {
        let service = create_test_service();
        let user_id = Snowflake::new(12345);

        let token = service.issue(user_id).unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, SIX_WEEKS);

        assert_eq!(service.resolve(&token.token).unwrap(), user_id);
    }

    #[test]
    fn test_claims_carry_issuer_and_audience() {
        let service = create_test_service();
        let token = service.issue(Snowflake::new(7)).unwrap();
        let claims = service.decode_token(&token.token).unwrap();

        assert_eq!(claims.iss, "Be4Real");
        assert_eq!(claims.aud, "users");
        assert!(!claims.is_expired());
        assert!(claims.exp - claims.iat == SIX_WEEKS);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = create_test_service();
        let other = JwtService::new("a-completely-different-secret-value", SIX_WEEKS);
        let token = issuer.issue(Snowflake::new(1)).unwrap();

        assert!(matches!(other.resolve(&token.token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_wrong_audience_is_rejected() {
        let service = create_test_service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "1".to_string(),
            iss: JwtService::ISSUER.to_string(),
            aud: "admins".to_string(),
            iat: now,
            exp: now + 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret-key-that-is-long-enough"),
        )
        .unwrap();

        assert!(service.resolve(&token).is_err());
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::new("test-secret-key-that-is-long-enough", -120);
        let token = service.issue(Snowflake::new(1)).unwrap();

        assert!(matches!(service.resolve(&token.token), Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();
        let result = service.decode_token("invalid.token.here");
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }
}
