//! Request DTOs for API endpoints
//!
//! Body DTOs implement `Deserialize`, [`Normalize`] and `Validate`. Services
//! run [`prepare`] on them before touching any repository.

use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::services::{ServiceError, ServiceResult};

/// Canonical form of user input, applied before validation
pub trait Normalize {
    #[must_use]
    fn normalize(self) -> Self;
}

/// Normalize then validate a request body
///
/// # Errors
/// `ServiceError::Validation` carrying the first field message
pub fn prepare<T: Normalize + Validate>(request: T) -> ServiceResult<T> {
    let request = request.normalize();
    request.validate().map_err(validation_error)?;
    Ok(request)
}

fn validation_error(errors: ValidationErrors) -> ServiceError {
    let message = errors
        .field_errors()
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(ToString::to_string))
        .unwrap_or_else(|| "Invalid fields".to_string());
    ServiceError::validation(message)
}

fn normalize_email(email: String) -> String {
    email.trim().to_lowercase()
}

// ============================================================================
// Auth Requests
// ============================================================================

/// User registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 256, message = "Password must be 8-256 characters"))]
    pub password: String,
}

impl Normalize for RegisterRequest {
    fn normalize(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            email: normalize_email(self.email),
            password: self.password.trim().to_string(),
        }
    }
}

/// Request a fresh verification code
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendVerificationRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

impl Normalize for SendVerificationRequest {
    fn normalize(self) -> Self {
        Self {
            email: normalize_email(self.email),
        }
    }
}

/// Submit a verification code
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(equal = 6, message = "Verification code must be 6 characters"))]
    pub code: String,
}

impl Normalize for VerifyUserRequest {
    fn normalize(self) -> Self {
        Self {
            email: normalize_email(self.email),
            code: self.code.trim().to_string(),
        }
    }
}

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 256, message = "Password must be 8-256 characters"))]
    pub password: String,
}

impl Normalize for LoginRequest {
    fn normalize(self) -> Self {
        Self {
            email: normalize_email(self.email),
            password: self.password.trim().to_string(),
        }
    }
}

/// Replace a password using a verification code
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(rename = "newPassword", alias = "new_password")]
    #[validate(length(min = 8, max = 256, message = "Password must be 8-256 characters"))]
    pub new_password: String,

    #[validate(length(equal = 6, message = "Verification code must be 6 characters"))]
    pub code: String,
}

impl Normalize for ResetPasswordRequest {
    fn normalize(self) -> Self {
        Self {
            email: normalize_email(self.email),
            new_password: self.new_password.trim().to_string(),
            code: self.code.trim().to_string(),
        }
    }
}

// ============================================================================
// Post Requests
// ============================================================================

/// Create post request; the image is base64, optionally as a data URL
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[serde(rename = "imgData", alias = "img_data")]
    #[validate(length(min = 1, message = "Missing image data"))]
    pub img_data: String,
}

impl Normalize for CreatePostRequest {
    fn normalize(self) -> Self {
        Self {
            img_data: self.img_data.trim().to_string(),
        }
    }
}

/// React to a post; the label is checked by the ledger
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReactRequest {
    pub reaction: Option<String>,
}

/// Raw feed query parameters, parsed by the pager
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedRequest {
    pub before: Option<String>,
    pub after: Option<String>,
    pub limit: Option<String>,
}
