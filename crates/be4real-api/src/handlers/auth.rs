//! Authentication handlers
//!
//! Registration, email verification codes, login and password reset.

use axum::extract::State;
use be4real_service::{
    AuthService, CurrentUserResponse, LoginRequest, RegisterRequest, ResetPasswordRequest,
    SendVerificationRequest, TokenResponse, VerifyUserRequest,
};

use crate::extractors::JsonBody;
use crate::response::{ApiResponse, ApiResult, Created};
use crate::state::AppState;

/// Register a new user
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> ApiResult<Created<ApiResponse<CurrentUserResponse>>> {
    let service = AuthService::new(state.service_context());
    let user = service.register(request).await?;
    Ok(Created(ApiResponse::new("User created", user)))
}

/// Issue a fresh verification code
///
/// POST /api/auth/send-verification
pub async fn send_verification(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SendVerificationRequest>,
) -> ApiResult<ApiResponse<()>> {
    let service = AuthService::new(state.service_context());
    service.send_verification(request).await?;
    Ok(ApiResponse::message("New verification code sent"))
}

/// Verify an account and log in
///
/// POST /api/auth/verify-user
pub async fn verify_user(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<VerifyUserRequest>,
) -> ApiResult<ApiResponse<TokenResponse>> {
    let service = AuthService::new(state.service_context());
    let token = service.verify(request).await?;
    Ok(ApiResponse::new("User verified", token))
}

/// Login with email and password
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<ApiResponse<TokenResponse>> {
    let service = AuthService::new(state.service_context());
    let token = service.login(request).await?;
    Ok(ApiResponse::new("Log in successful", token))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ResetPasswordRequest>,
) -> ApiResult<ApiResponse<()>> {
    let service = AuthService::new(state.service_context());
    service.reset_password(request).await?;
    Ok(ApiResponse::message("Password reset"))
}
