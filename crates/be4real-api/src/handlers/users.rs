//! User handlers

use axum::extract::{Path, State};
use be4real_service::{CurrentUserResponse, ProfileResponse, UserService};

use crate::extractors::AuthUser;
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Get current user
///
/// GET /api/user/me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<CurrentUserResponse>> {
    let service = UserService::new(state.service_context());
    let user = service.get_current_user(auth.user_id).await?;
    Ok(ApiResponse::new("User retrieved", user))
}

/// Public profile by user id, post id or username
///
/// GET /api/user/:identifier
pub async fn get_profile(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> ApiResult<ApiResponse<ProfileResponse>> {
    let service = UserService::new(state.service_context());
    let profile = service.get_profile(&identifier).await?;
    Ok(ApiResponse::new("User retrieved", profile))
}
