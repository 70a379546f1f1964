//! Post handlers
//!
//! Post creation, the paged feed, single posts and reactions.

use axum::extract::{Path, State};
use be4real_service::{
    CreatePostRequest, FeedPage, FeedRequest, FeedService, PostResponse, PostService,
    ReactRequest, ReactionOutcome, ReactionService,
};

use crate::extractors::{AuthUser, JsonBody, OptionalAuthUser, OptionalJsonBody, QueryParams};
use crate::response::{ApiResponse, ApiResult, Created};
use crate::state::AppState;

/// Create a post for the authenticated user
///
/// POST /api/post/make-post
pub async fn make_post(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(request): JsonBody<CreatePostRequest>,
) -> ApiResult<Created<ApiResponse<PostResponse>>> {
    let service = PostService::new(state.service_context());
    let post = service.create_post(auth.user_id, request).await?;
    Ok(Created(ApiResponse::new("Post created", post)))
}

/// Page through posts, newest first
///
/// GET /api/post/feed?before=&after=&limit=
pub async fn get_feed(
    State(state): State<AppState>,
    QueryParams(request): QueryParams<FeedRequest>,
) -> ApiResult<ApiResponse<FeedPage>> {
    let service = FeedService::new(state.service_context());
    let page = service.get_page(request).await?;
    Ok(ApiResponse::new("Feed retrieved", page))
}

/// Get a single post
///
/// GET /api/post/:post_id
pub async fn get_post(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(post_id): Path<String>,
) -> ApiResult<ApiResponse<PostResponse>> {
    let service = PostService::new(state.service_context());
    let post = service.get_post(&post_id, viewer.user_id()).await?;
    Ok(ApiResponse::new("Post retrieved", post))
}

/// Add, remove or switch the caller's reaction
///
/// POST /api/post/react/:post_id
pub async fn react(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(post_id): Path<String>,
    OptionalJsonBody(request): OptionalJsonBody<ReactRequest>,
) -> ApiResult<ApiResponse<ReactionOutcome>> {
    let service = ReactionService::new(state.service_context());
    let outcome = service.react(&post_id, auth.user_id, request).await?;
    Ok(ApiResponse::new(outcome.message(), outcome))
}
