//! Route definitions
//!
//! API routes are mounted under /api; health probes sit at the root.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{auth, health, posts, users};
use crate::state::AppState;

/// Create the API router (health routes are added separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api", api_routes())
}

/// Health check routes, kept outside rate limiting
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(post_routes())
        .merge(user_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/send-verification", post(auth::send_verification))
        .route("/auth/resend-verification", post(auth::send_verification))
        .route("/auth/verify-user", post(auth::verify_user))
        .route("/auth/login", post(auth::login))
        .route("/auth/reset-password", post(auth::reset_password))
}

/// Post routes; static segments win over `:post_id`
fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/post/make-post", post(posts::make_post))
        .route("/post/feed", get(posts::get_feed))
        .route("/post/react/:post_id", post(posts::react))
        .route("/post/:post_id", get(posts::get_post))
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/me", get(users::get_current_user))
        .route("/user/:identifier", get(users::get_profile))
}
