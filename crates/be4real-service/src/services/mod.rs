//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod auth;
pub mod context;
pub mod error;
pub mod feed;
pub mod post;
pub mod reaction;
pub mod reconcile;
pub mod user;

// Re-export all services for convenience
pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder, DEFAULT_MAX_IMAGE_BYTES};
pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use feed::{parse_limit, FeedService, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
pub use post::{parse_post_id, PostService};
pub use reaction::{ReactionService, MAX_LEDGER_ATTEMPTS};
pub use reconcile::ReconcileService;
pub use user::UserService;
