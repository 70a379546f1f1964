//! Database models - SQLx-compatible structs for PostgreSQL tables

mod post;
mod reaction;
mod user;

pub use post::PostModel;
pub use reaction::{ReactionModel, ReactionTally};
pub use user::UserModel;
