//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in be4real-core.

mod error;
mod post;
mod reaction;
mod user;

pub use post::PgPostRepository;
pub use reaction::PgReactionRepository;
pub use user::PgUserRepository;
