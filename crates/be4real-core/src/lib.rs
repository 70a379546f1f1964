//! # be4real-core
//!
//! Domain layer containing entities, value objects, and repository traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{LoginMethod, Post, Reaction, User};
pub use error::DomainError;
pub use traits::{
    FeedCursor, FeedDirection, FeedQuery, PostRepository, ReactionRepository, RepoResult,
    UserRepository,
};
pub use value_objects::{
    ReactionCounts, ReactionLabel, Snowflake, SnowflakeGenerator, SnowflakeParseError,
};
