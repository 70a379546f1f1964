//! Repository traits (ports)

mod repositories;

pub use repositories::{
    FeedCursor, FeedDirection, FeedQuery, PostRepository, ReactionRepository, RepoResult,
    UserRepository,
};
