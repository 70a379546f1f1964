//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation (PostgreSQL in production, an in-memory store
//! in tests).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Post, Reaction, User};
use crate::error::DomainError;
use crate::value_objects::{ReactionCounts, ReactionLabel, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find user by (normalized) email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Find user by exact username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Create a new user; duplicate email or username is a conflict error
    async fn create(&self, user: &User) -> RepoResult<()>;

    /// Replace the pending verification code
    async fn set_verification_code(&self, id: Snowflake, code: &str) -> RepoResult<()>;

    /// Mark the account verified and clear its code
    async fn mark_verified(&self, id: Snowflake) -> RepoResult<()>;

    /// Set a new password hash if `(email, code)` matches, clearing the code.
    /// Returns false when nothing matched.
    async fn reset_password(&self, email: &str, code: &str, password_hash: &str)
        -> RepoResult<bool>;

    /// User ids in ascending order, for batch jobs
    async fn find_ids_after(&self, after: Option<Snowflake>, limit: i64)
        -> RepoResult<Vec<Snowflake>>;
}

// ============================================================================
// Post Repository
// ============================================================================

/// Which side of the pivot a feed page lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedDirection {
    /// Strictly older than the pivot
    Before,
    /// Strictly newer than the pivot
    After,
}

/// Resolved pivot position in the feed ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedCursor {
    pub direction: FeedDirection,
    pub created_at: DateTime<Utc>,
    pub id: Snowflake,
}

impl FeedCursor {
    pub fn from_post(direction: FeedDirection, pivot: &Post) -> Self {
        Self {
            direction,
            created_at: pivot.created_at,
            id: pivot.id,
        }
    }

    /// Whether a post with the given ordering key lies on the cursor's side
    pub fn admits(&self, created_at: DateTime<Utc>, id: Snowflake) -> bool {
        let key = (created_at, id);
        let pivot = (self.created_at, self.id);
        match self.direction {
            FeedDirection::Before => key < pivot,
            FeedDirection::After => key > pivot,
        }
    }
}

/// Window query over the feed; results are always newest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedQuery {
    pub cursor: Option<FeedCursor>,
    pub limit: i64,
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find post by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>>;

    /// Create a new post
    async fn create(&self, post: &Post) -> RepoResult<()>;

    /// Fetch up to `query.limit` posts on the cursor's side of the pivot,
    /// ordered by `(created_at, id)` descending
    async fn find_page(&self, query: FeedQuery) -> RepoResult<Vec<Post>>;

    /// Ids of a user's posts, oldest first
    async fn find_ids_by_author(&self, author_id: Snowflake) -> RepoResult<Vec<Snowflake>>;

    /// Post ids in ascending order, for batch jobs
    async fn find_ids_after(&self, after: Option<Snowflake>, limit: i64)
        -> RepoResult<Vec<Snowflake>>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

/// Ledger primitives. Each write is conditional and applies the reaction row
/// change, the post aggregate change and the owner counter change atomically.
/// A `false` return means the precondition no longer held and nothing changed.
#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Current reaction of a user on a post
    async fn find(&self, post_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Reaction>>;

    /// Insert if the user has no reaction on the post; bumps the aggregate and
    /// the owner's counter.
    async fn insert(&self, reaction: &Reaction, owner_id: Snowflake) -> RepoResult<bool>;

    /// Delete if the stored label is still `label`; decrements the aggregate
    /// (removing it at zero) and the owner's counter (floored at zero).
    async fn delete_if_label(
        &self,
        post_id: Snowflake,
        user_id: Snowflake,
        label: &ReactionLabel,
        owner_id: Snowflake,
    ) -> RepoResult<bool>;

    /// Relabel in place if the stored label is still `from`; moves one count
    /// from `from` to `to` and sets the timestamp to `at`.
    async fn switch_label(
        &self,
        post_id: Snowflake,
        user_id: Snowflake,
        from: &ReactionLabel,
        to: &ReactionLabel,
        at: DateTime<Utc>,
    ) -> RepoResult<bool>;

    /// Aggregate recomputed from the reaction rows of a post
    async fn count_by_label(&self, post_id: Snowflake) -> RepoResult<ReactionCounts>;

    /// Number of live reactions on all posts authored by `owner_id`
    async fn count_received(&self, owner_id: Snowflake) -> RepoResult<i64>;

    /// Recount a post's aggregate from its rows and store it, holding the
    /// post lock ledger writes take first. Returns true if it had drifted.
    async fn repair_post_counts(&self, post_id: Snowflake) -> RepoResult<bool>;

    /// Recount the owner's received counter and store it, holding the owner
    /// row lock that inserts and deletes take. Returns true if it had drifted.
    async fn repair_received(&self, owner_id: Snowflake) -> RepoResult<bool>;
}
