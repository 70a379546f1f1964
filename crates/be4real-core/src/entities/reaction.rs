//! Reaction entity - one user's reaction on one post

use chrono::{DateTime, Utc};

use crate::value_objects::{ReactionLabel, Snowflake};

/// Reaction entity
///
/// At most one exists per (post, user). Switching labels updates the row in
/// place and refreshes `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub id: Snowflake,
    pub post_id: Snowflake,
    pub user_id: Snowflake,
    pub label: ReactionLabel,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    /// Create a new Reaction
    pub fn new(id: Snowflake, post_id: Snowflake, user_id: Snowflake, label: ReactionLabel) -> Self {
        Self {
            id,
            post_id,
            user_id,
            label,
            created_at: Utc::now(),
        }
    }

    /// Check if reaction carries a specific label
    #[inline]
    pub fn has_label(&self, label: &ReactionLabel) -> bool {
        &self.label == label
    }
}
