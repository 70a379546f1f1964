//! Reaction database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for reactions table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

/// Per-label count (from GROUP BY)
#[derive(Debug, Clone, FromRow)]
pub struct ReactionTally {
    pub label: String,
    pub count: i64,
}
