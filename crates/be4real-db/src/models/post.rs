//! Post database model

use be4real_core::ReactionCounts;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

/// Database model for posts table
#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: i64,
    pub author_id: i64,
    pub image_data: String,
    /// JSONB `{label: count}`
    pub reactions: Json<ReactionCounts>,
    pub created_at: DateTime<Utc>,
}
