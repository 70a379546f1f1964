//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! IDs are serialized as strings for JavaScript compatibility.

use be4real_core::ReactionCounts;
use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Auth Responses
// ============================================================================

/// Issued access token
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

// ============================================================================
// User Responses
// ============================================================================

/// Public profile, visible to anyone
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    /// Owned posts, oldest first
    pub post_ids: Vec<String>,
    pub followers: i64,
    pub following: i64,
    pub reactions_received: i64,
}

/// The authenticated user's own account
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub followers: i64,
    pub following: i64,
    pub reactions_received: i64,
}

// ============================================================================
// Post Responses
// ============================================================================

/// Post response
#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub image_data: String,
    pub reactions: ReactionCounts,
    pub created_at: DateTime<Utc>,
    /// The viewer's own reaction, when a viewer is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_reaction: Option<String>,
}

/// One window of the feed, newest first
#[derive(Debug, Clone, Serialize)]
pub struct FeedPage {
    pub count: usize,
    pub posts: Vec<PostResponse>,
}

impl FeedPage {
    pub fn new(posts: Vec<PostResponse>) -> Self {
        Self {
            count: posts.len(),
            posts,
        }
    }
}

// ============================================================================
// Reaction Responses
// ============================================================================

/// Which ledger transition a reaction request performed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ReactionOutcome {
    Added { label: String },
    Removed { label: String },
    Updated { previous: String, label: String },
}

impl ReactionOutcome {
    /// Envelope message for the transition
    pub fn message(&self) -> &'static str {
        match self {
            Self::Added { .. } => "Reaction added",
            Self::Removed { .. } => "Reaction removed",
            Self::Updated { .. } => "Reaction updated",
        }
    }
}

// ============================================================================
// Maintenance Responses
// ============================================================================

/// Result of a reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub posts_checked: u64,
    pub posts_repaired: u64,
    pub users_repaired: u64,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.posts_repaired == 0 && self.users_repaired == 0
    }
}

// ============================================================================
// Health Check Responses
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    /// `None` means the store is in-process and always available
    pub fn ready(database_healthy: Option<bool>) -> Self {
        let (ready, database) = match database_healthy {
            Some(true) => (true, "healthy"),
            Some(false) => (false, "unhealthy"),
            None => (true, "in_memory"),
        };
        Self {
            status: if ready { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: database.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
