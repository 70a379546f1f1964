//! Test fixtures and data generators
//!
//! Request bodies and the envelope/response shapes the tests read back.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique suffix, also unique across runs against the same database
pub fn unique_suffix() -> String {
    let run = chrono::Utc::now().timestamp_millis() % 1_000_000_000;
    format!("{run}x{}", COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// Smallest valid image payload
pub const TEST_IMAGE: &str = "data:image/png;base64,aGVsbG8=";

/// Registration request
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            username: format!("u{suffix}"),
            email: format!("test{suffix}@example.com"),
            password: "TestPass123!".to_string(),
        }
    }
}

/// Login request
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VerifyUserRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct CreatePostRequest {
    #[serde(rename = "imgData")]
    pub img_data: String,
}

impl Default for CreatePostRequest {
    fn default() -> Self {
        Self {
            img_data: TEST_IMAGE.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReactRequest {
    pub reaction: String,
}

impl ReactRequest {
    pub fn new(label: &str) -> Self {
        Self {
            reaction: label.to_string(),
        }
    }
}

/// Response envelope
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

/// Error envelope
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub status: String,
    pub message: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
}

/// Current user response
#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub verified: bool,
    pub reactions_received: i64,
}

#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub post_ids: Vec<String>,
    pub reactions_received: i64,
}

#[derive(Debug, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub reactions: std::collections::BTreeMap<String, i64>,
    pub my_reaction: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedPage {
    pub count: usize,
    pub posts: Vec<PostResponse>,
}

impl FeedPage {
    pub fn ids(&self) -> Vec<String> {
        self.posts.iter().map(|p| p.id.clone()).collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct ReactionOutcome {
    pub result: String,
    pub label: String,
    pub previous: Option<String>,
}
