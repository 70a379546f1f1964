//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub login_method: String,
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub verified: bool,
    pub verification_code: Option<String>,
    pub followers: i64,
    pub following: i64,
    pub reactions_received: i64,
    pub created_at: DateTime<Utc>,
}
