//! User entity - represents a be4real account

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// How the account authenticates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoginMethod {
    #[default]
    Password,
    Google,
}

impl LoginMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Google => "google",
        }
    }

    /// Parse the stored representation, falling back to `Password`
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "google" => Self::Google,
            _ => Self::Password,
        }
    }
}

/// User entity
///
/// Created unverified at registration. `reactions_received` is only moved by
/// the reaction ledger (and the reconciliation job).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub login_method: LoginMethod,
    pub username: String,
    pub email: String,
    /// None for federated accounts
    pub password_hash: Option<String>,
    pub verified: bool,
    pub verification_code: Option<String>,
    pub followers: i64,
    pub following: i64,
    pub reactions_received: i64,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new unverified password-login user
    pub fn new(id: Snowflake, username: String, email: String, password_hash: String) -> Self {
        Self {
            id,
            login_method: LoginMethod::Password,
            username,
            email,
            password_hash: Some(password_hash),
            verified: false,
            verification_code: None,
            followers: 0,
            following: 0,
            reactions_received: 0,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn uses_password(&self) -> bool {
        self.login_method == LoginMethod::Password
    }

    /// Check a submitted verification code against the stored one
    pub fn code_matches(&self, code: &str) -> bool {
        self.verification_code.as_deref() == Some(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new(
            Snowflake::new(1),
            "alice".to_string(),
            "alice@example.com".to_string(),
            "$argon2id$hash".to_string(),
        )
    }

    #[test]
    fn test_new_user_is_unverified() {
        let user = test_user();
        assert!(!user.verified);
        assert!(user.uses_password());
        assert_eq!(user.reactions_received, 0);
        assert!(user.verification_code.is_none());
    }

    #[test]
    fn test_code_matches() {
        let mut user = test_user();
        assert!(!user.code_matches("123456"));

        user.verification_code = Some("123456".to_string());
        assert!(user.code_matches("123456"));
        assert!(!user.code_matches("654321"));
    }

    #[test]
    fn test_login_method_round_trip() {
        assert_eq!(LoginMethod::from_str_lossy("google"), LoginMethod::Google);
        assert_eq!(LoginMethod::from_str_lossy("password"), LoginMethod::Password);
        assert_eq!(LoginMethod::from_str_lossy("unknown"), LoginMethod::Password);
        assert_eq!(LoginMethod::Google.as_str(), "google");
    }
}
