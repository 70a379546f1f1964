//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use be4real_common::AccessToken;
use be4real_core::{Post, Snowflake, User};

use super::responses::{CurrentUserResponse, PostResponse, ProfileResponse, TokenResponse};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for CurrentUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            verified: user.verified,
            created_at: user.created_at,
            followers: user.followers,
            following: user.following,
            reactions_received: user.reactions_received,
        }
    }
}

impl From<User> for CurrentUserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl ProfileResponse {
    /// Public view of a user together with the ids of their posts
    pub fn new(user: &User, post_ids: &[Snowflake]) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            created_at: user.created_at,
            post_ids: post_ids.iter().map(ToString::to_string).collect(),
            followers: user.followers,
            following: user.following,
            reactions_received: user.reactions_received,
        }
    }
}

// ============================================================================
// Post Mappers
// ============================================================================

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id.to_string(),
            author_id: post.author_id.to_string(),
            image_data: post.image_data,
            reactions: post.reactions,
            created_at: post.created_at,
            my_reaction: None,
        }
    }
}

impl PostResponse {
    pub fn with_my_reaction(mut self, label: Option<String>) -> Self {
        self.my_reaction = label;
        self
    }
}

// ============================================================================
// Token Mappers
// ============================================================================

impl From<AccessToken> for TokenResponse {
    fn from(token: AccessToken) -> Self {
        Self {
            token: token.token,
            token_type: token.token_type,
            expires_in: token.expires_in,
        }
    }
}
