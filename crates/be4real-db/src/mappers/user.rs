//! User model -> entity mapper

use be4real_core::{LoginMethod, Snowflake, User};

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            login_method: LoginMethod::from_str_lossy(&model.login_method),
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            verified: model.verified,
            verification_code: model.verification_code,
            followers: model.followers.max(0),
            following: model.following.max(0),
            reactions_received: model.reactions_received.max(0),
            created_at: model.created_at,
        }
    }
}
