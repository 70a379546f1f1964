//! User service
//!
//! Public profiles and the current user's account.

use be4real_core::{Snowflake, User};
use tracing::instrument;

use crate::dto::{CurrentUserResponse, ProfileResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve an identifier as a user id, then a post id (its author), then
    /// a username
    async fn resolve(&self, identifier: &str) -> ServiceResult<Option<User>> {
        if let Ok(id) = Snowflake::parse(identifier) {
            if let Some(user) = self.ctx.user_repo().find_by_id(id).await? {
                return Ok(Some(user));
            }
            if let Some(post) = self.ctx.post_repo().find_by_id(id).await? {
                if let Some(author) = self.ctx.user_repo().find_by_id(post.author_id).await? {
                    return Ok(Some(author));
                }
            }
        }

        Ok(self.ctx.user_repo().find_by_username(identifier).await?)
    }

    /// Public profile for a user id, post id or username
    #[instrument(skip(self))]
    pub async fn get_profile(&self, identifier: &str) -> ServiceResult<ProfileResponse> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ServiceError::validation("Missing user identifier"));
        }

        let user = self
            .resolve(identifier)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", identifier))?;

        let post_ids = self.ctx.post_repo().find_ids_by_author(user.id).await?;

        Ok(ProfileResponse::new(&user, &post_ids))
    }

    /// The authenticated user's own account
    #[instrument(skip(self))]
    pub async fn get_current_user(&self, user_id: Snowflake) -> ServiceResult<CurrentUserResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        Ok(CurrentUserResponse::from(user))
    }
}
