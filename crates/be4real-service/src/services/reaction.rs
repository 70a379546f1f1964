//! Reaction service
//!
//! The reaction ledger: at most one reaction per (post, user). Reacting with
//! the current label removes it, reacting with another label switches it.
//!
//! Each transition is a single conditional repository call that also moves
//! the post aggregate and the owner's counter. When the condition no longer
//! holds another request got there first, so the ledger reads again and
//! re-plans, a bounded number of times.

use be4real_core::{DomainError, Reaction, ReactionLabel, Snowflake};
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::dto::{ReactRequest, ReactionOutcome};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::post::parse_post_id;

/// Plans tried before a contended reaction reports a conflict
pub const MAX_LEDGER_ATTEMPTS: u32 = 3;

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Handle a react request with a raw post id from the route
    pub async fn react(
        &self,
        post_id: &str,
        user_id: Snowflake,
        request: ReactRequest,
    ) -> ServiceResult<ReactionOutcome> {
        let post_id = parse_post_id(post_id)?;
        let label = request
            .reaction
            .ok_or_else(|| ServiceError::validation("Missing reaction"))?;
        self.apply_reaction(post_id, user_id, &label).await
    }

    /// Add, remove or switch the user's reaction on a post
    #[instrument(skip(self))]
    pub async fn apply_reaction(
        &self,
        post_id: Snowflake,
        user_id: Snowflake,
        label: &str,
    ) -> ServiceResult<ReactionOutcome> {
        let label = ReactionLabel::parse(label)?;

        let post = self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", post_id.to_string()))?;
        let owner_id = post.author_id;

        for attempt in 1..=MAX_LEDGER_ATTEMPTS {
            if let Some(outcome) = self.try_transition(post_id, user_id, owner_id, &label).await? {
                info!(
                    post_id = %post_id,
                    user_id = %user_id,
                    label = %label,
                    outcome = outcome.message(),
                    "Reaction applied"
                );
                return Ok(outcome);
            }
            debug!(attempt, "Reaction changed underneath, re-planning");
        }

        warn!(post_id = %post_id, user_id = %user_id, "Reaction stayed contended");
        Err(DomainError::ReactionConflict.into())
    }

    /// Read the current state and attempt the matching transition once.
    /// `None` means the precondition was lost.
    async fn try_transition(
        &self,
        post_id: Snowflake,
        user_id: Snowflake,
        owner_id: Snowflake,
        label: &ReactionLabel,
    ) -> ServiceResult<Option<ReactionOutcome>> {
        let repo = self.ctx.reaction_repo();

        let outcome = match repo.find(post_id, user_id).await? {
            None => {
                let reaction =
                    Reaction::new(self.ctx.generate_id(), post_id, user_id, label.clone());
                repo.insert(&reaction, owner_id).await?.then(|| ReactionOutcome::Added {
                    label: label.to_string(),
                })
            }
            Some(existing) if existing.has_label(label) => repo
                .delete_if_label(post_id, user_id, label, owner_id)
                .await?
                .then(|| ReactionOutcome::Removed {
                    label: label.to_string(),
                }),
            Some(existing) => repo
                .switch_label(post_id, user_id, &existing.label, label, Utc::now())
                .await?
                .then(|| ReactionOutcome::Updated {
                    previous: existing.label.to_string(),
                    label: label.to_string(),
                }),
        };

        Ok(outcome)
    }

    /// The user's current label on a post, if any
    #[instrument(skip(self))]
    pub async fn get_user_reaction(
        &self,
        post_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Option<ReactionLabel>> {
        let reaction = self.ctx.reaction_repo().find(post_id, user_id).await?;
        Ok(reaction.map(|r| r.label))
    }
}
