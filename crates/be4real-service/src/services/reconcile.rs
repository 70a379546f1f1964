//! Reconciliation service
//!
//! Recomputes denormalized counters from the reaction rows: each post's
//! aggregate and each user's `reactions_received`. The rows are the source
//! of truth. Each repair recounts and writes while holding the lock ledger
//! writes take, so a pass can overlap live traffic without losing a write.

use be4real_core::Snowflake;
use tracing::{info, instrument, warn};

use crate::dto::ReconcileReport;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Ids fetched per repository round trip
const BATCH_SIZE: i64 = 500;

/// Reconciliation service
pub struct ReconcileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReconcileService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Rebuild one post's aggregate; true if it had drifted
    #[instrument(skip(self))]
    pub async fn reconcile_post(&self, post_id: Snowflake) -> ServiceResult<bool> {
        let repaired = self.ctx.reaction_repo().repair_post_counts(post_id).await?;
        if repaired {
            warn!(post_id = %post_id, "Post reaction counts repaired");
        }
        Ok(repaired)
    }

    /// Rebuild one user's received counter; true if it had drifted
    #[instrument(skip(self))]
    pub async fn reconcile_user(&self, user_id: Snowflake) -> ServiceResult<bool> {
        let repaired = self.ctx.reaction_repo().repair_received(user_id).await?;
        if repaired {
            warn!(user_id = %user_id, "Received reaction count repaired");
        }
        Ok(repaired)
    }

    /// Check every post, then every user
    #[instrument(skip(self))]
    pub async fn reconcile_all(&self) -> ServiceResult<ReconcileReport> {
        let mut report = ReconcileReport::default();

        let mut after = None;
        loop {
            let ids = self.ctx.post_repo().find_ids_after(after, BATCH_SIZE).await?;
            let Some(last) = ids.last().copied() else { break };
            for id in ids {
                report.posts_checked += 1;
                if self.reconcile_post(id).await? {
                    report.posts_repaired += 1;
                }
            }
            after = Some(last);
        }

        let mut after = None;
        loop {
            let ids = self.ctx.user_repo().find_ids_after(after, BATCH_SIZE).await?;
            let Some(last) = ids.last().copied() else { break };
            for id in ids {
                if self.reconcile_user(id).await? {
                    report.users_repaired += 1;
                }
            }
            after = Some(last);
        }

        info!(
            posts_checked = report.posts_checked,
            posts_repaired = report.posts_repaired,
            users_repaired = report.users_repaired,
            "Reconciliation finished"
        );

        Ok(report)
    }
}
