//! PostgreSQL implementation of ReactionRepository
//!
//! Every ledger write runs in one transaction that first locks the post row.
//! Lock order is always posts -> reactions -> users, so concurrent
//! transitions on the same post queue up instead of deadlocking. Repairs take
//! the same post lock, or only the owner row, and recount after locking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{Executor, PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use be4real_core::{
    Reaction, ReactionCounts, ReactionLabel, ReactionRepository, RepoResult, Snowflake,
};

use crate::models::{ReactionModel, ReactionTally};

use super::error::{map_db_error, post_not_found, user_not_found};

type Tx = Transaction<'static, Postgres>;

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> RepoResult<Tx> {
        self.pool.begin().await.map_err(map_db_error)
    }
}

/// Lock the post row and read its aggregate
async fn lock_counts(tx: &mut Tx, post_id: Snowflake) -> RepoResult<ReactionCounts> {
    let counts = sqlx::query_scalar::<_, Json<ReactionCounts>>(
        "SELECT reactions FROM posts WHERE id = $1 FOR NO KEY UPDATE",
    )
    .bind(post_id.into_inner())
    .fetch_optional(&mut **tx)
    .await
    .map_err(map_db_error)?
    .ok_or_else(|| post_not_found(post_id))?;

    Ok(counts.0)
}

async fn write_counts(tx: &mut Tx, post_id: Snowflake, counts: &ReactionCounts) -> RepoResult<()> {
    sqlx::query("UPDATE posts SET reactions = $2 WHERE id = $1")
        .bind(post_id.into_inner())
        .bind(Json(counts))
        .execute(&mut **tx)
        .await
        .map_err(map_db_error)?;
    Ok(())
}

/// Move the owner's received counter by `delta`, never below zero
async fn bump_received(tx: &mut Tx, owner_id: Snowflake, delta: i64) -> RepoResult<()> {
    sqlx::query(
        "UPDATE users SET reactions_received = GREATEST(reactions_received + $2, 0) WHERE id = $1",
    )
    .bind(owner_id.into_inner())
    .bind(delta)
    .execute(&mut **tx)
    .await
    .map_err(map_db_error)?;
    Ok(())
}

/// Lock the owner row and read the stored counter
async fn lock_received(tx: &mut Tx, owner_id: Snowflake) -> RepoResult<i64> {
    sqlx::query_scalar::<_, i64>(
        "SELECT reactions_received FROM users WHERE id = $1 FOR NO KEY UPDATE",
    )
    .bind(owner_id.into_inner())
    .fetch_optional(&mut **tx)
    .await
    .map_err(map_db_error)?
    .ok_or_else(|| user_not_found(owner_id))
}

async fn tally_post<'e, E>(executor: E, post_id: Snowflake) -> RepoResult<ReactionCounts>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, ReactionTally>(
        r"
        SELECT label, COUNT(*) AS count
        FROM reactions
        WHERE post_id = $1
        GROUP BY label
        ",
    )
    .bind(post_id.into_inner())
    .fetch_all(executor)
    .await
    .map_err(map_db_error)?;

    Ok(rows.into_iter().map(|r| (r.label, r.count)).collect())
}

async fn tally_received<'e, E>(executor: E, owner_id: Snowflake) -> RepoResult<i64>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar::<_, i64>(
        r"
        SELECT COUNT(*)
        FROM reactions r
        JOIN posts p ON p.id = r.post_id
        WHERE p.author_id = $1
        ",
    )
    .bind(owner_id.into_inner())
    .fetch_one(executor)
    .await
    .map_err(map_db_error)
}

async fn rollback(tx: Tx) -> RepoResult<bool> {
    tx.rollback().await.map_err(map_db_error)?;
    Ok(false)
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn find(&self, post_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Reaction>> {
        let result = sqlx::query_as::<_, ReactionModel>(
            r"
            SELECT id, post_id, user_id, label, created_at
            FROM reactions
            WHERE post_id = $1 AND user_id = $2
            ",
        )
        .bind(post_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Reaction::try_from).transpose()
    }

    #[instrument(skip(self, reaction), fields(post_id = %reaction.post_id, user_id = %reaction.user_id, label = %reaction.label))]
    async fn insert(&self, reaction: &Reaction, owner_id: Snowflake) -> RepoResult<bool> {
        let mut tx = self.begin().await?;
        let mut counts = lock_counts(&mut tx, reaction.post_id).await?;

        let inserted = sqlx::query(
            r"
            INSERT INTO reactions (id, post_id, user_id, label, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (post_id, user_id) DO NOTHING
            ",
        )
        .bind(reaction.id.into_inner())
        .bind(reaction.post_id.into_inner())
        .bind(reaction.user_id.into_inner())
        .bind(reaction.label.as_str())
        .bind(reaction.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected()
            == 1;

        if !inserted {
            debug!("reaction already present");
            return rollback(tx).await;
        }

        counts.increment(&reaction.label);
        write_counts(&mut tx, reaction.post_id, &counts).await?;
        bump_received(&mut tx, owner_id, 1).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(true)
    }

    #[instrument(skip(self, label), fields(label = %label))]
    async fn delete_if_label(
        &self,
        post_id: Snowflake,
        user_id: Snowflake,
        label: &ReactionLabel,
        owner_id: Snowflake,
    ) -> RepoResult<bool> {
        let mut tx = self.begin().await?;
        let mut counts = lock_counts(&mut tx, post_id).await?;

        let deleted = sqlx::query(
            "DELETE FROM reactions WHERE post_id = $1 AND user_id = $2 AND label = $3",
        )
        .bind(post_id.into_inner())
        .bind(user_id.into_inner())
        .bind(label.as_str())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected()
            == 1;

        if !deleted {
            debug!("reaction changed or vanished");
            return rollback(tx).await;
        }

        counts.decrement(label);
        write_counts(&mut tx, post_id, &counts).await?;
        bump_received(&mut tx, owner_id, -1).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(true)
    }

    #[instrument(skip(self, from, to), fields(from = %from, to = %to))]
    async fn switch_label(
        &self,
        post_id: Snowflake,
        user_id: Snowflake,
        from: &ReactionLabel,
        to: &ReactionLabel,
        at: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let mut tx = self.begin().await?;
        let mut counts = lock_counts(&mut tx, post_id).await?;

        let updated = sqlx::query(
            r"
            UPDATE reactions SET label = $4, created_at = $5
            WHERE post_id = $1 AND user_id = $2 AND label = $3
            ",
        )
        .bind(post_id.into_inner())
        .bind(user_id.into_inner())
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected()
            == 1;

        if !updated {
            debug!("reaction changed or vanished");
            return rollback(tx).await;
        }

        counts.switch(from, to);
        write_counts(&mut tx, post_id, &counts).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn count_by_label(&self, post_id: Snowflake) -> RepoResult<ReactionCounts> {
        tally_post(&self.pool, post_id).await
    }

    #[instrument(skip(self))]
    async fn count_received(&self, owner_id: Snowflake) -> RepoResult<i64> {
        tally_received(&self.pool, owner_id).await
    }

    #[instrument(skip(self))]
    async fn repair_post_counts(&self, post_id: Snowflake) -> RepoResult<bool> {
        let mut tx = self.begin().await?;
        let stored = lock_counts(&mut tx, post_id).await?;
        let counts = tally_post(&mut *tx, post_id).await?;

        if stored == counts {
            return rollback(tx).await;
        }

        write_counts(&mut tx, post_id, &counts).await?;
        tx.commit().await.map_err(map_db_error)?;
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn repair_received(&self, owner_id: Snowflake) -> RepoResult<bool> {
        // inserts and deletes commit only after updating this row, so every
        // transition is either counted below or applied on top of our write
        let mut tx = self.begin().await?;
        let stored = lock_received(&mut tx, owner_id).await?;
        let received = tally_received(&mut *tx, owner_id).await?;

        if stored == received {
            return rollback(tx).await;
        }

        sqlx::query("UPDATE users SET reactions_received = $2 WHERE id = $1")
            .bind(owner_id.into_inner())
            .bind(received)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(true)
    }
}
