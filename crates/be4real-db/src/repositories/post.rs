//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use be4real_core::{
    FeedDirection, FeedQuery, Post, PostRepository, RepoResult, Snowflake,
};

use crate::models::PostModel;

use super::error::map_db_error;

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(
            r"
            SELECT id, author_id, image_data, reactions, created_at
            FROM posts
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Post::from))
    }

    #[instrument(skip(self, post), fields(post_id = %post.id, author_id = %post.author_id))]
    async fn create(&self, post: &Post) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO posts (id, author_id, image_data, reactions, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(post.id.into_inner())
        .bind(post.author_id.into_inner())
        .bind(&post.image_data)
        .bind(Json(&post.reactions))
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_page(&self, query: FeedQuery) -> RepoResult<Vec<Post>> {
        let limit = query.limit.max(1);

        let results = match query.cursor {
            Some(cursor) => {
                let sql = match cursor.direction {
                    FeedDirection::Before => {
                        r"
                        SELECT id, author_id, image_data, reactions, created_at
                        FROM posts
                        WHERE (created_at, id) < ($1, $2)
                        ORDER BY created_at DESC, id DESC
                        LIMIT $3
                        "
                    }
                    FeedDirection::After => {
                        r"
                        SELECT id, author_id, image_data, reactions, created_at
                        FROM posts
                        WHERE (created_at, id) > ($1, $2)
                        ORDER BY created_at DESC, id DESC
                        LIMIT $3
                        "
                    }
                };
                sqlx::query_as::<_, PostModel>(sql)
                    .bind(cursor.created_at)
                    .bind(cursor.id.into_inner())
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query_as::<_, PostModel>(
                    r"
                    SELECT id, author_id, image_data, reactions, created_at
                    FROM posts
                    ORDER BY created_at DESC, id DESC
                    LIMIT $1
                    ",
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Post::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_ids_by_author(&self, author_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r"
            SELECT id FROM posts
            WHERE author_id = $1
            ORDER BY created_at, id
            ",
        )
        .bind(author_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn find_ids_after(
        &self,
        after: Option<Snowflake>,
        limit: i64,
    ) -> RepoResult<Vec<Snowflake>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r"
            SELECT id FROM posts
            WHERE ($1::BIGINT IS NULL OR id > $1)
            ORDER BY id
            LIMIT $2
            ",
        )
        .bind(after.map(Snowflake::into_inner))
        .bind(limit.max(1))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids.into_iter().map(Snowflake::new).collect())
    }
}
