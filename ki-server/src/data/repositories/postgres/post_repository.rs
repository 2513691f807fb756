use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::data::post_repository::{Pagination, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostRecord};

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PostRow {
    #[sqlx(rename = "Id")]
    id: i64,
    #[sqlx(rename = "Title")]
    title: String,
    #[sqlx(rename = "IsPublished")]
    is_published: bool,
    #[sqlx(rename = "PublishedAt")]
    published_at: Option<DateTime<Utc>>,
    #[sqlx(rename = "ExpiresAt")]
    expires_at: Option<DateTime<Utc>>,
    #[sqlx(rename = "Content")]
    content: String,
    #[sqlx(rename = "IsCommentsEnabled")]
    is_comments_enabled: bool,
    #[sqlx(rename = "PublishedBy_id")]
    published_by: Uuid,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT "Id", "Title", "IsPublished", "PublishedAt", "ExpiresAt",
                   "Content", "IsCommentsEnabled", "PublishedBy_id"
            FROM "Posts"
            WHERE "Id" = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn list_published(
        &self,
        now: DateTime<Utc>,
        pagination: Pagination,
    ) -> Result<Vec<Post>, DomainError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT "Id", "Title", "IsPublished", "PublishedAt", "ExpiresAt",
                   "Content", "IsCommentsEnabled", "PublishedBy_id"
            FROM "Posts"
            WHERE "IsPublished"
              AND ("PublishedAt" IS NULL OR "PublishedAt" <= $1)
              AND ("ExpiresAt" IS NULL OR "ExpiresAt" > $1)
            ORDER BY "PublishedAt" DESC NULLS LAST, "Id" DESC
            LIMIT $2
            OFFSET $3
            "#,
        )
        .bind(now)
        .bind(i64::from(pagination.limit))
        .bind(i64::from(pagination.offset))
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_post).collect()
    }

    async fn total_published(&self, now: DateTime<Utc>) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM "Posts"
            WHERE "IsPublished"
              AND ("PublishedAt" IS NULL OR "PublishedAt" <= $1)
              AND ("ExpiresAt" IS NULL OR "ExpiresAt" > $1)
            "#,
        )
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)
    }
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    Post::new(PostRecord {
        id: row.id,
        title: row.title,
        is_published: row.is_published,
        published_at: row.published_at,
        expires_at: row.expires_at,
        content: row.content,
        is_comments_enabled: row.is_comments_enabled,
        published_by: row.published_by,
    })
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    DomainError::Unexpected(err.to_string())
}
