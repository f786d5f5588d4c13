//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str =
    "id, code, url, is_active, click_count, created_by, expires_at, created_at, last_accessed_at";

/// PostgreSQL repository for link storage and retrieval.
///
/// The `links.code` unique index is the arbiter of code uniqueness: inserts
/// racing on the same code resolve to exactly one winner at the database,
/// and the loser surfaces as [`AppError::CodeAlreadyExists`].
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert_if_absent(&self, new_link: NewLink) -> Result<Link, AppError> {
        // Single statement: the uniqueness check is the constraint itself,
        // not a preceding SELECT.
        let link = sqlx::query_as::<_, Link>(&format!(
            "INSERT INTO links (code, url, created_by, expires_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {LINK_COLUMNS}"
        ))
        .bind(&new_link.code)
        .bind(&new_link.url)
        .bind(new_link.created_by)
        .bind(new_link.expires_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let link = sqlx::query_as::<_, Link>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        let link =
            sqlx::query_as::<_, Link>(&format!("SELECT {LINK_COLUMNS} FROM links WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(link)
    }

    async fn increment_click_and_touch(&self, link_id: i64) -> Result<(), AppError> {
        // Storage-level increment; never read-modify-write in the application.
        sqlx::query(
            "UPDATE links \
             SET click_count = click_count + 1, last_accessed_at = NOW() \
             WHERE id = $1",
        )
        .bind(link_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn update(&self, code: &str, patch: LinkPatch) -> Result<Link, AppError> {
        let set_expiry = patch.expires_at.is_some();
        let expires_at = patch.expires_at.flatten();

        let link = sqlx::query_as::<_, Link>(&format!(
            "UPDATE links SET \
               url = COALESCE($2, url), \
               is_active = COALESCE($3, is_active), \
               expires_at = CASE WHEN $4 THEN $5 ELSE expires_at END \
             WHERE code = $1 \
             RETURNING {LINK_COLUMNS}"
        ))
        .bind(code)
        .bind(patch.url)
        .bind(patch.is_active)
        .bind(set_expiry)
        .bind(expires_at)
        .fetch_optional(self.pool.as_ref())
        .await?;

        link.ok_or(AppError::LinkNotFound)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::LinkNotFound);
        }

        Ok(())
    }

    async fn list(
        &self,
        page: i64,
        per_page: i64,
        created_by: Option<i64>,
    ) -> Result<Vec<Link>, AppError> {
        let offset = (page - 1) * per_page;

        let links = sqlx::query_as::<_, Link>(&format!(
            "SELECT {LINK_COLUMNS} FROM links \
             WHERE ($1::bigint IS NULL OR created_by = $1) \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        ))
        .bind(created_by)
        .bind(per_page)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(links)
    }

    async fn count(&self, created_by: Option<i64>) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM links WHERE ($1::bigint IS NULL OR created_by = $1)",
        )
        .bind(created_by)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }
}
