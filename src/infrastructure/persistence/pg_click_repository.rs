//! PostgreSQL implementation of the click access log.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::NewClick;
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// PostgreSQL repository for click records.
///
/// `link_clicks.link_id` carries `ON DELETE CASCADE`, so deleting a link
/// removes its history here without a second statement.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record(&self, new_click: NewClick) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO link_clicks (link_id, ip, user_agent, referer) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(new_click.link_id)
        .bind(new_click.ip)
        .bind(new_click.user_agent)
        .bind(new_click.referer)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}
