//! Mailer profile repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use docmail_core::error::{AppError, ErrorKind};
use docmail_core::result::AppResult;
use docmail_core::types::UserMailerId;
use docmail_entity::mailer::UserMailer;

use crate::store::MailerStore;

/// Repository for mailer profiles.
#[derive(Debug, Clone)]
pub struct UserMailerRepository {
    pool: PgPool,
}

impl UserMailerRepository {
    /// Create a new mailer repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MailerStore for UserMailerRepository {
    async fn find_by_id(&self, id: UserMailerId) -> AppResult<Option<UserMailer>> {
        sqlx::query_as::<_, UserMailer>("SELECT * FROM user_mailers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find mailer", e))
    }

    async fn find_default(&self) -> AppResult<Option<UserMailer>> {
        sqlx::query_as::<_, UserMailer>(
            "SELECT * FROM user_mailers WHERE is_default AND enabled ORDER BY id LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find default mailer", e)
        })
    }
}
