//! PostgreSQL API key repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{DbError, DbResult};
use crate::models::ApiKeyRow;
use crate::repo::{ApiKeyRepository, CreateApiKey};

/// PostgreSQL API key repository
#[derive(Clone)]
pub struct PgApiKeyRepository {
    pool: PgPool,
}

impl PgApiKeyRepository {
    /// Create a new API key repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyRepository for PgApiKeyRepository {
    async fn list(&self) -> DbResult<Vec<ApiKeyRow>> {
        let keys = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            SELECT id, value, application, created_at
            FROM api_keys
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(keys)
    }

    async fn create(&self, key: CreateApiKey) -> DbResult<ApiKeyRow> {
        let row = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            INSERT INTO api_keys (id, value, application)
            VALUES ($1, $2, $3)
            RETURNING id, value, application, created_at
            "#,
        )
        .bind(key.id)
        .bind(&key.value)
        .bind(&key.application)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from_write)?;

        Ok(row)
    }
}
