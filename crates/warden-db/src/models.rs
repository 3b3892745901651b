//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use warden_types::{ApiKey, ApiKeyId, Application, StoredCredential, UserId};

use crate::error::DbError;

/// User row from the database
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for StoredCredential {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: UserId(row.id),
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

/// API key row from the database
#[derive(Debug, Clone, FromRow)]
pub struct ApiKeyRow {
    pub id: Uuid,
    pub value: String,
    pub application: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ApiKeyRow> for ApiKey {
    type Error = DbError;

    fn try_from(row: ApiKeyRow) -> Result<Self, Self::Error> {
        let application: Application = row
            .application
            .parse()
            .map_err(|e: warden_types::UnknownApplication| DbError::InvalidRow(e.to_string()))?;

        Ok(Self {
            id: ApiKeyId(row.id),
            value: row.value,
            application,
            created_at: row.created_at,
        })
    }
}
