//! Repository traits
//!
//! Define async repository interfaces for database operations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::*;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>>;

    /// Create a new user
    ///
    /// Returns [`DbError::Conflict`](crate::DbError::Conflict) if the e-mail is
    /// already registered.
    async fn create(&self, user: CreateUser) -> DbResult<UserRow>;
}

/// Create user input
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

/// API key repository trait
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    /// List every currently provisioned key
    async fn list(&self) -> DbResult<Vec<ApiKeyRow>>;

    /// Create a new API key
    async fn create(&self, key: CreateApiKey) -> DbResult<ApiKeyRow>;
}

/// Create API key input
#[derive(Debug, Clone)]
pub struct CreateApiKey {
    pub id: Uuid,
    pub value: String,
    pub application: String,
}
