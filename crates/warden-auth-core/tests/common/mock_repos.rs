//! Mock repositories for testing

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;
use warden_db::{
    ApiKeyRepository, ApiKeyRow, CreateApiKey, CreateUser, DbError, DbResult, UserRepository,
    UserRow,
};

/// In-memory user repository for testing
#[derive(Default, Clone)]
pub struct MockUserRepository {
    by_email: Arc<DashMap<String, UserRow>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user with a password hashed at the cheapest bcrypt cost
    #[allow(dead_code)]
    pub fn insert_user(&self, email: &str, password: &str) -> UserRow {
        let row = UserRow {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: bcrypt::hash(password, 4).unwrap(),
            created_at: Utc::now(),
        };
        self.by_email.insert(row.email.clone(), row.clone());
        row
    }

    /// Insert a user whose stored hash is taken as-is
    #[allow(dead_code)]
    pub fn insert_with_hash(&self, email: &str, password_hash: &str) -> UserRow {
        let row = UserRow {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        self.by_email.insert(row.email.clone(), row.clone());
        row
    }

    #[allow(dead_code)]
    pub fn count(&self) -> usize {
        self.by_email.len()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        Ok(self.by_email.get(email).map(|r| r.value().clone()))
    }

    async fn create(&self, user: CreateUser) -> DbResult<UserRow> {
        let row = UserRow {
            id: user.id,
            email: user.email.clone(),
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };

        match self.by_email.entry(user.email) {
            Entry::Occupied(_) => Err(DbError::Conflict),
            Entry::Vacant(slot) => {
                slot.insert(row.clone());
                Ok(row)
            }
        }
    }
}

/// In-memory API key repository for testing
#[derive(Default, Clone)]
pub struct MockApiKeyRepository {
    keys: Arc<DashMap<Uuid, ApiKeyRow>>,
}

impl MockApiKeyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a key and return its value
    #[allow(dead_code)]
    pub fn provision(&self, application: &str) -> String {
        let row = ApiKeyRow {
            id: Uuid::new_v4(),
            value: Uuid::new_v4().to_string(),
            application: application.to_string(),
            created_at: Utc::now(),
        };
        let value = row.value.clone();
        self.keys.insert(row.id, row);
        value
    }

    /// Remove a key by value
    #[allow(dead_code)]
    pub fn revoke(&self, value: &str) {
        self.keys.retain(|_, row| row.value != value);
    }
}

#[async_trait]
impl ApiKeyRepository for MockApiKeyRepository {
    async fn list(&self) -> DbResult<Vec<ApiKeyRow>> {
        Ok(self.keys.iter().map(|r| r.value().clone()).collect())
    }

    async fn create(&self, key: CreateApiKey) -> DbResult<ApiKeyRow> {
        let row = ApiKeyRow {
            id: key.id,
            value: key.value,
            application: key.application,
            created_at: Utc::now(),
        };
        self.keys.insert(row.id, row.clone());
        Ok(row)
    }
}

/// Repository whose every call fails, standing in for an unreachable database
#[derive(Default, Clone, Copy)]
pub struct FailingRepository;

fn unavailable<T>() -> DbResult<T> {
    Err(DbError::InvalidRow("store unavailable".to_string()))
}

#[async_trait]
impl UserRepository for FailingRepository {
    async fn find_by_email(&self, _: &str) -> DbResult<Option<UserRow>> {
        unavailable()
    }

    async fn create(&self, _: CreateUser) -> DbResult<UserRow> {
        unavailable()
    }
}

#[async_trait]
impl ApiKeyRepository for FailingRepository {
    async fn list(&self) -> DbResult<Vec<ApiKeyRow>> {
        unavailable()
    }

    async fn create(&self, _: CreateApiKey) -> DbResult<ApiKeyRow> {
        unavailable()
    }
}
