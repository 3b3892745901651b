//! Application state

use std::sync::Arc;

use warden_auth_core::AuthService;
use warden_db::pg::{PgApiKeyRepository, PgUserRepository, Repositories};
use warden_db::DbPool;

use crate::config::Config;

/// Type alias for the auth service with concrete repository types
pub type AuthServiceImpl = AuthService<PgUserRepository, PgApiKeyRepository>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Login, registration, bearer validation and API-key admission
    pub auth: Arc<AuthServiceImpl>,
    /// Database connection pool (health checks)
    pub pool: DbPool,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Build state over a pool. Fails if the auth config is rejected.
    pub fn new(pool: DbPool, config: Config) -> Result<Self, warden_auth_core::AuthError> {
        let repos = Repositories::new(pool.clone());
        let auth = AuthService::new(
            config.auth.clone(),
            Arc::new(repos.users),
            Arc::new(repos.api_keys),
        )?;

        Ok(Self {
            auth: Arc::new(auth),
            pool,
            config: Arc::new(config),
        })
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}
