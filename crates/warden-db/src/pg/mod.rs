//! PostgreSQL repository implementations

mod api_key;
mod user;

pub use api_key::PgApiKeyRepository;
pub use user::PgUserRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub users: PgUserRepository,
    pub api_keys: PgApiKeyRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            api_keys: PgApiKeyRepository::new(pool),
        }
    }
}
