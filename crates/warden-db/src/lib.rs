//! Warden DB - Database abstractions
//!
//! SQLx-based storage for users and provisioned API keys. The auth core only
//! depends on the traits in [`repo`]; the PostgreSQL implementations live in
//! [`pg`].
//!
//! # Example
//!
//! ```rust,ignore
//! use warden_db::{create_pool, Repositories, UserRepository};
//!
//! let pool = create_pool("postgres://localhost/warden").await?;
//! let repos = Repositories::new(pool);
//!
//! let user = repos.users.find_by_email("user@example.com").await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, ping, DbPool};
pub use repo::*;
