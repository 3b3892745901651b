//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Unique constraint violated (e.g. e-mail already registered)
    #[error("record already exists")]
    Conflict,

    /// Row holds a value the domain model cannot represent
    #[error("invalid row: {0}")]
    InvalidRow(String),
}

impl DbError {
    /// Map a write error, turning unique violations into [`DbError::Conflict`]
    pub fn from_write(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => Self::Conflict,
            _ => Self::Sqlx(err),
        }
    }
}

/// Result alias for repository operations
pub type DbResult<T> = Result<T, DbError>;
