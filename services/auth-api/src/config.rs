//! Configuration for the Auth API service.

use std::time::Duration;
use warden_auth_core::AuthConfig;

/// bcrypt accepts costs in this range
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Auth API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Database URL
    pub database_url: String,

    /// Auth core configuration
    pub auth: AuthConfig,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        // Database
        let database_url = required("DATABASE_URL")?;

        // Server
        let http_port = parse_or(&lookup, "HTTP_PORT", 8080)?;
        let request_timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;

        // Token identity and signing
        let host = required("SERVER_HOST")?;
        if host.trim().is_empty() {
            return Err(ConfigError::Invalid("SERVER_HOST"));
        }
        let jwt_secret = required("JWT_SECRET")?;
        let token_ttl_secs: u64 = parse_or(&lookup, "JWT_TTL_SECS", 3600)?;
        if token_ttl_secs == 0 {
            return Err(ConfigError::Invalid("JWT_TTL_SECS"));
        }

        // Password hashing
        let bcrypt_cost: u32 = parse_or(&lookup, "BCRYPT_COST", 12)?;
        if !BCRYPT_COST_RANGE.contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid("BCRYPT_COST"));
        }

        // Build auth config, refusing to start with a weak secret
        let auth = AuthConfig::try_new(host, jwt_secret.as_bytes())
            .map_err(|e| ConfigError::AuthConfig(e.to_string()))?
            .with_token_ttl(Duration::from_secs(token_ttl_secs))
            .with_bcrypt_cost(bcrypt_cost);

        Ok(Self {
            http_port,
            database_url,
            auth,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Auth config error: {0}")]
    AuthConfig(String),
}
