//! Configuration types for auth service

use std::time::Duration;

use crate::crypto::{Secret, SecretPolicy};
use crate::error::WeakSecretError;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Host identity of this service, used as both token issuer and audience
    pub host: String,
    /// HMAC secret for signing access tokens
    pub jwt_secret: Secret,
    /// Access token lifetime
    pub token_ttl: Duration,
    /// bcrypt cost factor
    pub bcrypt_cost: u32,
    /// Minimum-entropy rule applied to `jwt_secret`
    pub secret_policy: SecretPolicy,
}

impl AuthConfig {
    /// Default access token lifetime
    pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

    /// Create a new auth config without checking the secret
    pub fn new(host: impl Into<String>, jwt_secret: impl AsRef<[u8]>) -> Self {
        Self {
            host: host.into(),
            jwt_secret: Secret::new(jwt_secret),
            token_ttl: Self::DEFAULT_TOKEN_TTL,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            secret_policy: SecretPolicy::default(),
        }
    }

    /// Create a new auth config, rejecting a weak secret up front
    pub fn try_new(
        host: impl Into<String>,
        jwt_secret: impl AsRef<[u8]>,
    ) -> Result<Self, WeakSecretError> {
        let config = Self::new(host, jwt_secret);
        config.check_secret()?;
        Ok(config)
    }

    /// Run the secret policy against the configured secret
    pub fn check_secret(&self) -> Result<(), WeakSecretError> {
        self.secret_policy.validate(self.jwt_secret.as_bytes())
    }

    /// Issuer placed in and expected from tokens
    pub fn issuer(&self) -> &str {
        &self.host
    }

    /// Audience placed in and expected from tokens
    pub fn audience(&self) -> Vec<String> {
        vec![self.host.clone()]
    }

    /// Set access token lifetime
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Set bcrypt cost
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Set the secret policy
    pub fn with_secret_policy(mut self, policy: SecretPolicy) -> Self {
        self.secret_policy = policy;
        self
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("host", &self.host)
            .field("jwt_secret", &self.jwt_secret)
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("secret_policy", &self.secret_policy)
            .finish()
    }
}
