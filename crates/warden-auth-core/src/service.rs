//! Auth service - ties together login, registration, bearer validation and
//! API-key admission

use std::sync::Arc;

use warden_db::{ApiKeyRepository, CreateUser, UserRepository};
use warden_types::{ApiKey, Credentials, StoredCredential, UserId, UserProfile};

use crate::{
    api_key::ApiKeyGate,
    clock::{Clock, SystemClock},
    config::AuthConfig,
    error::AdmissionError,
    login::{validate_credentials, LoginFlow},
    password::CredentialVerifier,
    token::{Claims, TokenValidator},
    AuthError,
};

/// Authentication service
///
/// Provides unified interface for:
/// - Login (credentials to access token)
/// - Registration
/// - Bearer token validation
/// - API-key admission
pub struct AuthService<U: UserRepository, K: ApiKeyRepository> {
    config: AuthConfig,
    login_flow: LoginFlow,
    validator: TokenValidator,
    verifier: CredentialVerifier,
    gate: ApiKeyGate,
    clock: Arc<dyn Clock>,
    user_repo: Arc<U>,
    api_key_repo: Arc<K>,
}

impl<U: UserRepository, K: ApiKeyRepository> AuthService<U, K> {
    /// Create a new auth service.
    ///
    /// Fails if the configured secret does not pass the secret policy, so a
    /// weak secret stops startup instead of surfacing on the first login.
    pub fn new(
        config: AuthConfig,
        user_repo: Arc<U>,
        api_key_repo: Arc<K>,
    ) -> Result<Self, AuthError> {
        config
            .check_secret()
            .map_err(|e| AuthError::Configuration(e.to_string()))?;

        Ok(Self {
            login_flow: LoginFlow::from_config(&config),
            validator: TokenValidator::new(config.secret_policy),
            verifier: CredentialVerifier::new(config.bcrypt_cost),
            gate: ApiKeyGate,
            clock: Arc::new(SystemClock),
            user_repo,
            api_key_repo,
            config,
        })
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Auth configuration
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    // =========================================================================
    // Credentials
    // =========================================================================

    /// Exchange credentials for a signed access token
    pub async fn login(&self, credentials: &Credentials) -> Result<String, AuthError> {
        let token = self
            .login_flow
            .login(
                credentials,
                self.user_repo.as_ref(),
                &self.config,
                self.clock.now(),
            )
            .await?;
        Ok(token)
    }

    /// Register a new user
    ///
    /// Returns [`AuthError::Conflict`] if the e-mail is already registered.
    pub async fn register(&self, credentials: &Credentials) -> Result<UserProfile, AuthError> {
        validate_credentials(credentials)?;

        let verifier = self.verifier;
        let password = credentials.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || verifier.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("password hashing aborted: {e}")))??;

        let row = self
            .user_repo
            .create(CreateUser {
                id: UserId::new().0,
                email: credentials.email.clone(),
                password_hash,
            })
            .await?;

        let stored = StoredCredential::from(row);
        tracing::info!(user_id = %stored.user_id, "User registered");

        Ok(stored.profile())
    }

    // =========================================================================
    // Request Authentication
    // =========================================================================

    /// Validate a bearer token issued by this service
    pub fn validate_bearer(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.validator.validate(
            token,
            self.config.issuer(),
            &self.config.audience(),
            self.config.jwt_secret.as_bytes(),
            self.clock.now(),
        )?;
        Ok(claims)
    }

    /// Admit a request by its API key.
    ///
    /// The key listing is fetched on every call. Rows naming an unknown
    /// application are skipped rather than failing every request.
    pub async fn admit(&self, presented_key: Option<&str>) -> Result<ApiKey, AuthError> {
        // Nothing to compare; skip the store round-trip
        if !matches!(presented_key, Some(key) if !key.is_empty()) {
            return Err(AdmissionError::Missing.into());
        }

        let rows = self.api_key_repo.list().await.map_err(|e| {
            tracing::error!("Failed to list API keys: {}", e);
            AdmissionError::Store(e.to_string())
        })?;

        let known_keys: Vec<ApiKey> = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                ApiKey::try_from(row)
                    .inspect_err(|e| tracing::warn!(key_id = %id, "Skipping API key: {}", e))
                    .ok()
            })
            .collect();

        let admitted = self.gate.admit(presented_key, &known_keys)?;
        Ok(admitted.clone())
    }
}
