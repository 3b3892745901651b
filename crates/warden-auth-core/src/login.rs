//! Login flow
//!
//! Input validation, credential lookup, password verification and token
//! issuance. An unknown e-mail and a wrong password produce the same
//! [`LoginError::Unauthorized`] so callers cannot enumerate accounts.

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use warden_db::UserRepository;
use warden_types::{Credentials, StoredCredential};

use crate::config::AuthConfig;
use crate::error::{LoginError, PasswordError};
use crate::password::{CredentialVerifier, MAX_PASSWORD_BYTES};
use crate::token::{ClaimsInput, TokenIssuer};

/// Shortest accepted password, in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Longest accepted e-mail address, in bytes
pub const MAX_EMAIL_LENGTH: usize = 254;

const MAX_LOCAL_PART_LENGTH: usize = 64;

/// Password hashed once per flow so unknown e-mails pay the same bcrypt cost
const TIMING_PASSWORD: &str = "warden-timing-equalizer";

/// Check that an e-mail address is plausibly deliverable.
///
/// Not a full RFC 5322 parser: one `@`, a non-empty local part, and a dotted
/// domain of alphanumeric labels with inner hyphens.
pub fn validate_email(email: &str) -> Result<(), LoginError> {
    let invalid = || LoginError::InvalidInput("email must be a valid address".to_string());

    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return Err(invalid());
    }
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid());
    }

    let (local, domain) = email.rsplit_once('@').ok_or_else(invalid)?;
    if local.is_empty() || local.len() > MAX_LOCAL_PART_LENGTH || local.contains('@') {
        return Err(invalid());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || !labels.iter().all(|label| valid_domain_label(label)) {
        return Err(invalid());
    }

    Ok(())
}

fn valid_domain_label(label: &str) -> bool {
    !label.is_empty()
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_alphanumeric() || c == '-')
}

/// Check password length bounds: at least [`MIN_PASSWORD_LENGTH`] characters
/// and at most [`MAX_PASSWORD_BYTES`] bytes.
pub fn validate_password(password: &str) -> Result<(), LoginError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(LoginError::InvalidInput(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(LoginError::InvalidInput(format!(
            "password must be at most {MAX_PASSWORD_BYTES} bytes"
        )));
    }
    Ok(())
}

/// Validate both halves of a credential pair
pub fn validate_credentials(credentials: &Credentials) -> Result<(), LoginError> {
    validate_email(&credentials.email)?;
    validate_password(&credentials.password)
}

/// Exchanges credentials for an access token
#[derive(Debug, Clone)]
pub struct LoginFlow {
    issuer: TokenIssuer,
    verifier: CredentialVerifier,
    timing_hash: Arc<OnceLock<String>>,
}

impl LoginFlow {
    /// Create a login flow
    pub fn new(issuer: TokenIssuer, verifier: CredentialVerifier) -> Self {
        Self {
            issuer,
            verifier,
            timing_hash: Arc::new(OnceLock::new()),
        }
    }

    /// Build a login flow from the auth config
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            TokenIssuer::new(config.secret_policy),
            CredentialVerifier::new(config.bcrypt_cost),
        )
    }

    /// Run the login flow and return a signed token.
    ///
    /// The token's subject is the user's ID; issuer and audience are the
    /// configured host. A store failure is terminal and reported as
    /// [`LoginError::Internal`].
    pub async fn login<U>(
        &self,
        credentials: &Credentials,
        users: &U,
        config: &AuthConfig,
        now: DateTime<Utc>,
    ) -> Result<String, LoginError>
    where
        U: UserRepository + ?Sized,
    {
        validate_credentials(credentials)?;

        let row = users.find_by_email(&credentials.email).await.map_err(|e| {
            tracing::error!("User lookup failed: {}", e);
            LoginError::Internal("user lookup failed".to_string())
        })?;

        let Some(row) = row else {
            tracing::debug!("Login for unknown e-mail");
            self.verify_against_timing_hash(&credentials.password).await;
            return Err(LoginError::Unauthorized);
        };
        let stored = StoredCredential::from(row);

        self.verify_password(&credentials.password, &stored).await?;

        let input = ClaimsInput {
            subject: stored.user_id.to_string(),
            issuer: config.issuer().to_string(),
            audience: config.audience(),
            ttl: config.token_ttl,
            now,
        };

        let token = self.issuer.issue(&input, config.jwt_secret.as_bytes())?;

        tracing::info!(user_id = %stored.user_id, "User logged in");
        Ok(token)
    }

    /// bcrypt is CPU-bound, so verification runs on the blocking pool
    async fn verify_password(
        &self,
        password: &str,
        stored: &StoredCredential,
    ) -> Result<(), LoginError> {
        let verifier = self.verifier;
        let password = password.to_owned();
        let hash = stored.password_hash.clone();

        let outcome = tokio::task::spawn_blocking(move || verifier.verify(&password, &hash))
            .await
            .map_err(|e| LoginError::Internal(format!("password check aborted: {e}")))?;

        match outcome {
            Ok(()) => Ok(()),
            Err(PasswordError::Mismatch | PasswordError::TooLong { .. }) => {
                tracing::debug!(user_id = %stored.user_id, "Password mismatch");
                Err(LoginError::Unauthorized)
            }
            Err(PasswordError::CorruptHash) => {
                tracing::error!(user_id = %stored.user_id, "Stored password hash is corrupt");
                Err(LoginError::Internal("stored password hash is corrupt".to_string()))
            }
            Err(PasswordError::Hash(e)) => Err(LoginError::Internal(e)),
        }
    }

    /// Spend one bcrypt verification on a miss. The outcome is discarded.
    async fn verify_against_timing_hash(&self, password: &str) {
        let verifier = self.verifier;
        let password = password.to_owned();
        let timing_hash = Arc::clone(&self.timing_hash);

        let result = tokio::task::spawn_blocking(move || {
            let hash = timing_hash
                .get_or_init(|| verifier.hash(TIMING_PASSWORD).unwrap_or_default());
            // Never Ok: the caller already has no account to log into
            let _ = verifier.verify(&password, hash);
        })
        .await;

        if let Err(e) = result {
            tracing::warn!("Timing verification aborted: {}", e);
        }
    }
}
