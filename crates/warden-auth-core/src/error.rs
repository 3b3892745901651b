//! Auth errors
//!
//! Each component returns its own closed error enum so callers and tests can
//! match on the exact cause. [`AuthError`] gathers them, and
//! [`AuthError::external_kind`] is the single place where causes collapse into
//! what a client is allowed to see.

use thiserror::Error;

/// Signing secret does not exceed the minimum bit length
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("secret must be longer than {minimum_bits} bits (got {actual_bits})")]
pub struct WeakSecretError {
    pub actual_bits: usize,
    pub minimum_bits: usize,
}

/// Token issuance failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IssueError {
    /// Secret rejected by the policy; no token was produced
    #[error(transparent)]
    WeakSecret(#[from] WeakSecretError),

    /// Lifetime is not a positive whole number of seconds within timestamp range
    #[error("token lifetime must be a positive whole number of seconds")]
    InvalidLifetime,

    /// Encoder failure
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Token validation failures, in the order the checks run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Secret rejected by the policy before any parsing
    #[error(transparent)]
    WeakSecret(#[from] WeakSecretError),

    /// Malformed token, wrong algorithm, or signature mismatch
    #[error("bad token signature")]
    BadSignature,

    /// `nbf` is after now
    #[error("token not yet valid")]
    NotYetValid,

    /// `exp` is before now
    #[error("token expired")]
    Expired,

    /// `iat` is after now
    #[error("token issued in the future")]
    IssuedInFuture,

    /// `iss` does not match the expected issuer
    #[error("wrong token issuer")]
    WrongIssuer,

    /// None of the expected audiences is present in `aud`
    #[error("wrong token audience")]
    WrongAudience,
}

/// Password hashing and verification failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// Input longer than the hash function accepts
    #[error("password exceeds {max} bytes")]
    TooLong { max: usize },

    /// Password does not match the stored hash
    #[error("password mismatch")]
    Mismatch,

    /// Hash function failure while hashing (e.g. bad cost)
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// Stored hash could not be parsed
    #[error("stored password hash is corrupt")]
    CorruptHash,
}

/// API-key admission failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    /// No key, or an empty key, was presented
    #[error("missing API key")]
    Missing,

    /// Presented key is not among the provisioned keys
    #[error("unknown API key")]
    Unknown,

    /// Provisioned keys could not be listed
    #[error("API key store unavailable: {0}")]
    Store(String),
}

/// Login failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// E-mail or password fails basic validation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unknown e-mail or wrong password; the two are deliberately the same
    #[error("unauthorized")]
    Unauthorized,

    /// Token could not be issued
    #[error(transparent)]
    Issue(#[from] IssueError),

    /// User store or hash function failure
    #[error("internal error: {0}")]
    Internal(String),
}

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Admission(#[from] AdmissionError),

    #[error(transparent)]
    Login(#[from] LoginError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Resource already exists (e.g. e-mail registered twice)
    #[error("already exists")]
    Conflict,

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// What a client is told about a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalKind {
    /// Any authentication failure, without detail
    Unauthenticated,
    /// Malformed request input
    InvalidInput,
    /// Duplicate resource
    Conflict,
    /// The system is broken, not the caller
    Internal,
}

impl AuthError {
    /// Collapse the internal cause into the client-visible kind
    pub fn external_kind(&self) -> ExternalKind {
        match self {
            Self::Token(TokenError::WeakSecret(_)) => ExternalKind::Internal,
            Self::Token(_) => ExternalKind::Unauthenticated,
            Self::Admission(AdmissionError::Store(_)) => ExternalKind::Internal,
            Self::Admission(_) => ExternalKind::Unauthenticated,
            Self::Login(LoginError::InvalidInput(_)) => ExternalKind::InvalidInput,
            Self::Login(LoginError::Unauthorized) => ExternalKind::Unauthenticated,
            Self::Login(LoginError::Issue(_) | LoginError::Internal(_)) => ExternalKind::Internal,
            Self::Password(PasswordError::Mismatch) => ExternalKind::Unauthenticated,
            Self::Password(PasswordError::TooLong { .. }) => ExternalKind::InvalidInput,
            Self::Password(PasswordError::Hash(_) | PasswordError::CorruptHash) => {
                ExternalKind::Internal
            }
            Self::Conflict => ExternalKind::Conflict,
            Self::Database(_) | Self::Configuration(_) | Self::Internal(_) => ExternalKind::Internal,
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self.external_kind() {
            ExternalKind::Unauthenticated => 401,
            ExternalKind::Conflict => 409,
            ExternalKind::InvalidInput => 422,
            ExternalKind::Internal => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self.external_kind() {
            ExternalKind::Unauthenticated => "UNAUTHENTICATED",
            ExternalKind::Conflict => "CONFLICT",
            ExternalKind::InvalidInput => "INVALID_INPUT",
            ExternalKind::Internal => "INTERNAL_ERROR",
        }
    }
}

impl From<warden_db::DbError> for AuthError {
    fn from(err: warden_db::DbError) -> Self {
        match err {
            warden_db::DbError::Conflict => Self::Conflict,
            other => {
                tracing::error!("Database error: {}", other);
                Self::Database(other.to_string())
            }
        }
    }
}
