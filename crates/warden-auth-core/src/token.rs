//! Access token issuance and validation
//!
//! Tokens are compact JWTs signed with HMAC-SHA-256 over the shared secret.
//! Validation is a fixed pipeline: signature first, then the temporal claims,
//! then the identity claims. The first failing check decides the error.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

use crate::crypto::SecretPolicy;
use crate::error::{IssueError, TokenError};

/// The only accepted signing algorithm
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Scheme prefix of an `Authorization` header carrying a token
pub const BEARER_PREFIX: &str = "Bearer ";

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer
    pub iss: String,
    /// Subject (user ID)
    pub sub: String,
    /// Audience; a single string is accepted when parsing
    #[serde(default, deserialize_with = "one_or_many")]
    pub aud: Vec<String>,
    /// Expiration timestamp
    pub exp: i64,
    /// Not-before timestamp
    pub nbf: i64,
    /// Issued at timestamp
    pub iat: i64,
    /// Token ID, empty until revocation exists
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub jti: String,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(aud) => vec![aud],
        OneOrMany::Many(auds) => auds,
    })
}

/// Everything needed to mint a token
#[derive(Debug, Clone)]
pub struct ClaimsInput {
    pub subject: String,
    pub issuer: String,
    pub audience: Vec<String>,
    /// Whole seconds; a fractional part is rejected at issuance
    pub ttl: Duration,
    pub now: DateTime<Utc>,
}

impl Claims {
    /// Build claims valid from `now` for `ttl`
    fn from_input(input: &ClaimsInput) -> Result<Self, IssueError> {
        let ttl_secs = i64::try_from(input.ttl.as_secs()).map_err(|_| IssueError::InvalidLifetime)?;
        if ttl_secs == 0 || input.ttl.subsec_nanos() != 0 {
            return Err(IssueError::InvalidLifetime);
        }

        let now = input.now.timestamp();
        let exp = now.checked_add(ttl_secs).ok_or(IssueError::InvalidLifetime)?;

        Ok(Self {
            iss: input.issuer.clone(),
            sub: input.subject.clone(),
            aud: input.audience.clone(),
            exp,
            nbf: now,
            iat: now,
            jti: String::new(),
        })
    }

    /// Expiry as a timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Signs claims into tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenIssuer {
    policy: SecretPolicy,
}

impl TokenIssuer {
    /// Create an issuer enforcing `policy` on every signing call
    pub fn new(policy: SecretPolicy) -> Self {
        Self { policy }
    }

    /// Issue a signed token.
    ///
    /// The secret is checked against the policy on every call, so a secret
    /// rotated to a weaker value is caught at the next issuance. Identical
    /// inputs produce byte-identical tokens.
    pub fn issue(&self, input: &ClaimsInput, secret: &[u8]) -> Result<String, IssueError> {
        self.policy.validate(secret)?;

        let claims = Claims::from_input(input)?;

        encode(
            &Header::new(TOKEN_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| {
            tracing::error!("Failed to sign token: {}", e);
            IssueError::Signing(e.to_string())
        })
    }
}

/// Values a token is checked against
struct Expected<'a> {
    /// `now` rounded down to whole seconds
    now: i64,
    /// `now` rounded up to whole seconds
    now_ceil: i64,
    issuer: &'a str,
    audience: &'a [String],
}

type ClaimCheck = fn(&Claims, &Expected<'_>) -> Result<(), TokenError>;

/// Claim checks, in evaluation order
const CLAIM_CHECKS: [ClaimCheck; 5] = [
    check_not_before,
    check_expiry,
    check_issued_at,
    check_issuer,
    check_audience,
];

fn check_not_before(claims: &Claims, expected: &Expected<'_>) -> Result<(), TokenError> {
    if expected.now < claims.nbf {
        return Err(TokenError::NotYetValid);
    }
    Ok(())
}

fn check_expiry(claims: &Claims, expected: &Expected<'_>) -> Result<(), TokenError> {
    // A token expiring exactly now is still valid this instant, but not a
    // fraction of a second later
    if expected.now_ceil > claims.exp {
        return Err(TokenError::Expired);
    }
    Ok(())
}

fn check_issued_at(claims: &Claims, expected: &Expected<'_>) -> Result<(), TokenError> {
    if claims.iat > expected.now {
        return Err(TokenError::IssuedInFuture);
    }
    Ok(())
}

fn check_issuer(claims: &Claims, expected: &Expected<'_>) -> Result<(), TokenError> {
    if claims.iss != expected.issuer {
        return Err(TokenError::WrongIssuer);
    }
    Ok(())
}

fn check_audience(claims: &Claims, expected: &Expected<'_>) -> Result<(), TokenError> {
    if !expected.audience.iter().any(|aud| claims.aud.contains(aud)) {
        return Err(TokenError::WrongAudience);
    }
    Ok(())
}

/// Parses and verifies tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenValidator {
    policy: SecretPolicy,
}

impl TokenValidator {
    /// Create a validator enforcing `policy` on the verification secret
    pub fn new(policy: SecretPolicy) -> Self {
        Self { policy }
    }

    /// Validate a token and return its claims
    pub fn validate(
        &self,
        token: &str,
        expected_issuer: &str,
        expected_audience: &[String],
        secret: &[u8],
        now: DateTime<Utc>,
    ) -> Result<Claims, TokenError> {
        self.policy.validate(secret)?;

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret),
            &signature_only_validation(),
        )
        .map_err(|e| {
            tracing::debug!("Token signature check failed: {}", e);
            TokenError::BadSignature
        })?
        .claims;

        let now_secs = now.timestamp();
        let expected = Expected {
            now: now_secs,
            now_ceil: if now.timestamp_subsec_nanos() > 0 {
                now_secs.saturating_add(1)
            } else {
                now_secs
            },
            issuer: expected_issuer,
            audience: expected_audience,
        };

        CLAIM_CHECKS
            .iter()
            .try_for_each(|check| check(&claims, &expected))
            .inspect_err(|e| tracing::debug!(reason = %e, "Token rejected"))?;

        Ok(claims)
    }
}

/// Algorithm and signature checks only; claims are checked by `CLAIM_CHECKS`
/// against the injected clock.
fn signature_only_validation() -> Validation {
    let mut validation = Validation::new(TOKEN_ALGORITHM);
    validation.required_spec_claims.clear();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation
}

/// Extract the token from an `Authorization` header value
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
