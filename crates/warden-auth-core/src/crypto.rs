//! Cryptographic utilities for secure operations
//!
//! This module provides the signing-secret type, the minimum-entropy policy it
//! must satisfy, and constant-time comparison helpers.

use sha2::{Digest, Sha256};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::error::WeakSecretError;

/// Bits per byte of secret material
const BITS_IN_BYTE: usize = 8;

/// Shared HMAC signing secret.
///
/// Loaded once from configuration and never mutated. Cloning is cheap and
/// `Debug` only reveals the bit length.
#[derive(Clone)]
pub struct Secret {
    bytes: Arc<[u8]>,
}

impl Secret {
    /// Wrap raw secret bytes. No strength check happens here; see
    /// [`SecretPolicy::validate`].
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        Self {
            bytes: Arc::from(bytes.as_ref()),
        }
    }

    /// Raw key material
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length of the secret in bits
    pub fn bit_len(&self) -> usize {
        self.bytes.len().saturating_mul(BITS_IN_BYTE)
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secret")
            .field("bits", &self.bit_len())
            .finish_non_exhaustive()
    }
}

/// Minimum-entropy rule for signing secrets.
///
/// A secret passes only when its bit length is strictly greater than the
/// configured minimum: a secret of exactly `min_bits` is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretPolicy {
    min_bits: usize,
}

impl SecretPolicy {
    /// Default minimum, in bits
    pub const DEFAULT_MIN_BITS: usize = 256;

    /// Create a policy with a custom minimum
    pub const fn new(min_bits: usize) -> Self {
        Self { min_bits }
    }

    /// Configured minimum, in bits
    pub const fn min_bits(&self) -> usize {
        self.min_bits
    }

    /// Check that `secret` is long enough.
    ///
    /// # Errors
    /// Returns [`WeakSecretError`] if `len(secret) * 8 <= min_bits`.
    pub fn validate(&self, secret: &[u8]) -> Result<(), WeakSecretError> {
        let actual_bits = secret.len().saturating_mul(BITS_IN_BYTE);
        if actual_bits <= self.min_bits {
            return Err(WeakSecretError {
                actual_bits,
                minimum_bits: self.min_bits,
            });
        }
        Ok(())
    }
}

impl Default for SecretPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_BITS)
    }
}

/// Constant-time byte slice comparison.
///
/// Returns `false` immediately if lengths differ (length is not secret);
/// otherwise every byte is compared regardless of where a difference occurs.
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Constant-time string comparison.
#[inline]
pub fn constant_time_str_eq(a: &str, b: &str) -> bool {
    constant_time_eq(a.as_bytes(), b.as_bytes())
}

/// Short, non-reversible identifier for a credential value, safe to log.
///
/// First 12 hex chars of the SHA-256 digest.
pub fn fingerprint(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(12);
    hex
}
