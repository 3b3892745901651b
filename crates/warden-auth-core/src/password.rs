//! Password hashing and verification

use crate::error::PasswordError;

/// Longest password bcrypt hashes without truncation
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Salted, adaptive-cost password hashing
#[derive(Debug, Clone, Copy)]
pub struct CredentialVerifier {
    cost: u32,
}

impl CredentialVerifier {
    /// Create a verifier with a custom bcrypt cost
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Configured bcrypt cost
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password for storage.
    ///
    /// bcrypt silently ignores input past 72 bytes, so longer passwords are
    /// refused instead of hashed.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong {
                max: MAX_PASSWORD_BYTES,
            });
        }

        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::Hash(e.to_string()))
    }

    /// Check a password against a stored hash
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<(), PasswordError> {
        // Past the ceiling bcrypt would compare only the prefix
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::Mismatch);
        }

        match bcrypt::verify(password, stored_hash) {
            Ok(true) => Ok(()),
            Ok(false) => Err(PasswordError::Mismatch),
            // bcrypt's parse error quotes the hash back; keep it out of logs
            Err(_) => Err(PasswordError::CorruptHash),
        }
    }
}

impl Default for CredentialVerifier {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
