//! API-key admission
//!
//! Every request must carry a provisioned key in [`API_KEY_HEADER`]. The gate
//! is a pure decision over the key listing handed to it; it keeps no cache, so
//! a revoked key stops working on the very next request.

use warden_types::ApiKey;

use crate::crypto::{constant_time_str_eq, fingerprint};
use crate::error::AdmissionError;

/// Request header carrying the API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Admission decision for presented API keys
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiKeyGate;

impl ApiKeyGate {
    /// Admit a presented key against the current listing.
    ///
    /// Returns the matching key so callers can see which application is
    /// calling. Every known key is compared, matched or not.
    pub fn admit<'a>(
        &self,
        presented_key: Option<&str>,
        known_keys: &'a [ApiKey],
    ) -> Result<&'a ApiKey, AdmissionError> {
        let presented = match presented_key {
            Some(key) if !key.is_empty() => key,
            _ => return Err(AdmissionError::Missing),
        };

        let matched = known_keys.iter().fold(None, |found, key| {
            let hit = constant_time_str_eq(presented, &key.value);
            found.or(hit.then_some(key))
        });

        match matched {
            Some(key) => {
                tracing::debug!(application = %key.application, "API key admitted");
                Ok(key)
            }
            None => {
                tracing::debug!(key = %fingerprint(presented), "Unknown API key");
                Err(AdmissionError::Unknown)
            }
        }
    }
}
