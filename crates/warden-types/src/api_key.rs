//! API key types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// API key ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKeyId(pub Uuid);

impl ApiKeyId {
    /// Create a new API key ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ApiKeyId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ApiKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client application an API key is provisioned for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Application {
    /// Server-side web backend
    WebBackend,
    /// Browser-facing web frontend
    WebFrontend,
}

impl Application {
    /// Every application a key can be issued for
    pub const ALL: [Application; 2] = [Self::WebBackend, Self::WebFrontend];

    /// Get the application label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebBackend => "web_backend",
            Self::WebFrontend => "web_frontend",
        }
    }
}

impl std::fmt::Display for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Application {
    type Err = UnknownApplication;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|app| app.as_str() == s)
            .ok_or_else(|| UnknownApplication(s.to_string()))
    }
}

/// Label that does not name a known application
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0} is not a valid application (expected one of: web_backend, web_frontend)")]
pub struct UnknownApplication(pub String);

/// A provisioned API key.
///
/// Keys are created out-of-band by an administrator and only ever read by the
/// admission gate. The raw value is never printed by `Debug`.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiKey {
    /// API key ID
    pub id: ApiKeyId,
    /// The key value presented by clients
    pub value: String,
    /// Application the key was issued for
    pub application: Application,
    /// When the key was created
    pub created_at: DateTime<Utc>,
}

impl ApiKey {
    /// Create a fresh key for an application with a random value
    pub fn generate(application: Application) -> Self {
        Self {
            id: ApiKeyId::new(),
            value: Uuid::new_v4().to_string(),
            application,
            created_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("id", &self.id)
            .field("application", &self.application)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_parse() {
        assert_eq!("web_backend".parse::<Application>(), Ok(Application::WebBackend));
        assert_eq!("web_frontend".parse::<Application>(), Ok(Application::WebFrontend));
        assert!("mobile".parse::<Application>().is_err());
        // Labels are case-sensitive
        assert!("WEB_BACKEND".parse::<Application>().is_err());
    }

    #[test]
    fn test_application_serde_matches_label() {
        for app in Application::ALL {
            let json = serde_json::to_string(&app).unwrap();
            assert_eq!(json, format!("\"{}\"", app.as_str()));
        }
    }

    #[test]
    fn test_generated_keys_are_unique() {
        let a = ApiKey::generate(Application::WebBackend);
        let b = ApiKey::generate(Application::WebBackend);
        assert_ne!(a.value, b.value);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_api_key_debug_hides_value() {
        let key = ApiKey::generate(Application::WebFrontend);
        assert!(!format!("{key:?}").contains(&key.value));
    }
}
