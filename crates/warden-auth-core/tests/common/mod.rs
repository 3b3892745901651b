//! Common test utilities for warden-auth-core integration tests

pub mod mock_repos;

#[allow(unused_imports)]
pub use mock_repos::{FailingRepository, MockApiKeyRepository, MockUserRepository};

use std::sync::Arc;
use std::time::Duration;

use warden_auth_core::{AuthConfig, AuthService, FixedClock};

/// Fixed "now" used across integration tests
#[allow(dead_code)]
pub const T: i64 = 1_700_000_000;

/// Host used as issuer and audience
#[allow(dead_code)]
pub const HOST: &str = "svc.example";

/// 48-byte secret, comfortably above the 256-bit minimum
#[allow(dead_code)]
pub fn test_secret() -> Vec<u8> {
    b"a]".repeat(24)
}

/// Config with a cheap bcrypt cost and a 100s token lifetime
#[allow(dead_code)]
pub fn test_config() -> AuthConfig {
    AuthConfig::new(HOST, test_secret())
        .with_bcrypt_cost(4)
        .with_token_ttl(Duration::from_secs(100))
}

/// Service over in-memory repos with the clock frozen at `now`
#[allow(dead_code)]
pub fn test_service(
    users: MockUserRepository,
    keys: MockApiKeyRepository,
    now: i64,
) -> AuthService<MockUserRepository, MockApiKeyRepository> {
    AuthService::new(test_config(), Arc::new(users), Arc::new(keys))
        .unwrap()
        .with_clock(Arc::new(FixedClock::at_timestamp(now).unwrap()))
}
