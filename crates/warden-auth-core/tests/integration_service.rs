//! Integration tests for the auth service against in-memory repositories

mod common;

use std::sync::Arc;

use common::{
    test_config, test_secret, test_service, FailingRepository, MockApiKeyRepository,
    MockUserRepository, HOST, T,
};
use warden_auth_core::{
    AdmissionError, AuthError, AuthService, ExternalKind, FixedClock, LoginError, TokenError,
    TokenValidator,
};
use warden_types::{Application, Credentials};

fn at(secs: i64) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::from_timestamp(secs, 0).unwrap()
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_issues_token_for_user() {
    let users = MockUserRepository::new();
    let user = users.insert_user("user@example.com", "correct-password");
    let service = test_service(users, MockApiKeyRepository::new(), T);

    let token = service
        .login(&Credentials::new("user@example.com", "correct-password"))
        .await
        .unwrap();

    let claims = service.validate_bearer(&token).unwrap();
    assert_eq!(claims.sub, user.id.to_string());
    assert_eq!(claims.iss, HOST);
    assert_eq!(claims.aud, vec![HOST.to_string()]);
    assert_eq!(claims.iat, T);
    assert_eq!(claims.exp, T + 100);
}

#[tokio::test]
async fn test_login_unknown_email_and_wrong_password_look_the_same() {
    let users = MockUserRepository::new();
    users.insert_user("user@example.com", "correct-password");
    let service = test_service(users, MockApiKeyRepository::new(), T);

    let unknown = service
        .login(&Credentials::new("nobody@example.com", "correct-password"))
        .await
        .unwrap_err();
    let mismatch = service
        .login(&Credentials::new("user@example.com", "wrong-password"))
        .await
        .unwrap_err();

    assert!(matches!(unknown, AuthError::Login(LoginError::Unauthorized)));
    assert!(matches!(mismatch, AuthError::Login(LoginError::Unauthorized)));
    assert_eq!(unknown.to_string(), mismatch.to_string());
    assert_eq!(unknown.status_code(), 401);
}

#[tokio::test]
async fn test_login_rejects_malformed_input() {
    let service = test_service(MockUserRepository::new(), MockApiKeyRepository::new(), T);

    let err = service
        .login(&Credentials::new("not-an-email", "correct-password"))
        .await
        .unwrap_err();
    assert_eq!(err.external_kind(), ExternalKind::InvalidInput);

    let err = service
        .login(&Credentials::new("user@example.com", "short"))
        .await
        .unwrap_err();
    assert_eq!(err.external_kind(), ExternalKind::InvalidInput);
}

#[tokio::test]
async fn test_login_store_failure_is_internal() {
    let service = AuthService::new(
        test_config(),
        Arc::new(FailingRepository),
        Arc::new(MockApiKeyRepository::new()),
    )
    .unwrap();

    let err = service
        .login(&Credentials::new("user@example.com", "correct-password"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Login(LoginError::Internal(_))));
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn test_login_corrupt_stored_hash_is_internal_and_not_echoed() {
    let users = MockUserRepository::new();
    users.insert_with_hash("user@example.com", "$2b$12$STOREDHASHMATERIALxyz");
    let service = test_service(users, MockApiKeyRepository::new(), T);

    let err = service
        .login(&Credentials::new("user@example.com", "correct-password"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Login(LoginError::Internal(_))));
    assert_eq!(err.status_code(), 500);
    assert!(!err.to_string().contains("STOREDHASHMATERIAL"));
    assert!(!format!("{err:?}").contains("STOREDHASHMATERIAL"));
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_then_login() {
    let users = MockUserRepository::new();
    let service = test_service(users.clone(), MockApiKeyRepository::new(), T);

    let profile = service
        .register(&Credentials::new("new@example.com", "brand-new-password"))
        .await
        .unwrap();
    assert_eq!(profile.email, "new@example.com");
    assert_eq!(users.count(), 1);

    let token = service
        .login(&Credentials::new("new@example.com", "brand-new-password"))
        .await
        .unwrap();
    let claims = service.validate_bearer(&token).unwrap();
    assert_eq!(claims.sub, profile.id.to_string());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let users = MockUserRepository::new();
    users.insert_user("taken@example.com", "first-password");
    let service = test_service(users, MockApiKeyRepository::new(), T);

    let err = service
        .register(&Credentials::new("taken@example.com", "second-password"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Conflict));
    assert_eq!(err.status_code(), 409);
}

#[tokio::test]
async fn test_register_rejects_password_over_ceiling() {
    let users = MockUserRepository::new();
    let service = test_service(users.clone(), MockApiKeyRepository::new(), T);

    let err = service
        .register(&Credentials::new("long@example.com", "p".repeat(73)))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 422);
    assert_eq!(users.count(), 0);
}

// ============================================================================
// Bearer tokens
// ============================================================================

#[tokio::test]
async fn test_token_lifecycle_across_clock() {
    let users = MockUserRepository::new();
    let user = users.insert_user("user@example.com", "correct-password");
    let service = test_service(users, MockApiKeyRepository::new(), T);

    let token = service
        .login(&Credentials::new("user@example.com", "correct-password"))
        .await
        .unwrap();

    let validator = TokenValidator::default();
    let audience = vec![HOST.to_string()];

    let claims = validator
        .validate(&token, HOST, &audience, &test_secret(), at(T + 50))
        .unwrap();
    assert_eq!(claims.sub, user.id.to_string());

    let expired = validator.validate(&token, HOST, &audience, &test_secret(), at(T + 101));
    assert_eq!(expired, Err(TokenError::Expired));
}

#[tokio::test]
async fn test_validate_bearer_uses_injected_clock() {
    let users = MockUserRepository::new();
    users.insert_user("user@example.com", "correct-password");
    let service = test_service(users.clone(), MockApiKeyRepository::new(), T);

    let token = service
        .login(&Credentials::new("user@example.com", "correct-password"))
        .await
        .unwrap();

    let later = test_service(users, MockApiKeyRepository::new(), T).with_clock(Arc::new(
        FixedClock::at_timestamp(T + 101).unwrap(),
    ));
    let err = later.validate_bearer(&token).unwrap_err();
    assert!(matches!(err, AuthError::Token(TokenError::Expired)));
    assert_eq!(err.error_code(), "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_token_from_other_host_rejected() {
    let users = MockUserRepository::new();
    users.insert_user("user@example.com", "correct-password");
    let service = test_service(users.clone(), MockApiKeyRepository::new(), T);
    let token = service
        .login(&Credentials::new("user@example.com", "correct-password"))
        .await
        .unwrap();

    let other_host = AuthService::new(
        warden_auth_core::AuthConfig::new("other.example", test_secret()),
        Arc::new(users),
        Arc::new(MockApiKeyRepository::new()),
    )
    .unwrap()
    .with_clock(Arc::new(FixedClock::at_timestamp(T).unwrap()));

    let err = other_host.validate_bearer(&token).unwrap_err();
    assert!(matches!(err, AuthError::Token(TokenError::WrongIssuer)));
}

#[test]
fn test_weak_secret_blocks_construction() {
    let config = warden_auth_core::AuthConfig::new(HOST, [b'k'; 32]);
    let result = AuthService::new(
        config,
        Arc::new(MockUserRepository::new()),
        Arc::new(MockApiKeyRepository::new()),
    );
    assert!(matches!(result, Err(AuthError::Configuration(_))));
}

// ============================================================================
// API-key admission
// ============================================================================

#[tokio::test]
async fn test_admit_known_key() {
    let keys = MockApiKeyRepository::new();
    let value = keys.provision("web_backend");
    let service = test_service(MockUserRepository::new(), keys, T);

    let key = service.admit(Some(value.as_str())).await.unwrap();
    assert_eq!(key.application, Application::WebBackend);
}

#[tokio::test]
async fn test_admit_missing_and_unknown() {
    let keys = MockApiKeyRepository::new();
    keys.provision("web_frontend");
    let service = test_service(MockUserRepository::new(), keys, T);

    let err = service.admit(None).await.unwrap_err();
    assert!(matches!(err, AuthError::Admission(AdmissionError::Missing)));
    let err = service.admit(Some("")).await.unwrap_err();
    assert!(matches!(err, AuthError::Admission(AdmissionError::Missing)));
    let err = service.admit(Some("guess")).await.unwrap_err();
    assert!(matches!(err, AuthError::Admission(AdmissionError::Unknown)));
    assert_eq!(err.status_code(), 401);
}

#[tokio::test]
async fn test_revocation_takes_effect_on_next_call() {
    let keys = MockApiKeyRepository::new();
    let value = keys.provision("web_backend");
    let service = test_service(MockUserRepository::new(), keys.clone(), T);

    assert!(service.admit(Some(value.as_str())).await.is_ok());
    keys.revoke(&value);
    let err = service.admit(Some(value.as_str())).await.unwrap_err();
    assert!(matches!(err, AuthError::Admission(AdmissionError::Unknown)));
}

#[tokio::test]
async fn test_unparseable_key_row_is_skipped() {
    let keys = MockApiKeyRepository::new();
    let bad = keys.provision("mobile_app");
    let good = keys.provision("web_frontend");
    let service = test_service(MockUserRepository::new(), keys, T);

    assert!(service.admit(Some(good.as_str())).await.is_ok());
    let err = service.admit(Some(bad.as_str())).await.unwrap_err();
    assert!(matches!(err, AuthError::Admission(AdmissionError::Unknown)));
}

#[tokio::test]
async fn test_admit_store_failure_is_internal() {
    let service = AuthService::new(
        test_config(),
        Arc::new(MockUserRepository::new()),
        Arc::new(FailingRepository),
    )
    .unwrap();

    let err = service.admit(Some("anything")).await.unwrap_err();
    assert!(matches!(err, AuthError::Admission(AdmissionError::Store(_))));
    assert_eq!(err.status_code(), 500);
}
