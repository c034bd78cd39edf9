mod common;

use common::{PASSWORD, TestContext};
use jsonwebtoken::{EncodingKey, Header, encode};
use realty_portal::{
    AppConfig,
    auth::{self, Claims},
    error::AppError,
    models::Role,
};

#[test]
fn test_hash_and_verify_password() {
    let hash = auth::hash_password("s3cret").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(auth::verify_password("s3cret", &hash));
    assert!(!auth::verify_password("wrong", &hash));
    assert!(!auth::verify_password("s3cret", "not-a-phc-string"));
}

#[test]
fn test_hashes_are_salted() {
    let a = auth::hash_password("same").unwrap();
    let b = auth::hash_password("same").unwrap();
    assert_ne!(a, b);
}

#[tokio::test]
async fn test_authenticate_accepts_valid_credentials() {
    let ctx = TestContext::new();
    let user = ctx.user("agent@realty.test", Role::Agent).await;

    let found = auth::authenticate(ctx.repo.as_ref(), "agent@realty.test", PASSWORD)
        .await
        .unwrap();
    assert_eq!(found.id, user.id);
}

#[tokio::test]
async fn test_authenticate_rejects_unknown_email_and_bad_password() {
    let ctx = TestContext::new();
    ctx.user("agent@realty.test", Role::Agent).await;

    let unknown = auth::authenticate(ctx.repo.as_ref(), "nobody@realty.test", PASSWORD).await;
    assert!(matches!(unknown, Err(AppError::Unauthorized(_))));

    let wrong = auth::authenticate(ctx.repo.as_ref(), "agent@realty.test", "nope").await;
    assert!(matches!(wrong, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn test_issued_token_carries_email_and_role() {
    let ctx = TestContext::new();
    let admin = ctx.user("admin@realty.test", Role::Admin).await;

    let token = auth::issue_token(&ctx.config, &admin).unwrap();
    let claims = auth::decode_token(&ctx.config, &token).unwrap();

    assert_eq!(claims.sub, "admin@realty.test");
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(claims.exp - claims.iat, ctx.config.jwt_expiration_secs);
}

#[tokio::test]
async fn test_resolve_principal_round_trip() {
    let ctx = TestContext::new();
    let user = ctx.user("agent@realty.test", Role::Agent).await;
    let token = auth::issue_token(&ctx.config, &user).unwrap();

    let resolved = auth::resolve_principal(ctx.repo.as_ref(), &ctx.config, &token)
        .await
        .unwrap();
    assert_eq!(resolved.id, user.id);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let ctx = TestContext::new();
    let user = ctx.user("agent@realty.test", Role::Agent).await;

    let other = AppConfig {
        jwt_secret: "another-secret".to_string(),
        ..AppConfig::default()
    };
    let token = auth::issue_token(&other, &user).unwrap();

    let result = auth::resolve_principal(ctx.repo.as_ref(), &ctx.config, &token).await;
    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let config = AppConfig::default();
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: "agent@realty.test".to_string(),
        role: Role::Agent,
        iat: now - 7200,
        exp: now - 3600,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .unwrap();

    let result = auth::decode_token(&config, &token);
    assert!(matches!(result, Err(AppError::Unauthorized(msg)) if msg.contains("expired")));
}

#[tokio::test]
async fn test_token_for_deleted_user_no_longer_resolves() {
    let ctx = TestContext::new();
    let user = ctx.user("gone@realty.test", Role::Agent).await;
    let token = auth::issue_token(&ctx.config, &user).unwrap();

    use realty_portal::repository::Repository;
    ctx.repo.delete_user(user.id).await.unwrap();

    let result = auth::resolve_principal(ctx.repo.as_ref(), &ctx.config, &token).await;
    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[test]
fn test_malformed_token_is_rejected() {
    let result = auth::decode_token(&AppConfig::default(), "not.a.jwt");
    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn test_require_active() {
    let ctx = TestContext::new();
    let active = ctx.user("on@realty.test", Role::Agent).await;
    let inactive = ctx.user_with("off@realty.test", Role::Agent, false).await;

    assert!(auth::require_active(active).is_ok());
    assert!(matches!(
        auth::require_active(inactive),
        Err(AppError::Inactive)
    ));
}
