use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    models::{Role, User},
    repository::{Repository, RepositoryState},
};

/// Claims
///
/// Payload of the bearer token. The subject is the user's email, so a token stops
/// resolving as soon as the account is deleted or its email changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// hash_password
///
/// Argon2id with a fresh random salt; the PHC string embeds the parameters.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// authenticate
///
/// Checks an email/password pair. Both an unknown email and a wrong password produce the
/// same `Unauthorized` error.
pub async fn authenticate(repo: &dyn Repository, email: &str, password: &str) -> AppResult<User> {
    let user = repo
        .get_user_by_email(email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("incorrect email or password".to_string()))?;

    if !verify_password(password, &user.password_hash) {
        debug!(email = %email, "password mismatch");
        return Err(AppError::Unauthorized(
            "incorrect email or password".to_string(),
        ));
    }
    Ok(user)
}

/// issue_token
///
/// Signs `{sub: email, role, iat, exp}` with the configured HMAC algorithm.
pub fn issue_token(config: &AppConfig, user: &User) -> AppResult<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user.email.clone(),
        role: user.role,
        iat: now,
        exp: now + config.jwt_expiration_secs,
    };
    encode(
        &Header::new(config.jwt_algorithm),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("token encoding failed: {}", e)))
}

/// decode_token
///
/// Verifies signature, algorithm and expiry. Every failure collapses into `Unauthorized`.
pub fn decode_token(config: &AppConfig, token: &str) -> AppResult<Claims> {
    let mut validation = Validation::new(config.jwt_algorithm);
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp", "sub"]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::Unauthorized("token expired".to_string()),
        _ => AppError::Unauthorized(INVALID_CREDENTIALS.to_string()),
    })
}

/// resolve_principal
///
/// Decodes the token and loads the current user record behind its subject.
pub async fn resolve_principal(
    repo: &dyn Repository,
    config: &AppConfig,
    token: &str,
) -> AppResult<User> {
    let claims = decode_token(config, token)?;
    repo.get_user_by_email(&claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))
}

pub fn require_active(user: User) -> AppResult<User> {
    if user.active {
        Ok(user)
    } else {
        Err(AppError::Inactive)
    }
}

/// AuthUser
///
/// The resolved, active identity behind a request. Handlers receive it as an argument and
/// pass it to the services, which run the authorization policy against it.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub active: bool,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            active: user.active,
        }
    }
}

/// AuthUser Extractor
///
/// Requires `Authorization: Bearer <token>`, resolves the token to a stored user and
/// rejects deactivated accounts. The role is always read from the database, never
/// trusted from the token.
///
/// Rejection: `AppError::Unauthorized` or `AppError::Inactive` (both 401).
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::Unauthorized("not authenticated".to_string()))?;

        let user = resolve_principal(repo.as_ref(), &config, token).await?;
        let user = require_active(user)?;
        Ok(AuthUser::from(&user))
    }
}
