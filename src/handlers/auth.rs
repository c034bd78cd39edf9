use axum::{Form, Json, extract::State};

use crate::{
    AppConfig,
    auth,
    error::AppResult,
    models::{TokenRequest, TokenResponse},
    repository::RepositoryState,
};

/// login_for_access_token
///
/// [Public Route] Exchanges an email (`username`) and password for a bearer token.
/// Unknown emails and wrong passwords both answer 401.
#[utoipa::path(
    post,
    path = "/api/token",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Incorrect email or password")
    )
)]
pub async fn login_for_access_token(
    State(repo): State<RepositoryState>,
    State(config): State<AppConfig>,
    Form(form): Form<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let user = auth::authenticate(repo.as_ref(), &form.username, &form.password).await?;
    let access_token = auth::issue_token(&config, &user)?;
    tracing::info!(user_id = %user.id, "access token issued");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
