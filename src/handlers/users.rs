use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::AppResult,
    models::{CreateUserRequest, MessageResponse, UpdateUserRequest, UserResponse},
    services::UserService,
};

/// get_me
///
/// [Authenticated Route] The profile of the requesting user.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Own profile", body = UserResponse),
        (status = 401, description = "Not authenticated or inactive")
    )
)]
pub async fn get_me(
    principal: AuthUser,
    State(users): State<UserService>,
) -> AppResult<Json<UserResponse>> {
    users.me(&principal).await.map(Json)
}

/// list_users
///
/// [Admin Route] Every registered account.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn list_users(
    principal: AuthUser,
    State(users): State<UserService>,
) -> AppResult<Json<Vec<UserResponse>>> {
    users.list(&principal).await.map(Json)
}

/// create_user
///
/// [Admin Route] Registers a new account. The role defaults to `AGENT`.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Email already registered"),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn create_user(
    principal: AuthUser,
    State(users): State<UserService>,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    users.create(payload, &principal).await.map(Json)
}

/// get_user
///
/// [Authenticated Route] Self-or-admin.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 403, description = "Neither the user nor an administrator"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    principal: AuthUser,
    State(users): State<UserService>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    users.get(id, &principal).await.map(Json)
}

/// update_user
///
/// [Authenticated Route] Self-or-admin partial update. `role` and `active` are admin-only.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Email taken or last administrator demoted"),
        (status = 403, description = "Not allowed"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    principal: AuthUser,
    State(users): State<UserService>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    users.update(id, payload, &principal).await.map(Json)
}

/// delete_user
///
/// [Admin Route] The last remaining administrator cannot be deleted.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Last administrator"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    principal: AuthUser,
    State(users): State<UserService>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    users.delete(id, &principal).await?;
    Ok(Json(MessageResponse::new("User deleted")))
}
