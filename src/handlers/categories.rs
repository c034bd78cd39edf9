use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::AppResult,
    models::{Category, CategoryRequest, MessageResponse},
    services::ContentService,
};

/// list_categories
///
/// [Public Route] All blog categories ordered by name.
#[utoipa::path(
    get,
    path = "/api/categories",
    responses((status = 200, description = "Categories", body = [Category]))
)]
pub async fn list_categories(
    State(content): State<ContentService>,
) -> AppResult<Json<Vec<Category>>> {
    content.list_categories().await.map(Json)
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = Category),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(content): State<ContentService>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Category>> {
    content.get_category(id).await.map(Json)
}

/// create_category
///
/// [Admin Route] The slug is derived from the name.
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category created", body = Category),
        (status = 400, description = "Name already used"),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn create_category(
    principal: AuthUser,
    State(content): State<ContentService>,
    Json(payload): Json<CategoryRequest>,
) -> AppResult<Json<Category>> {
    content
        .create_category(&payload.name, &principal)
        .await
        .map(Json)
}

/// update_category
///
/// [Admin Route] Renaming regenerates the slug.
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = Uuid, Path, description = "Category id")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn update_category(
    principal: AuthUser,
    State(content): State<ContentService>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryRequest>,
) -> AppResult<Json<Category>> {
    content
        .update_category(id, &payload.name, &principal)
        .await
        .map(Json)
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    principal: AuthUser,
    State(content): State<ContentService>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    content.delete_category(id, &principal).await?;
    Ok(Json(MessageResponse::new("Category deleted")))
}
