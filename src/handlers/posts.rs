use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::AppResult,
    handlers::{MultipartForm, UploadForm},
    models::{CreatePostRequest, MessageResponse, PostFilter, PostResponse, UpdatePostRequest},
    services::ContentService,
};

/// list_posts
///
/// [Public Route] Blog posts, newest first, each with its categories. Drafts are listed
/// too unless `published` narrows the result.
#[utoipa::path(
    get,
    path = "/api/posts",
    params(PostFilter),
    responses((status = 200, description = "Posts", body = [PostResponse]))
)]
pub async fn list_posts(
    State(content): State<ContentService>,
    Query(filter): Query<PostFilter>,
) -> AppResult<Json<Vec<PostResponse>>> {
    content.list_posts(&filter).await.map(Json)
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post", body = PostResponse),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_post(
    State(content): State<ContentService>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PostResponse>> {
    content.get_post(id).await.map(Json)
}

#[utoipa::path(
    get,
    path = "/api/posts/slug/{slug}",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Post", body = PostResponse),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_post_by_slug(
    State(content): State<ContentService>,
    Path(slug): Path<String>,
) -> AppResult<Json<PostResponse>> {
    content.get_post_by_slug(&slug).await.map(Json)
}

/// create_post
///
/// [Authenticated Route] The caller becomes the author. Unknown category ids are ignored.
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 200, description = "Post created", body = PostResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_post(
    principal: AuthUser,
    State(content): State<ContentService>,
    Json(payload): Json<CreatePostRequest>,
) -> AppResult<Json<PostResponse>> {
    content.create_post(payload, &principal).await.map(Json)
}

/// update_post
///
/// [Authenticated Route] Owner-or-admin. `categoryIds` replaces the category set when
/// present.
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn update_post(
    principal: AuthUser,
    State(content): State<ContentService>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePostRequest>,
) -> AppResult<Json<PostResponse>> {
    content.update_post(id, payload, &principal).await.map(Json)
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post deleted", body = MessageResponse),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn delete_post(
    principal: AuthUser,
    State(content): State<ContentService>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    content.delete_post(id, &principal).await?;
    Ok(Json(MessageResponse::new("Post deleted")))
}

/// upload_post_cover
///
/// [Authenticated Route] Multipart `file`. Replaces any previous cover.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/cover-image",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Cover stored", body = PostResponse),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found"),
        (status = 413, description = "File exceeds the upload limit"),
        (status = 500, description = "Media store rejected the upload")
    )
)]
pub async fn upload_post_cover(
    principal: AuthUser,
    State(content): State<ContentService>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<PostResponse>> {
    let file = MultipartForm::read(multipart).await?.require_file()?;
    content.upload_cover(id, file, &principal).await.map(Json)
}
