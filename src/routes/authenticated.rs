use crate::{AppState, handlers};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
};

/// Authenticated Router Module
///
/// Routes for any active user (AGENT or ADMIN). The `AuthUser` middleware on the router
/// layer above rejects anonymous and deactivated callers with 401; ownership checks
/// happen in the services. The two upload routes accept bodies up to `upload_limit` bytes
/// instead of axum's 2 MB default.
pub fn authenticated_routes(upload_limit: usize) -> Router<AppState> {
    Router::<AppState>::new()
        .route("/api/users/me", get(handlers::users::get_me))
        // GET/PUT /api/users/{id}
        // Self-or-admin; `role` and `active` changes are admin-only.
        .route(
            "/api/users/{id}",
            get(handlers::users::get_user).put(handlers::users::update_user),
        )
        // --- Listings ---
        .route("/api/properties", post(handlers::properties::create_property))
        .route(
            "/api/properties/{id}",
            patch(handlers::properties::update_property)
                .delete(handlers::properties::delete_property),
        )
        .route(
            "/api/properties/{id}/images",
            post(handlers::properties::upload_property_image)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/properties/{id}/images/{image_id}/main",
            put(handlers::properties::set_main_image),
        )
        .route(
            "/api/properties/{id}/images/{image_id}",
            delete(handlers::properties::delete_property_image),
        )
        .route(
            "/api/properties/{id}/features",
            post(handlers::properties::add_property_feature),
        )
        .route(
            "/api/properties/{id}/features/{feature_id}",
            delete(handlers::properties::delete_property_feature),
        )
        // --- Blog ---
        .route("/api/posts", post(handlers::posts::create_post))
        .route(
            "/api/posts/{id}",
            put(handlers::posts::update_post).delete(handlers::posts::delete_post),
        )
        .route(
            "/api/posts/{id}/cover-image",
            post(handlers::posts::upload_post_cover)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
}
