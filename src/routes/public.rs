use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Unauthenticated endpoints: health, login and every read of the catalogue and blog.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/", get(handlers::root))
        .route("/api/health", get(handlers::health))
        // POST /api/token
        // OAuth2 password form; `username` carries the email.
        .route("/api/token", post(handlers::auth::login_for_access_token))
        // --- Catalogue ---
        .route("/api/properties", get(handlers::properties::list_properties))
        .route("/api/properties/{id}", get(handlers::properties::get_property))
        .route(
            "/api/properties/slug/{slug}",
            get(handlers::properties::get_property_by_slug),
        )
        .route(
            "/api/featured-properties",
            get(handlers::properties::get_featured_properties),
        )
        // --- Blog ---
        .route("/api/categories", get(handlers::categories::list_categories))
        .route("/api/categories/{id}", get(handlers::categories::get_category))
        // Drafts are visible here as well; `?published=true` narrows to published posts.
        .route("/api/posts", get(handlers::posts::list_posts))
        .route("/api/posts/{id}", get(handlers::posts::get_post))
        .route("/api/posts/slug/{slug}", get(handlers::posts::get_post_by_slug))
}
