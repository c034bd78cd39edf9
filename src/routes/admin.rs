use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Admin Router Module
///
/// Routes reserved to the ADMIN role. The router is wrapped in the admin middleware,
/// which authenticates the caller and checks the role before the handler runs.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // --- Accounts ---
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        // DELETE /api/users/{id}
        // Refused with 400 when the target is the last remaining ADMIN.
        .route("/api/users/{id}", delete(handlers::users::delete_user))
        // --- Blog taxonomy ---
        .route("/api/categories", post(handlers::categories::create_category))
        .route(
            "/api/categories/{id}",
            put(handlers::categories::update_category)
                .delete(handlers::categories::delete_category),
        )
        // GET /api/stats/dashboard
        .route(
            "/api/stats/dashboard",
            get(handlers::stats::get_dashboard_stats),
        )
}
