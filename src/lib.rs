use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod repository;
pub mod seed;
pub mod services;
pub mod slug;
pub mod storage;

// Routing segregated by access level (public, authenticated, admin).
pub mod routes;
use auth::AuthUser;
use error::AppError;
use routes::{admin, authenticated, public};
use services::{ContentService, ListingService, UserService};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use repository::{PostgresRepository, RepositoryState};
pub use storage::{MockStorageService, S3StorageClient, StorageState};

/// ApiDoc
///
/// Aggregates every `#[utoipa::path]` handler and every wire schema into the OpenAPI
/// document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::root, handlers::health,
        handlers::auth::login_for_access_token,
        handlers::users::get_me, handlers::users::list_users, handlers::users::create_user,
        handlers::users::get_user, handlers::users::update_user, handlers::users::delete_user,
        handlers::properties::list_properties, handlers::properties::get_property,
        handlers::properties::get_property_by_slug, handlers::properties::get_featured_properties,
        handlers::properties::create_property, handlers::properties::update_property,
        handlers::properties::delete_property, handlers::properties::upload_property_image,
        handlers::properties::set_main_image, handlers::properties::delete_property_image,
        handlers::properties::add_property_feature, handlers::properties::delete_property_feature,
        handlers::categories::list_categories, handlers::categories::get_category,
        handlers::categories::create_category, handlers::categories::update_category,
        handlers::categories::delete_category,
        handlers::posts::list_posts, handlers::posts::get_post, handlers::posts::get_post_by_slug,
        handlers::posts::create_post, handlers::posts::update_post, handlers::posts::delete_post,
        handlers::posts::upload_post_cover,
        handlers::stats::get_dashboard_stats
    ),
    components(
        schemas(
            models::Role, models::PropertyStatus, models::UserResponse, models::Property,
            models::Image, models::Feature, models::PropertyResponse, models::Category,
            models::Post, models::PostResponse, models::TokenRequest, models::TokenResponse,
            models::CreateUserRequest, models::UpdateUserRequest, models::CreatePropertyRequest,
            models::PropertyPatch, models::FeatureRequest, models::CategoryRequest,
            models::CreatePostRequest, models::UpdatePostRequest, models::DashboardStats,
            models::MessageResponse, handlers::UploadForm,
        )
    ),
    tags(
        (name = "realty-portal", description = "Real-estate listings and blog API")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// The single, cloneable container of shared dependencies. Handlers pull the part they
/// need through the `FromRef` implementations below.
#[derive(Clone)]
pub struct AppState {
    /// Persistence layer (Postgres in production).
    pub repo: RepositoryState,
    /// Media store for property images and post covers.
    pub storage: StorageState,
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for ListingService {
    fn from_ref(app_state: &AppState) -> ListingService {
        ListingService::new(
            app_state.repo.clone(),
            app_state.storage.clone(),
            app_state.config.media_folder.clone(),
        )
    }
}

impl FromRef<AppState> for ContentService {
    fn from_ref(app_state: &AppState) -> ContentService {
        ContentService::new(
            app_state.repo.clone(),
            app_state.storage.clone(),
            app_state.config.media_folder.clone(),
        )
    }
}

impl FromRef<AppState> for UserService {
    fn from_ref(app_state: &AppState) -> UserService {
        UserService::new(app_state.repo.clone())
    }
}

/// auth_middleware
///
/// Runs the `AuthUser` extractor before the handler; a missing, invalid or expired token
/// and a deactivated account are rejected with 401 here.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// admin_middleware
///
/// `auth_middleware` plus the ADMIN role check (403 otherwise).
async fn admin_middleware(
    auth_user: AuthUser,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    policy::require_admin(&auth_user)?;
    Ok(next.run(request).await)
}

/// create_router
///
/// Assembles the routing tree, the scoped auth middleware and the global observability
/// layers, and binds the application state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes(state.config.max_upload_bytes).route_layer(
                middleware::from_fn_with_state(state.clone(), auth_middleware),
            ),
        )
        .merge(
            admin::admin_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                admin_middleware,
            )),
        )
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`: tags every request span with method, URI and the
/// `x-request-id` set by `SetRequestIdLayer`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
