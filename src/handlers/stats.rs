use axum::{Json, extract::State};

use crate::{
    auth::AuthUser, error::AppResult, models::DashboardStats, repository::RepositoryState,
    services,
};

/// get_dashboard_stats
///
/// [Admin Route] Listing, blog and account counters for the back-office dashboard.
#[utoipa::path(
    get,
    path = "/api/stats/dashboard",
    responses(
        (status = 200, description = "Dashboard counters", body = DashboardStats),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn get_dashboard_stats(
    principal: AuthUser,
    State(repo): State<RepositoryState>,
) -> AppResult<Json<DashboardStats>> {
    services::dashboard_stats(repo.as_ref(), &principal)
        .await
        .map(Json)
}
