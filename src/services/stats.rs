use tracing::instrument;

use crate::{
    auth::AuthUser, error::AppResult, models::DashboardStats, policy, repository::Repository,
};

/// dashboard_stats
///
/// Admin-only aggregate counts. The four status counts come from a single grouped query,
/// so `total_properties` always equals their sum.
#[instrument(skip(repo, principal), fields(user_id = %principal.id))]
pub async fn dashboard_stats(repo: &dyn Repository, principal: &AuthUser) -> AppResult<DashboardStats> {
    policy::require_admin(principal)?;

    let statuses = repo.property_status_counts().await?;
    let (published, drafts) = repo.post_publish_counts().await?;

    Ok(DashboardStats {
        active_properties: statuses.active,
        total_properties: statuses.active + statuses.sold + statuses.reserved + statuses.inactive,
        sold_properties: statuses.sold,
        reserved_properties: statuses.reserved,
        inactive_properties: statuses.inactive,
        total_posts: published + drafts,
        published_posts: published,
        draft_posts: drafts,
        total_users: repo.count_users().await?,
        total_categories: repo.count_categories().await?,
    })
}
