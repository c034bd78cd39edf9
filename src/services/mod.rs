//! Business operations sitting between the HTTP handlers and the repository.
//!
//! Services receive the already-authenticated `AuthUser`, run the authorization policy
//! before touching storage, and return `AppError` for every failure.

pub mod content;
pub mod listings;
pub mod stats;
pub mod users;

pub use content::ContentService;
pub use listings::ListingService;
pub use stats::dashboard_stats;
pub use users::UserService;

use uuid::Uuid;

use crate::{
    error::AppResult,
    repository::Repository,
    slug::{self, SlugScope},
};

/// MediaUpload
///
/// A file received from a multipart form, ready to be handed to the media store.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// unique_slug
///
/// Slug for `text` that is free within `scope`, ignoring the entity `exclude` (its own
/// current slug on updates).
pub(crate) async fn unique_slug(
    repo: &dyn Repository,
    scope: SlugScope,
    text: &str,
    exclude: Option<Uuid>,
) -> AppResult<String> {
    let candidate = slug::candidate_for(scope, text);
    slug::resolve_unique(&candidate, |attempt| async move {
        repo.slug_exists(scope, &attempt, exclude).await
    })
    .await
}
