use std::collections::HashMap;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    models::{
        Category, CreatePostRequest, NewPost, Post, PostChanges, PostFilter, PostResponse,
        UpdatePostRequest,
    },
    policy,
    repository::RepositoryState,
    services::{MediaUpload, unique_slug},
    slug::SlugScope,
    storage::{self, StorageState},
};

/// ContentService
///
/// The blog: categories and posts, including post cover images.
#[derive(Clone)]
pub struct ContentService {
    repo: RepositoryState,
    storage: StorageState,
    media_folder: String,
}

fn cover_key(post_id: Uuid) -> String {
    format!("posts/{}", post_id)
}

fn require_name(name: &str) -> AppResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        Err(AppError::BadRequest("name must not be empty".to_string()))
    } else {
        Ok(name)
    }
}

impl ContentService {
    pub fn new(repo: RepositoryState, storage: StorageState, media_folder: impl Into<String>) -> Self {
        Self {
            repo,
            storage,
            media_folder: media_folder.into(),
        }
    }

    // --- Categories ---

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.repo.list_categories().await
    }

    pub async fn get_category(&self, id: Uuid) -> AppResult<Category> {
        self.repo
            .get_category(id)
            .await?
            .ok_or_else(|| AppError::not_found("category"))
    }

    #[instrument(skip(self, principal), fields(user_id = %principal.id))]
    pub async fn create_category(&self, name: &str, principal: &AuthUser) -> AppResult<Category> {
        policy::require_admin(principal)?;
        let name = require_name(name)?;

        let slug = unique_slug(self.repo.as_ref(), SlugScope::Category, name, None).await?;
        let category = self.repo.create_category(name, &slug).await?;
        info!(category_id = %category.id, slug = %category.slug, "category created");
        Ok(category)
    }

    /// update_category
    ///
    /// The slug is regenerated only when the name actually changes.
    #[instrument(skip(self, principal), fields(user_id = %principal.id))]
    pub async fn update_category(
        &self,
        id: Uuid,
        name: &str,
        principal: &AuthUser,
    ) -> AppResult<Category> {
        policy::require_admin(principal)?;
        let name = require_name(name)?;
        let current = self.get_category(id).await?;

        let slug = if current.name == name {
            current.slug
        } else {
            unique_slug(self.repo.as_ref(), SlugScope::Category, name, Some(id)).await?
        };

        let category = self
            .repo
            .update_category(id, name, &slug)
            .await?
            .ok_or_else(|| AppError::not_found("category"))?;
        info!(category_id = %id, slug = %category.slug, "category updated");
        Ok(category)
    }

    #[instrument(skip(self, principal), fields(user_id = %principal.id))]
    pub async fn delete_category(&self, id: Uuid, principal: &AuthUser) -> AppResult<()> {
        policy::require_admin(principal)?;
        self.get_category(id).await?;
        self.repo.delete_category(id).await?;
        info!(category_id = %id, "category deleted");
        Ok(())
    }

    // --- Posts ---

    async fn hydrate(&self, posts: Vec<Post>) -> AppResult<Vec<PostResponse>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();

        let mut categories: HashMap<Uuid, Vec<Category>> = HashMap::new();
        for row in self.repo.categories_for_posts(&ids).await? {
            categories.entry(row.post_id).or_default().push(row.category);
        }

        Ok(posts
            .into_iter()
            .map(|post| PostResponse {
                categories: categories.remove(&post.id).unwrap_or_default(),
                post,
            })
            .collect())
    }

    async fn hydrate_one(&self, post: Post) -> AppResult<PostResponse> {
        self.hydrate(vec![post])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("hydration lost a post".to_string()))
    }

    async fn load_post(&self, id: Uuid) -> AppResult<Post> {
        self.repo
            .get_post(id)
            .await?
            .ok_or_else(|| AppError::not_found("post"))
    }

    async fn load_owned_post(&self, id: Uuid, principal: &AuthUser) -> AppResult<Post> {
        let post = self.load_post(id).await?;
        policy::require_owner_or_admin(principal, post.user_id)?;
        Ok(post)
    }

    /// Keeps the ids that resolve to an existing category, without duplicates.
    async fn existing_categories(&self, ids: &[Uuid]) -> AppResult<Vec<Uuid>> {
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            if found.contains(id) {
                continue;
            }
            if self.repo.get_category(*id).await?.is_some() {
                found.push(*id);
            }
        }
        Ok(found)
    }

    /// list_posts
    ///
    /// Drafts are included unless `published` is given; `category` filters by category slug.
    pub async fn list_posts(&self, filter: &PostFilter) -> AppResult<Vec<PostResponse>> {
        let posts = self.repo.list_posts(filter, filter.pagination()).await?;
        self.hydrate(posts).await
    }

    pub async fn get_post(&self, id: Uuid) -> AppResult<PostResponse> {
        let post = self.load_post(id).await?;
        self.hydrate_one(post).await
    }

    pub async fn get_post_by_slug(&self, slug: &str) -> AppResult<PostResponse> {
        let post = self
            .repo
            .get_post_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("post"))?;
        self.hydrate_one(post).await
    }

    /// create_post
    ///
    /// Category ids that do not resolve to an existing category are skipped silently.
    #[instrument(skip(self, req, principal), fields(user_id = %principal.id))]
    pub async fn create_post(
        &self,
        req: CreatePostRequest,
        principal: &AuthUser,
    ) -> AppResult<PostResponse> {
        if req.title.trim().is_empty() {
            return Err(AppError::BadRequest("title must not be empty".to_string()));
        }

        let slug = unique_slug(self.repo.as_ref(), SlugScope::Post, &req.title, None).await?;
        let category_ids = self.existing_categories(&req.category_ids).await?;

        let post = self
            .repo
            .create_post(NewPost {
                slug,
                title: req.title,
                content: req.content,
                excerpt: req.excerpt,
                published: req.published,
                user_id: principal.id,
                category_ids,
            })
            .await?;

        info!(post_id = %post.id, slug = %post.slug, "post created");
        self.hydrate_one(post).await
    }

    /// update_post
    ///
    /// A new title regenerates the slug. `category_ids`, when present, replaces the whole
    /// association set (an empty list clears it). Category ids are resolved before anything
    /// is written, and the row and its categories are stored together.
    #[instrument(skip(self, req, principal), fields(user_id = %principal.id))]
    pub async fn update_post(
        &self,
        id: Uuid,
        req: UpdatePostRequest,
        principal: &AuthUser,
    ) -> AppResult<PostResponse> {
        let current = self.load_owned_post(id, principal).await?;

        let category_ids = match &req.category_ids {
            Some(ids) => Some(self.existing_categories(ids).await?),
            None => None,
        };
        let mut changes = PostChanges {
            content: req.content,
            excerpt: req.excerpt,
            published: req.published,
            category_ids,
            ..PostChanges::default()
        };
        if let Some(title) = req.title {
            if title.trim().is_empty() {
                return Err(AppError::BadRequest("title must not be empty".to_string()));
            }
            if title != current.title {
                changes.slug =
                    Some(unique_slug(self.repo.as_ref(), SlugScope::Post, &title, Some(id)).await?);
            }
            changes.title = Some(title);
        }

        let post = self
            .repo
            .update_post(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("post"))?;

        info!(post_id = %id, slug = %post.slug, "post updated");
        self.hydrate_one(post).await
    }

    /// delete_post
    ///
    /// The cover image is destroyed best-effort before the post row goes.
    #[instrument(skip(self, principal), fields(user_id = %principal.id))]
    pub async fn delete_post(&self, id: Uuid, principal: &AuthUser) -> AppResult<()> {
        let post = self.load_owned_post(id, principal).await?;

        if post.cover_image.is_some() {
            let reference = storage::object_key(&self.media_folder, &cover_key(id));
            if let Err(e) = self.storage.destroy(&reference).await {
                warn!(post_id = %id, reference = %reference, error = %e, "failed to destroy cover image");
            }
        }

        self.repo.delete_post(id).await?;
        info!(post_id = %id, "post deleted");
        Ok(())
    }

    /// upload_cover
    ///
    /// Covers live under a fixed key per post, so a re-upload overwrites the previous file.
    #[instrument(skip(self, upload, principal), fields(user_id = %principal.id, size = upload.bytes.len()))]
    pub async fn upload_cover(
        &self,
        post_id: Uuid,
        upload: MediaUpload,
        principal: &AuthUser,
    ) -> AppResult<PostResponse> {
        self.load_owned_post(post_id, principal).await?;

        let stored = self
            .storage
            .upload(
                &self.media_folder,
                &cover_key(post_id),
                upload.bytes,
                &upload.content_type,
            )
            .await
            .map_err(AppError::Upstream)?;

        let post = self
            .repo
            .set_post_cover(post_id, &stored.url)
            .await?
            .ok_or_else(|| AppError::not_found("post"))?;
        info!(post_id = %post_id, url = %stored.url, "cover image uploaded");
        self.hydrate_one(post).await
    }
}
