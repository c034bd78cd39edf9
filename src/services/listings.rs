use std::collections::HashMap;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    models::{
        CreatePropertyRequest, DEFAULT_FEATURED_LIMIT, Feature, Image, MAX_PAGE_LIMIT, NewImage,
        Property, PropertyFilter, PropertyPatch, PropertyResponse,
    },
    policy,
    repository::RepositoryState,
    services::{MediaUpload, unique_slug},
    slug::SlugScope,
    storage::StorageState,
};

/// ListingService
///
/// Property listings with their images and features.
#[derive(Clone)]
pub struct ListingService {
    repo: RepositoryState,
    storage: StorageState,
    media_folder: String,
}

impl ListingService {
    pub fn new(repo: RepositoryState, storage: StorageState, media_folder: impl Into<String>) -> Self {
        Self {
            repo,
            storage,
            media_folder: media_folder.into(),
        }
    }

    /// Attaches images and features to a page of properties with one query per collection.
    async fn hydrate(&self, properties: Vec<Property>) -> AppResult<Vec<PropertyResponse>> {
        if properties.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = properties.iter().map(|p| p.id).collect();

        let mut images: HashMap<Uuid, Vec<Image>> = HashMap::new();
        for image in self.repo.images_for(&ids).await? {
            images.entry(image.property_id).or_default().push(image);
        }
        let mut features: HashMap<Uuid, Vec<Feature>> = HashMap::new();
        for feature in self.repo.features_for(&ids).await? {
            features.entry(feature.property_id).or_default().push(feature);
        }

        Ok(properties
            .into_iter()
            .map(|property| PropertyResponse {
                images: images.remove(&property.id).unwrap_or_default(),
                features: features.remove(&property.id).unwrap_or_default(),
                property,
            })
            .collect())
    }

    async fn hydrate_one(&self, property: Property) -> AppResult<PropertyResponse> {
        self.hydrate(vec![property])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("hydration lost a property".to_string()))
    }

    async fn load(&self, id: Uuid) -> AppResult<Property> {
        self.repo
            .get_property(id)
            .await?
            .ok_or_else(|| AppError::not_found("property"))
    }

    /// Loads the property and checks that `principal` may modify it.
    async fn load_owned(&self, id: Uuid, principal: &AuthUser) -> AppResult<Property> {
        let property = self.load(id).await?;
        policy::require_owner_or_admin(principal, property.user_id)?;
        Ok(property)
    }

    pub async fn search(&self, filter: &PropertyFilter) -> AppResult<Vec<PropertyResponse>> {
        let properties = self
            .repo
            .search_properties(filter, filter.pagination())
            .await?;
        self.hydrate(properties).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<PropertyResponse> {
        let property = self.load(id).await?;
        self.hydrate_one(property).await
    }

    pub async fn get_by_slug(&self, slug: &str) -> AppResult<PropertyResponse> {
        let property = self
            .repo
            .get_property_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("property"))?;
        self.hydrate_one(property).await
    }

    /// Featured ACTIVE listings, newest first. `limit` defaults to 6.
    pub async fn featured(&self, limit: Option<i64>) -> AppResult<Vec<PropertyResponse>> {
        let limit = limit
            .unwrap_or(DEFAULT_FEATURED_LIMIT)
            .clamp(0, MAX_PAGE_LIMIT);
        let properties = self.repo.featured_properties(limit).await?;
        self.hydrate(properties).await
    }

    #[instrument(skip(self, req, principal), fields(owner = %principal.id))]
    pub async fn create(
        &self,
        req: CreatePropertyRequest,
        principal: &AuthUser,
    ) -> AppResult<PropertyResponse> {
        if req.title.trim().is_empty() {
            return Err(AppError::BadRequest("title must not be empty".to_string()));
        }

        let slug = unique_slug(self.repo.as_ref(), SlugScope::Property, &req.title, None).await?;

        let property = self
            .repo
            .create_property(&req, &slug, principal.id)
            .await?;
        info!(property_id = %property.id, slug = %property.slug, "property created");

        Ok(PropertyResponse {
            property,
            images: Vec::new(),
            features: Vec::new(),
        })
    }

    /// patch
    ///
    /// Only the fields present in `patch` change. The slug is kept even when the title does.
    #[instrument(skip(self, patch, principal), fields(user_id = %principal.id))]
    pub async fn patch(
        &self,
        id: Uuid,
        patch: PropertyPatch,
        principal: &AuthUser,
    ) -> AppResult<PropertyResponse> {
        let current = self.load_owned(id, principal).await?;

        if patch.is_empty() {
            return self.hydrate_one(current).await;
        }

        let updated = self
            .repo
            .update_property(id, &patch)
            .await?
            .ok_or_else(|| AppError::not_found("property"))?;
        info!(property_id = %id, "property updated");
        self.hydrate_one(updated).await
    }

    /// delete
    ///
    /// Stored pictures are destroyed best-effort: a media-store failure is logged and the
    /// property is deleted anyway.
    #[instrument(skip(self, principal), fields(user_id = %principal.id))]
    pub async fn delete(&self, id: Uuid, principal: &AuthUser) -> AppResult<()> {
        self.load_owned(id, principal).await?;

        for image in self.repo.images_for(&[id]).await? {
            if let Err(e) = self.storage.destroy(&image.public_id).await {
                warn!(image_id = %image.id, reference = %image.public_id, error = %e, "failed to destroy stored image");
            }
        }

        self.repo.delete_property(id).await?;
        info!(property_id = %id, "property deleted");
        Ok(())
    }

    /// add_image
    ///
    /// Uploads first; nothing is written when the media store rejects the file. A main
    /// image replaces the previous main image of the property.
    #[instrument(skip(self, upload, principal), fields(user_id = %principal.id, size = upload.bytes.len()))]
    pub async fn add_image(
        &self,
        property_id: Uuid,
        upload: MediaUpload,
        main: bool,
        principal: &AuthUser,
    ) -> AppResult<Image> {
        self.load_owned(property_id, principal).await?;

        let key = format!("properties/{}-{}", property_id, Uuid::new_v4());
        let stored = self
            .storage
            .upload(&self.media_folder, &key, upload.bytes, &upload.content_type)
            .await
            .map_err(AppError::Upstream)?;

        let image = self
            .repo
            .insert_image(NewImage {
                url: stored.url,
                public_id: stored.reference,
                property_id,
                main,
            })
            .await?;
        info!(property_id = %property_id, image_id = %image.id, main, "image added");
        Ok(image)
    }

    /// Looks up an image and checks it belongs to `property_id`.
    async fn image_of(&self, property_id: Uuid, image_id: Uuid) -> AppResult<Image> {
        let image = self
            .repo
            .get_image(image_id)
            .await?
            .ok_or_else(|| AppError::not_found("image"))?;
        if image.property_id != property_id {
            return Err(AppError::BadRequest(
                "image does not belong to this property".to_string(),
            ));
        }
        Ok(image)
    }

    #[instrument(skip(self, principal), fields(user_id = %principal.id))]
    pub async fn set_main_image(
        &self,
        property_id: Uuid,
        image_id: Uuid,
        principal: &AuthUser,
    ) -> AppResult<Image> {
        self.load_owned(property_id, principal).await?;
        self.image_of(property_id, image_id).await?;

        let image = self
            .repo
            .set_main_image(property_id, image_id)
            .await?
            .ok_or_else(|| AppError::not_found("image"))?;
        info!(property_id = %property_id, image_id = %image_id, "main image changed");
        Ok(image)
    }

    #[instrument(skip(self, principal), fields(user_id = %principal.id))]
    pub async fn remove_image(
        &self,
        property_id: Uuid,
        image_id: Uuid,
        principal: &AuthUser,
    ) -> AppResult<()> {
        self.load_owned(property_id, principal).await?;
        let image = self.image_of(property_id, image_id).await?;

        if let Err(e) = self.storage.destroy(&image.public_id).await {
            warn!(image_id = %image.id, reference = %image.public_id, error = %e, "failed to destroy stored image");
        }
        self.repo.delete_image(image_id).await?;
        info!(property_id = %property_id, image_id = %image_id, "image removed");
        Ok(())
    }

    #[instrument(skip(self, principal), fields(user_id = %principal.id))]
    pub async fn add_feature(
        &self,
        property_id: Uuid,
        name: &str,
        principal: &AuthUser,
    ) -> AppResult<Feature> {
        self.load_owned(property_id, principal).await?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest(
                "feature name must not be empty".to_string(),
            ));
        }

        let feature = self.repo.insert_feature(property_id, name).await?;
        info!(property_id = %property_id, feature_id = %feature.id, "feature added");
        Ok(feature)
    }

    #[instrument(skip(self, principal), fields(user_id = %principal.id))]
    pub async fn remove_feature(
        &self,
        property_id: Uuid,
        feature_id: Uuid,
        principal: &AuthUser,
    ) -> AppResult<()> {
        self.load_owned(property_id, principal).await?;

        let feature = self
            .repo
            .get_feature(feature_id)
            .await?
            .ok_or_else(|| AppError::not_found("feature"))?;
        if feature.property_id != property_id {
            return Err(AppError::BadRequest(
                "feature does not belong to this property".to_string(),
            ));
        }

        self.repo.delete_feature(feature_id).await?;
        info!(property_id = %property_id, feature_id = %feature_id, "feature removed");
        Ok(())
    }
}
