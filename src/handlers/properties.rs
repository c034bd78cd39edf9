use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::AppResult,
    handlers::{MultipartForm, UploadForm},
    models::{
        CreatePropertyRequest, FeaturedQuery, Feature, FeatureRequest, Image, MessageResponse,
        PropertyFilter, PropertyPatch, PropertyResponse,
    },
    services::ListingService,
};

/// list_properties
///
/// [Public Route] Searches listings. Filters are optional and AND-combined; results are
/// newest first and paginated with `skip` / `limit`.
#[utoipa::path(
    get,
    path = "/api/properties",
    params(PropertyFilter),
    responses((status = 200, description = "Matching properties", body = [PropertyResponse]))
)]
pub async fn list_properties(
    State(listings): State<ListingService>,
    Query(filter): Query<PropertyFilter>,
) -> AppResult<Json<Vec<PropertyResponse>>> {
    listings.search(&filter).await.map(Json)
}

/// get_property
///
/// [Public Route]
#[utoipa::path(
    get,
    path = "/api/properties/{id}",
    params(("id" = Uuid, Path, description = "Property id")),
    responses(
        (status = 200, description = "Property", body = PropertyResponse),
        (status = 404, description = "Property not found")
    )
)]
pub async fn get_property(
    State(listings): State<ListingService>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PropertyResponse>> {
    listings.get(id).await.map(Json)
}

/// get_property_by_slug
///
/// [Public Route]
#[utoipa::path(
    get,
    path = "/api/properties/slug/{slug}",
    params(("slug" = String, Path, description = "Property slug")),
    responses(
        (status = 200, description = "Property", body = PropertyResponse),
        (status = 404, description = "Property not found")
    )
)]
pub async fn get_property_by_slug(
    State(listings): State<ListingService>,
    Path(slug): Path<String>,
) -> AppResult<Json<PropertyResponse>> {
    listings.get_by_slug(&slug).await.map(Json)
}

/// get_featured_properties
///
/// [Public Route] Featured listings that are still ACTIVE (6 by default).
#[utoipa::path(
    get,
    path = "/api/featured-properties",
    params(FeaturedQuery),
    responses((status = 200, description = "Featured properties", body = [PropertyResponse]))
)]
pub async fn get_featured_properties(
    State(listings): State<ListingService>,
    Query(query): Query<FeaturedQuery>,
) -> AppResult<Json<Vec<PropertyResponse>>> {
    listings.featured(query.limit).await.map(Json)
}

/// create_property
///
/// [Authenticated Route] The caller becomes the owner. The slug is derived from the title.
#[utoipa::path(
    post,
    path = "/api/properties",
    request_body = CreatePropertyRequest,
    responses(
        (status = 200, description = "Property created", body = PropertyResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_property(
    principal: AuthUser,
    State(listings): State<ListingService>,
    Json(payload): Json<CreatePropertyRequest>,
) -> AppResult<Json<PropertyResponse>> {
    listings.create(payload, &principal).await.map(Json)
}

/// update_property
///
/// [Authenticated Route] Owner-or-admin partial update. Only the keys present in the body
/// change; `null` clears a nullable column.
#[utoipa::path(
    patch,
    path = "/api/properties/{id}",
    params(("id" = Uuid, Path, description = "Property id")),
    request_body = PropertyPatch,
    responses(
        (status = 200, description = "Property updated", body = PropertyResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Property not found")
    )
)]
pub async fn update_property(
    principal: AuthUser,
    State(listings): State<ListingService>,
    Path(id): Path<Uuid>,
    Json(patch): Json<PropertyPatch>,
) -> AppResult<Json<PropertyResponse>> {
    listings.patch(id, patch, &principal).await.map(Json)
}

/// delete_property
///
/// [Authenticated Route] Owner-or-admin. Stored images are removed best-effort.
#[utoipa::path(
    delete,
    path = "/api/properties/{id}",
    params(("id" = Uuid, Path, description = "Property id")),
    responses(
        (status = 200, description = "Property deleted", body = MessageResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Property not found")
    )
)]
pub async fn delete_property(
    principal: AuthUser,
    State(listings): State<ListingService>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    listings.delete(id, &principal).await?;
    Ok(Json(MessageResponse::new("Property deleted")))
}

/// upload_property_image
///
/// [Authenticated Route] Multipart `file` plus optional `main` flag. A new main image
/// replaces the previous one.
#[utoipa::path(
    post,
    path = "/api/properties/{id}/images",
    params(("id" = Uuid, Path, description = "Property id")),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = Image),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Property not found"),
        (status = 413, description = "File exceeds the upload limit"),
        (status = 500, description = "Media store rejected the upload")
    )
)]
pub async fn upload_property_image(
    principal: AuthUser,
    State(listings): State<ListingService>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<Image>> {
    let mut form = MultipartForm::read(multipart).await?;
    let main = form.flag("main")?;
    let file = form.require_file()?;
    listings.add_image(id, file, main, &principal).await.map(Json)
}

/// set_main_image
///
/// [Authenticated Route] Marks one of the property's images as the main one.
#[utoipa::path(
    put,
    path = "/api/properties/{id}/images/{image_id}/main",
    params(
        ("id" = Uuid, Path, description = "Property id"),
        ("image_id" = Uuid, Path, description = "Image id")
    ),
    responses(
        (status = 200, description = "Main image set", body = Image),
        (status = 400, description = "Image belongs to another property"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Property or image not found")
    )
)]
pub async fn set_main_image(
    principal: AuthUser,
    State(listings): State<ListingService>,
    Path((id, image_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<Image>> {
    listings.set_main_image(id, image_id, &principal).await.map(Json)
}

/// delete_property_image
///
/// [Authenticated Route]
#[utoipa::path(
    delete,
    path = "/api/properties/{id}/images/{image_id}",
    params(
        ("id" = Uuid, Path, description = "Property id"),
        ("image_id" = Uuid, Path, description = "Image id")
    ),
    responses(
        (status = 200, description = "Image removed", body = MessageResponse),
        (status = 400, description = "Image belongs to another property"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Property or image not found")
    )
)]
pub async fn delete_property_image(
    principal: AuthUser,
    State(listings): State<ListingService>,
    Path((id, image_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<MessageResponse>> {
    listings.remove_image(id, image_id, &principal).await?;
    Ok(Json(MessageResponse::new("Image deleted")))
}

/// add_property_feature
///
/// [Authenticated Route]
#[utoipa::path(
    post,
    path = "/api/properties/{id}/features",
    params(("id" = Uuid, Path, description = "Property id")),
    request_body = FeatureRequest,
    responses(
        (status = 200, description = "Feature added", body = Feature),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Property not found")
    )
)]
pub async fn add_property_feature(
    principal: AuthUser,
    State(listings): State<ListingService>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FeatureRequest>,
) -> AppResult<Json<Feature>> {
    listings
        .add_feature(id, &payload.feature_name, &principal)
        .await
        .map(Json)
}

/// delete_property_feature
///
/// [Authenticated Route] The feature must belong to the property in the path.
#[utoipa::path(
    delete,
    path = "/api/properties/{id}/features/{feature_id}",
    params(
        ("id" = Uuid, Path, description = "Property id"),
        ("feature_id" = Uuid, Path, description = "Feature id")
    ),
    responses(
        (status = 200, description = "Feature removed", body = MessageResponse),
        (status = 400, description = "Feature belongs to another property"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Property or feature not found")
    )
)]
pub async fn delete_property_feature(
    principal: AuthUser,
    State(listings): State<ListingService>,
    Path((id, feature_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<MessageResponse>> {
    listings.remove_feature(id, feature_id, &principal).await?;
    Ok(Json(MessageResponse::new("Feature deleted")))
}
