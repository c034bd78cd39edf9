use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enumerations (mapped to Postgres enum types) ---

/// Role
///
/// The RBAC field of a user. Stored as the `user_role` Postgres enum and serialized
/// as `"ADMIN"` / `"AGENT"`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, TS, ToSchema, Default,
)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum Role {
    Admin,
    #[default]
    Agent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Agent => "AGENT",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PropertyStatus
///
/// Commercial state of a listing. New listings start as `ACTIVE`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, TS, ToSchema, Default,
)]
#[sqlx(type_name = "property_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum PropertyStatus {
    #[default]
    Active,
    Sold,
    Reserved,
    Inactive,
}

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// Canonical identity record from the `users` table. Carries the password hash, so it is
/// never serialized; handlers answer with `UserResponse` instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// UserResponse
///
/// Public view of a `User` (everything except the password hash).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            active: user.active,
            created_at: user.created_at,
        }
    }
}

/// Property
///
/// A listing row from the `properties` table. `user_id` is the owning agent.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Property {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub address: Option<String>,
    pub zip_code: Option<String>,
    pub city: String,
    pub province: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area: f64,
    pub year_built: Option<i32>,
    pub energy_rating: String,
    pub property_type: String,
    pub featured: bool,
    pub status: PropertyStatus,
    pub user_id: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Image
///
/// A picture attached to a property. `public_id` is the media-store reference used to
/// destroy the stored object; at most one image per property has `main = true`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Image {
    pub id: Uuid,
    pub url: String,
    pub public_id: String,
    pub property_id: Uuid,
    pub main: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Feature {
    pub id: Uuid,
    pub name: String,
    pub property_id: Uuid,
}

/// PropertyResponse
///
/// A property together with its owned collections, as returned by every listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PropertyResponse {
    #[serde(flatten)]
    pub property: Property,
    pub images: Vec<Image>,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Post
///
/// A blog entry from the `posts` table. Drafts have `published = false`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Post {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub published: bool,
    pub user_id: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PostResponse {
    #[serde(flatten)]
    pub post: Post,
    pub categories: Vec<Category>,
}

/// PostCategoryRow
///
/// Internal row shape of the `post_categories` ⋈ `categories` join, used to attach
/// categories to a page of posts with a single query.
#[derive(Debug, Clone, FromRow)]
pub struct PostCategoryRow {
    pub post_id: Uuid,
    #[sqlx(flatten)]
    pub category: Category,
}

// --- Internal write models (built by the services, consumed by the repository) ---

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
}

/// UserChanges
///
/// Already-validated user update; the password has been hashed by the service.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewImage {
    pub url: String,
    pub public_id: String,
    pub property_id: Uuid,
    pub main: bool,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub published: bool,
    pub user_id: Uuid,
    pub category_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<Option<String>>,
    pub published: Option<bool>,
    // Replaces the whole category set when present.
    pub category_ids: Option<Vec<Uuid>>,
}

// --- Request Payloads (Input Schemas) ---

/// Deserializes a field that distinguishes "absent" (`None`, via `#[serde(default)]`)
/// from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn default_city() -> String {
    "Zaragoza".to_string()
}

/// TokenRequest
///
/// OAuth2 password-grant style form (`application/x-www-form-urlencoded`) accepted by
/// `POST /api/token`. `username` carries the email.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// TokenResponse
///
/// Keeps the OAuth2 snake_case field names (`access_token`, `token_type`).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Defaults to `AGENT`.
    #[serde(default)]
    pub role: Option<Role>,
}

/// UpdateUserRequest
///
/// Partial update; omitted fields are preserved. `role` and `active` may only be changed
/// by an administrator.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreatePropertyRequest {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default = "default_city")]
    pub province: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area: f64,
    #[serde(default)]
    pub year_built: Option<i32>,
    pub energy_rating: String,
    pub property_type: String,
    #[serde(default)]
    pub featured: bool,
}

/// PropertyPatch
///
/// Partial update payload for `PATCH /api/properties/{id}`.
///
/// Plain `Option<T>` fields are omit-only: absent (or `null`) leaves the column untouched.
/// The `Option<Option<T>>` fields back nullable columns, where an explicit `null` clears
/// the value and an absent key preserves it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PropertyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub zip_code: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub longitude: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i32>)]
    pub year_built: Option<Option<i32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PropertyStatus>,
}

impl PropertyPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.location.is_none()
            && self.address.is_none()
            && self.zip_code.is_none()
            && self.city.is_none()
            && self.province.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.bedrooms.is_none()
            && self.bathrooms.is_none()
            && self.area.is_none()
            && self.year_built.is_none()
            && self.energy_rating.is_none()
            && self.property_type.is_none()
            && self.featured.is_none()
            && self.status.is_none()
    }
}

/// FeatureRequest
///
/// Body of `POST /api/properties/{id}/features`. Also accepts the legacy `feature_name` key.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FeatureRequest {
    #[serde(alias = "feature_name")]
    pub feature_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategoryRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub published: bool,
    /// Ids that do not resolve to an existing category are skipped.
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
}

/// UpdatePostRequest
///
/// Partial update for `PUT /api/posts/{id}`. `category_ids`, when present (even as an empty
/// list), replaces the whole association set; when absent the associations are untouched.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdatePostRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub excerpt: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<Uuid>>,
}

// --- Query Parameters ---

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;
pub const DEFAULT_FEATURED_LIMIT: i64 = 6;

/// Pagination
///
/// Offset-based paging shared by every listing endpoint. A `limit` of 0 yields an empty page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn new(skip: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            skip: skip.unwrap_or(0).max(0),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(0, MAX_PAGE_LIMIT),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// PropertyFilter
///
/// Query parameters of `GET /api/properties`. Every filter is optional and the provided
/// ones are AND-combined. The snake_case spellings are accepted as aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PropertyFilter {
    pub status: Option<PropertyStatus>,
    #[serde(alias = "min_price")]
    pub min_price: Option<f64>,
    #[serde(alias = "max_price")]
    pub max_price: Option<f64>,
    /// Minimum number of bedrooms (inclusive).
    pub bedrooms: Option<i32>,
    #[serde(alias = "property_type")]
    pub property_type: Option<String>,
    /// Substring match on the location.
    pub location: Option<String>,
    pub featured: Option<bool>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl PropertyFilter {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.skip, self.limit)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeaturedQuery {
    pub limit: Option<i64>,
}

/// PostFilter
///
/// Query parameters of `GET /api/posts`. `category` is a category slug.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PostFilter {
    pub published: Option<bool>,
    pub category: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl PostFilter {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.skip, self.limit)
    }
}

// --- Dashboard Schemas (Output) ---

/// StatusCounts
///
/// Raw per-status listing counts as read from storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub active: i64,
    pub sold: i64,
    pub reserved: i64,
    pub inactive: i64,
}

/// DashboardStats
///
/// Output schema of `GET /api/stats/dashboard`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    pub active_properties: i64,
    pub total_properties: i64,
    pub sold_properties: i64,
    pub reserved_properties: i64,
    pub inactive_properties: i64,
    pub total_posts: i64,
    pub published_posts: i64,
    pub draft_posts: i64,
    pub total_users: i64,
    pub total_categories: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MessageResponse {
    pub detail: String,
}

impl MessageResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
