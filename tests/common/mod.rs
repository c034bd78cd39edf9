#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Duration, TimeZone, Utc};
use realty_portal::{
    AppConfig, AppState, create_router,
    auth::{self, AuthUser},
    error::AppError,
    models::{
        Category, CreatePropertyRequest, Feature, Image, NewImage, NewPost, NewUser, Pagination,
        Post, PostCategoryRow, PostChanges, PostFilter, Property, PropertyFilter, PropertyPatch,
        PropertyStatus, Role, StatusCounts, User, UserChanges,
    },
    repository::{Repository, RepositoryState},
    services::{ContentService, ListingService, UserService},
    slug::SlugScope,
    storage::{MockStorageService, StorageState},
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use uuid::Uuid;

pub const PASSWORD: &str = "correct-horse-battery";

// --- In-memory Repository ---

#[derive(Default)]
struct Tables {
    tick: i64,
    users: Vec<User>,
    properties: Vec<Property>,
    images: Vec<Image>,
    features: Vec<Feature>,
    categories: Vec<Category>,
    posts: Vec<Post>,
    post_categories: Vec<(Uuid, Uuid)>,
}

impl Tables {
    /// Strictly increasing timestamps so "newest first" ordering is deterministic.
    fn now(&mut self) -> DateTime<Utc> {
        self.tick += 1;
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::milliseconds(self.tick)
    }

    fn link_categories(&mut self, post_id: Uuid, category_ids: &[Uuid]) {
        for category_id in category_ids {
            if !self.post_categories.contains(&(post_id, *category_id)) {
                self.post_categories.push((post_id, *category_id));
            }
        }
    }
}

fn duplicate(constraint: &str) -> AppError {
    AppError::Conflict(format!("duplicate value violates {}", constraint))
}

fn page<T>(items: Vec<T>, page: Pagination) -> Vec<T> {
    items
        .into_iter()
        .skip(page.skip as usize)
        .take(page.limit as usize)
        .collect()
}

/// InMemoryRepository
///
/// `Repository` double honouring the same unique and foreign-key constraints as the
/// Postgres schema, so services behave as they would against the database.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: Mutex<Tables>,
    fail_category_reads: AtomicBool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `get_category` call fail as a lost connection would.
    pub fn fail_category_reads(&self) {
        self.fail_category_reads.store(true, Ordering::SeqCst);
    }

    pub fn property_count(&self) -> usize {
        self.tables.lock().unwrap().properties.len()
    }

    pub fn image_count(&self) -> usize {
        self.tables.lock().unwrap().images.len()
    }

    pub fn post_count(&self) -> usize {
        self.tables.lock().unwrap().posts.len()
    }

    pub fn association_count(&self) -> usize {
        self.tables.lock().unwrap().post_categories.len()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.tables.lock().unwrap().users.clone())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut t = self.tables.lock().unwrap();
        if t.users.iter().any(|u| u.email == user.email) {
            return Err(duplicate("users_email_key"));
        }
        let now = t.now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            active: user.active,
            created_at: now,
            updated_at: now,
        };
        t.users.push(created.clone());
        Ok(created)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, AppError> {
        let mut t = self.tables.lock().unwrap();
        if let Some(email) = &changes.email {
            if t.users.iter().any(|u| &u.email == email && u.id != id) {
                return Err(duplicate("users_email_key"));
            }
        }
        let now = t.now();
        let Some(user) = t.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(v) = changes.name {
            user.name = v;
        }
        if let Some(v) = changes.email {
            user.email = v;
        }
        if let Some(v) = changes.password_hash {
            user.password_hash = v;
        }
        if let Some(v) = changes.role {
            user.role = v;
        }
        if let Some(v) = changes.active {
            user.active = v;
        }
        user.updated_at = now;
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        if t.properties.iter().any(|p| p.user_id == id) || t.posts.iter().any(|p| p.user_id == id)
        {
            return Err(AppError::Conflict(
                "record is still referenced by other records".to_string(),
            ));
        }
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        Ok(t.users.len() < before)
    }

    async fn count_active_admins(&self) -> Result<i64, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().filter(|u| u.role == Role::Admin && u.active).count() as i64)
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        Ok(self.tables.lock().unwrap().users.len() as i64)
    }

    async fn slug_exists(
        &self,
        scope: SlugScope,
        slug: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let t = self.tables.lock().unwrap();
        let taken = |id: Uuid, s: &str| s == slug && Some(id) != exclude;
        Ok(match scope {
            SlugScope::Property => t.properties.iter().any(|p| taken(p.id, &p.slug)),
            SlugScope::Post => t.posts.iter().any(|p| taken(p.id, &p.slug)),
            SlugScope::Category => t.categories.iter().any(|c| taken(c.id, &c.slug)),
        })
    }

    async fn search_properties(
        &self,
        filter: &PropertyFilter,
        pagination: Pagination,
    ) -> Result<Vec<Property>, AppError> {
        let t = self.tables.lock().unwrap();
        let mut found: Vec<Property> = t
            .properties
            .iter()
            .filter(|p| filter.status.is_none_or(|s| p.status == s))
            .filter(|p| filter.min_price.is_none_or(|v| p.price >= v))
            .filter(|p| filter.max_price.is_none_or(|v| p.price <= v))
            .filter(|p| filter.bedrooms.is_none_or(|v| p.bedrooms >= v))
            .filter(|p| {
                filter
                    .property_type
                    .as_ref()
                    .is_none_or(|v| &p.property_type == v)
            })
            .filter(|p| {
                filter
                    .location
                    .as_ref()
                    .is_none_or(|v| p.location.contains(v.as_str()))
            })
            .filter(|p| filter.featured.is_none_or(|v| p.featured == v))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(found, pagination))
    }

    async fn featured_properties(&self, limit: i64) -> Result<Vec<Property>, AppError> {
        let t = self.tables.lock().unwrap();
        let mut found: Vec<Property> = t
            .properties
            .iter()
            .filter(|p| p.featured && p.status == PropertyStatus::Active)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found.truncate(limit as usize);
        Ok(found)
    }

    async fn get_property(&self, id: Uuid) -> Result<Option<Property>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.properties.iter().find(|p| p.id == id).cloned())
    }

    async fn get_property_by_slug(&self, slug: &str) -> Result<Option<Property>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.properties.iter().find(|p| p.slug == slug).cloned())
    }

    async fn create_property(
        &self,
        req: &CreatePropertyRequest,
        slug: &str,
        owner: Uuid,
    ) -> Result<Property, AppError> {
        let mut t = self.tables.lock().unwrap();
        if t.properties.iter().any(|p| p.slug == slug) {
            return Err(duplicate("properties_slug_key"));
        }
        let now = t.now();
        let property = Property {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            title: req.title.clone(),
            description: req.description.clone(),
            price: req.price,
            location: req.location.clone(),
            address: req.address.clone(),
            zip_code: req.zip_code.clone(),
            city: req.city.clone(),
            province: req.province.clone(),
            latitude: req.latitude,
            longitude: req.longitude,
            bedrooms: req.bedrooms,
            bathrooms: req.bathrooms,
            area: req.area,
            year_built: req.year_built,
            energy_rating: req.energy_rating.clone(),
            property_type: req.property_type.clone(),
            featured: req.featured,
            status: PropertyStatus::Active,
            user_id: owner,
            created_at: now,
            updated_at: now,
        };
        t.properties.push(property.clone());
        Ok(property)
    }

    async fn update_property(
        &self,
        id: Uuid,
        patch: &PropertyPatch,
    ) -> Result<Option<Property>, AppError> {
        let mut t = self.tables.lock().unwrap();
        let now = t.now();
        let Some(p) = t.properties.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(v) = &patch.title {
            p.title = v.clone();
        }
        if let Some(v) = &patch.description {
            p.description = v.clone();
        }
        if let Some(v) = patch.price {
            p.price = v;
        }
        if let Some(v) = &patch.location {
            p.location = v.clone();
        }
        if let Some(v) = &patch.address {
            p.address = v.clone();
        }
        if let Some(v) = &patch.zip_code {
            p.zip_code = v.clone();
        }
        if let Some(v) = &patch.city {
            p.city = v.clone();
        }
        if let Some(v) = &patch.province {
            p.province = v.clone();
        }
        if let Some(v) = patch.latitude {
            p.latitude = v;
        }
        if let Some(v) = patch.longitude {
            p.longitude = v;
        }
        if let Some(v) = patch.bedrooms {
            p.bedrooms = v;
        }
        if let Some(v) = patch.bathrooms {
            p.bathrooms = v;
        }
        if let Some(v) = patch.area {
            p.area = v;
        }
        if let Some(v) = patch.year_built {
            p.year_built = v;
        }
        if let Some(v) = &patch.energy_rating {
            p.energy_rating = v.clone();
        }
        if let Some(v) = &patch.property_type {
            p.property_type = v.clone();
        }
        if let Some(v) = patch.featured {
            p.featured = v;
        }
        if let Some(v) = patch.status {
            p.status = v;
        }
        p.updated_at = now;
        Ok(Some(p.clone()))
    }

    async fn delete_property(&self, id: Uuid) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        t.images.retain(|i| i.property_id != id);
        t.features.retain(|f| f.property_id != id);
        let before = t.properties.len();
        t.properties.retain(|p| p.id != id);
        Ok(t.properties.len() < before)
    }

    async fn property_status_counts(&self) -> Result<StatusCounts, AppError> {
        let t = self.tables.lock().unwrap();
        let count = |s: PropertyStatus| t.properties.iter().filter(|p| p.status == s).count() as i64;
        Ok(StatusCounts {
            active: count(PropertyStatus::Active),
            sold: count(PropertyStatus::Sold),
            reserved: count(PropertyStatus::Reserved),
            inactive: count(PropertyStatus::Inactive),
        })
    }

    async fn images_for(&self, property_ids: &[Uuid]) -> Result<Vec<Image>, AppError> {
        let t = self.tables.lock().unwrap();
        let mut found: Vec<Image> = t
            .images
            .iter()
            .filter(|i| property_ids.contains(&i.property_id))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.main.cmp(&a.main).then(a.created_at.cmp(&b.created_at)));
        Ok(found)
    }

    async fn features_for(&self, property_ids: &[Uuid]) -> Result<Vec<Feature>, AppError> {
        let t = self.tables.lock().unwrap();
        let mut found: Vec<Feature> = t
            .features
            .iter()
            .filter(|f| property_ids.contains(&f.property_id))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn get_image(&self, id: Uuid) -> Result<Option<Image>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.images.iter().find(|i| i.id == id).cloned())
    }

    async fn insert_image(&self, image: NewImage) -> Result<Image, AppError> {
        let mut t = self.tables.lock().unwrap();
        if !t.properties.iter().any(|p| p.id == image.property_id) {
            return Err(AppError::Conflict(
                "record is still referenced by other records".to_string(),
            ));
        }
        if image.main {
            for other in t.images.iter_mut().filter(|i| i.property_id == image.property_id) {
                other.main = false;
            }
        }
        let now = t.now();
        let created = Image {
            id: Uuid::new_v4(),
            url: image.url,
            public_id: image.public_id,
            property_id: image.property_id,
            main: image.main,
            created_at: now,
        };
        t.images.push(created.clone());
        Ok(created)
    }

    async fn set_main_image(
        &self,
        property_id: Uuid,
        image_id: Uuid,
    ) -> Result<Option<Image>, AppError> {
        let mut t = self.tables.lock().unwrap();
        for image in t.images.iter_mut().filter(|i| i.property_id == property_id) {
            image.main = image.id == image_id;
        }
        Ok(t
            .images
            .iter()
            .find(|i| i.id == image_id && i.property_id == property_id)
            .cloned())
    }

    async fn delete_image(&self, id: Uuid) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.images.len();
        t.images.retain(|i| i.id != id);
        Ok(t.images.len() < before)
    }

    async fn insert_feature(&self, property_id: Uuid, name: &str) -> Result<Feature, AppError> {
        let mut t = self.tables.lock().unwrap();
        let feature = Feature {
            id: Uuid::new_v4(),
            name: name.to_string(),
            property_id,
        };
        t.features.push(feature.clone());
        Ok(feature)
    }

    async fn get_feature(&self, id: Uuid) -> Result<Option<Feature>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.features.iter().find(|f| f.id == id).cloned())
    }

    async fn delete_feature(&self, id: Uuid) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.features.len();
        t.features.retain(|f| f.id != id);
        Ok(t.features.len() < before)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let mut categories = self.tables.lock().unwrap().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        if self.fail_category_reads.load(Ordering::SeqCst) {
            return Err(AppError::Internal("connection lost".to_string()));
        }
        let t = self.tables.lock().unwrap();
        Ok(t.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn create_category(&self, name: &str, slug: &str) -> Result<Category, AppError> {
        let mut t = self.tables.lock().unwrap();
        if t.categories.iter().any(|c| c.name == name) {
            return Err(duplicate("categories_name_key"));
        }
        if t.categories.iter().any(|c| c.slug == slug) {
            return Err(duplicate("categories_slug_key"));
        }
        let now = t.now();
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            created_at: now,
            updated_at: now,
        };
        t.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: Uuid,
        name: &str,
        slug: &str,
    ) -> Result<Option<Category>, AppError> {
        let mut t = self.tables.lock().unwrap();
        if t.categories.iter().any(|c| c.name == name && c.id != id) {
            return Err(duplicate("categories_name_key"));
        }
        let now = t.now();
        let Some(category) = t.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        category.name = name.to_string();
        category.slug = slug.to_string();
        category.updated_at = now;
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        t.post_categories.retain(|(_, c)| *c != id);
        let before = t.categories.len();
        t.categories.retain(|c| c.id != id);
        Ok(t.categories.len() < before)
    }

    async fn count_categories(&self) -> Result<i64, AppError> {
        Ok(self.tables.lock().unwrap().categories.len() as i64)
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        pagination: Pagination,
    ) -> Result<Vec<Post>, AppError> {
        let t = self.tables.lock().unwrap();
        let category_id = match &filter.category {
            Some(slug) => match t.categories.iter().find(|c| &c.slug == slug) {
                Some(c) => Some(c.id),
                None => return Ok(Vec::new()),
            },
            None => None,
        };
        let mut found: Vec<Post> = t
            .posts
            .iter()
            .filter(|p| filter.published.is_none_or(|v| p.published == v))
            .filter(|p| {
                category_id.is_none_or(|c| t.post_categories.contains(&(p.id, c)))
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(found, pagination))
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, AppError> {
        let t = self.tables.lock().unwrap();
        Ok(t.posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, AppError> {
        let mut t = self.tables.lock().unwrap();
        if t.posts.iter().any(|p| p.slug == post.slug) {
            return Err(duplicate("posts_slug_key"));
        }
        let now = t.now();
        let created = Post {
            id: Uuid::new_v4(),
            slug: post.slug,
            title: post.title,
            content: post.content,
            excerpt: post.excerpt,
            cover_image: None,
            published: post.published,
            user_id: post.user_id,
            created_at: now,
            updated_at: now,
        };
        t.posts.push(created.clone());
        t.link_categories(created.id, &post.category_ids);
        Ok(created)
    }

    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, AppError> {
        let mut t = self.tables.lock().unwrap();
        if let Some(slug) = &changes.slug {
            if t.posts.iter().any(|p| &p.slug == slug && p.id != id) {
                return Err(duplicate("posts_slug_key"));
            }
        }
        let now = t.now();
        let Some(post) = t.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(v) = changes.slug {
            post.slug = v;
        }
        if let Some(v) = changes.title {
            post.title = v;
        }
        if let Some(v) = changes.content {
            post.content = v;
        }
        if let Some(v) = changes.excerpt {
            post.excerpt = v;
        }
        if let Some(v) = changes.published {
            post.published = v;
        }
        post.updated_at = now;
        let updated = post.clone();
        if let Some(category_ids) = changes.category_ids {
            t.post_categories.retain(|(p, _)| *p != id);
            t.link_categories(id, &category_ids);
        }
        Ok(Some(updated))
    }

    async fn set_post_cover(&self, id: Uuid, url: &str) -> Result<Option<Post>, AppError> {
        let mut t = self.tables.lock().unwrap();
        let Some(post) = t.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        post.cover_image = Some(url.to_string());
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, AppError> {
        let mut t = self.tables.lock().unwrap();
        t.post_categories.retain(|(p, _)| *p != id);
        let before = t.posts.len();
        t.posts.retain(|p| p.id != id);
        Ok(t.posts.len() < before)
    }

    async fn categories_for_posts(
        &self,
        post_ids: &[Uuid],
    ) -> Result<Vec<PostCategoryRow>, AppError> {
        let t = self.tables.lock().unwrap();
        let mut rows: Vec<PostCategoryRow> = t
            .post_categories
            .iter()
            .filter(|(post_id, _)| post_ids.contains(post_id))
            .filter_map(|(post_id, category_id)| {
                t.categories
                    .iter()
                    .find(|c| c.id == *category_id)
                    .map(|c| PostCategoryRow {
                        post_id: *post_id,
                        category: c.clone(),
                    })
            })
            .collect();
        rows.sort_by(|a, b| a.category.name.cmp(&b.category.name));
        Ok(rows)
    }

    async fn post_publish_counts(&self) -> Result<(i64, i64), AppError> {
        let t = self.tables.lock().unwrap();
        let published = t.posts.iter().filter(|p| p.published).count() as i64;
        Ok((published, t.posts.len() as i64 - published))
    }
}

// --- Fixtures ---

/// TestContext
///
/// One in-memory repository and one recording media store, shared by the services and
/// the router built from them.
pub struct TestContext {
    pub repo: Arc<InMemoryRepository>,
    pub storage: MockStorageService,
    pub config: AppConfig,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_storage(MockStorageService::new())
    }

    pub fn with_failing_storage() -> Self {
        Self::with_storage(MockStorageService::new_failing())
    }

    fn with_storage(storage: MockStorageService) -> Self {
        Self {
            repo: Arc::new(InMemoryRepository::new()),
            storage,
            config: AppConfig::default(),
        }
    }

    pub fn repo_state(&self) -> RepositoryState {
        self.repo.clone() as RepositoryState
    }

    pub fn state(&self) -> AppState {
        AppState {
            repo: self.repo_state(),
            storage: Arc::new(self.storage.clone()) as StorageState,
            config: self.config.clone(),
        }
    }

    pub fn router(&self) -> Router {
        create_router(self.state())
    }

    pub fn listings(&self) -> ListingService {
        ListingService::new(
            self.repo_state(),
            Arc::new(self.storage.clone()) as StorageState,
            self.config.media_folder.clone(),
        )
    }

    pub fn content(&self) -> ContentService {
        ContentService::new(
            self.repo_state(),
            Arc::new(self.storage.clone()) as StorageState,
            self.config.media_folder.clone(),
        )
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.repo_state())
    }

    /// Stores a user whose password is `PASSWORD`.
    pub async fn user(&self, email: &str, role: Role) -> User {
        self.user_with(email, role, true).await
    }

    pub async fn user_with(&self, email: &str, role: Role, active: bool) -> User {
        self.repo
            .create_user(NewUser {
                name: email.split('@').next().unwrap_or(email).to_string(),
                email: email.to_string(),
                password_hash: auth::hash_password(PASSWORD).unwrap(),
                role,
                active,
            })
            .await
            .unwrap()
    }

    pub fn bearer(&self, user: &User) -> String {
        format!("Bearer {}", auth::issue_token(&self.config, user).unwrap())
    }
}

pub fn principal(user: &User) -> AuthUser {
    AuthUser::from(user)
}

pub fn property_request(title: &str) -> CreatePropertyRequest {
    CreatePropertyRequest {
        title: title.to_string(),
        description: "Bright flat close to the centre".to_string(),
        price: 185_000.0,
        location: "Delicias, Zaragoza".to_string(),
        address: Some("Calle Delicias 12".to_string()),
        zip_code: Some("50017".to_string()),
        city: "Zaragoza".to_string(),
        province: "Zaragoza".to_string(),
        latitude: Some(41.6488),
        longitude: Some(-0.8891),
        bedrooms: 3,
        bathrooms: 2,
        area: 95.0,
        year_built: Some(1998),
        energy_rating: "C".to_string(),
        property_type: "piso".to_string(),
        featured: false,
    }
}
