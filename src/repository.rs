use crate::{
    error::AppError,
    models::{
        Category, CreatePropertyRequest, Feature, Image, NewImage, NewPost, NewUser, Pagination,
        Post, PostCategoryRow, PostChanges, PostFilter, Property, PropertyFilter, PropertyPatch,
        PropertyStatus, Role, StatusCounts, User, UserChanges,
    },
    slug::SlugScope,
};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction, query_builder::QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// Abstract contract for every persistence operation, so the services can run against
/// Postgres in production and an in-memory double in tests.
///
/// **Send + Sync + async_trait** are required to make the trait object (`Arc<dyn Repository>`)
/// shareable across Axum's asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users / Credential Store ---
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;
    // Applies only the `Some` fields of `changes`.
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, AppError>;
    async fn delete_user(&self, id: Uuid) -> Result<bool, AppError>;
    // ADMIN accounts that can still sign in.
    async fn count_active_admins(&self) -> Result<i64, AppError>;
    async fn count_users(&self) -> Result<i64, AppError>;

    // --- Slugs ---
    // True if `slug` is taken in `scope` by an entity other than `exclude`.
    async fn slug_exists(
        &self,
        scope: SlugScope,
        slug: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError>;

    // --- Properties ---
    async fn search_properties(
        &self,
        filter: &PropertyFilter,
        page: Pagination,
    ) -> Result<Vec<Property>, AppError>;
    // Featured and ACTIVE listings only.
    async fn featured_properties(&self, limit: i64) -> Result<Vec<Property>, AppError>;
    async fn get_property(&self, id: Uuid) -> Result<Option<Property>, AppError>;
    async fn get_property_by_slug(&self, slug: &str) -> Result<Option<Property>, AppError>;
    async fn create_property(
        &self,
        req: &CreatePropertyRequest,
        slug: &str,
        owner: Uuid,
    ) -> Result<Property, AppError>;
    // Applies only the fields present in `patch`.
    async fn update_property(
        &self,
        id: Uuid,
        patch: &PropertyPatch,
    ) -> Result<Option<Property>, AppError>;
    // Removes the property together with its images and features.
    async fn delete_property(&self, id: Uuid) -> Result<bool, AppError>;
    async fn property_status_counts(&self) -> Result<StatusCounts, AppError>;

    // --- Images & Features ---
    async fn images_for(&self, property_ids: &[Uuid]) -> Result<Vec<Image>, AppError>;
    async fn features_for(&self, property_ids: &[Uuid]) -> Result<Vec<Feature>, AppError>;
    async fn get_image(&self, id: Uuid) -> Result<Option<Image>, AppError>;
    // When `image.main` is set, clears the flag on the property's other images first.
    async fn insert_image(&self, image: NewImage) -> Result<Image, AppError>;
    async fn set_main_image(&self, property_id: Uuid, image_id: Uuid)
    -> Result<Option<Image>, AppError>;
    async fn delete_image(&self, id: Uuid) -> Result<bool, AppError>;
    async fn insert_feature(&self, property_id: Uuid, name: &str) -> Result<Feature, AppError>;
    async fn get_feature(&self, id: Uuid) -> Result<Option<Feature>, AppError>;
    async fn delete_feature(&self, id: Uuid) -> Result<bool, AppError>;

    // --- Categories ---
    async fn list_categories(&self) -> Result<Vec<Category>, AppError>;
    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, AppError>;
    async fn create_category(&self, name: &str, slug: &str) -> Result<Category, AppError>;
    async fn update_category(
        &self,
        id: Uuid,
        name: &str,
        slug: &str,
    ) -> Result<Option<Category>, AppError>;
    async fn delete_category(&self, id: Uuid) -> Result<bool, AppError>;
    async fn count_categories(&self) -> Result<i64, AppError>;

    // --- Posts ---
    async fn list_posts(&self, filter: &PostFilter, page: Pagination)
    -> Result<Vec<Post>, AppError>;
    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, AppError>;
    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, AppError>;
    // The post row and its category associations are written in one transaction.
    async fn create_post(&self, post: NewPost) -> Result<Post, AppError>;
    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, AppError>;
    async fn set_post_cover(&self, id: Uuid, url: &str) -> Result<Option<Post>, AppError>;
    // Removes the post and its category associations.
    async fn delete_post(&self, id: Uuid) -> Result<bool, AppError>;
    async fn categories_for_posts(&self, post_ids: &[Uuid])
    -> Result<Vec<PostCategoryRow>, AppError>;
    // (published, drafts)
    async fn post_publish_counts(&self) -> Result<(i64, i64), AppError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, active, created_at, updated_at";

const PROPERTY_COLUMNS: &str = "id, slug, title, description, price, location, address, \
     zip_code, city, province, latitude, longitude, bedrooms, bathrooms, area, year_built, \
     energy_rating, property_type, featured, status, user_id, created_at, updated_at";

const IMAGE_COLUMNS: &str = "id, url, public_id, property_id, main, created_at";

const CATEGORY_COLUMNS: &str = "id, name, slug, created_at, updated_at";

const POST_COLUMNS: &str = "id, slug, title, content, excerpt, cover_image, published, \
     user_id, created_at, updated_at";

/// Escapes the LIKE wildcards of user input so `location` is matched literally.
fn like_pattern(fragment: &str) -> String {
    let escaped = fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Links `category_ids` to the post; duplicates collapse on the composite key.
async fn write_post_categories(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
    category_ids: &[Uuid],
) -> Result<(), AppError> {
    if category_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO post_categories (post_id, category_id) \
         SELECT $1, UNNEST($2::uuid[]) ON CONFLICT DO NOTHING",
    )
    .bind(post_id)
    .bind(category_ids)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- USERS ---

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at ASC", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash, role, active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW()) RETURNING {}",
            USER_COLUMNS
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(user.name)
            .bind(user.email)
            .bind(user.password_hash)
            .bind(user.role)
            .bind(user.active)
            .fetch_one(&self.pool)
            .await?)
    }

    /// update_user
    ///
    /// Uses `COALESCE` so that only the provided columns change.
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, AppError> {
        let sql = format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                role = COALESCE($5, role),
                active = COALESCE($6, active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(changes.name)
            .bind(changes.email)
            .bind(changes.password_hash)
            .bind(changes.role)
            .bind(changes.active)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, AppError> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn count_active_admins(&self) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = $1 AND active")
            .bind(Role::Admin)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?)
    }

    // --- SLUGS ---

    async fn slug_exists(
        &self,
        scope: SlugScope,
        slug: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let table = match scope {
            SlugScope::Property => "properties",
            SlugScope::Post => "posts",
            SlugScope::Category => "categories",
        };
        // `$2 IS NULL` turns the exclusion off for creates.
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2))",
            table
        );
        Ok(sqlx::query_scalar::<_, bool>(&sql)
            .bind(slug)
            .bind(exclude)
            .fetch_one(&self.pool)
            .await?)
    }

    // --- PROPERTIES ---

    /// search_properties
    ///
    /// Assembles the optional filters with `QueryBuilder` so every value is bound, never
    /// interpolated. All provided filters are AND-combined.
    async fn search_properties(
        &self,
        filter: &PropertyFilter,
        page: Pagination,
    ) -> Result<Vec<Property>, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {} FROM properties WHERE TRUE",
            PROPERTY_COLUMNS
        ));

        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(min_price) = filter.min_price {
            builder.push(" AND price >= ").push_bind(min_price);
        }
        if let Some(max_price) = filter.max_price {
            builder.push(" AND price <= ").push_bind(max_price);
        }
        if let Some(bedrooms) = filter.bedrooms {
            builder.push(" AND bedrooms >= ").push_bind(bedrooms);
        }
        if let Some(property_type) = &filter.property_type {
            builder
                .push(" AND property_type = ")
                .push_bind(property_type.clone());
        }
        if let Some(location) = &filter.location {
            builder
                .push(" AND location LIKE ")
                .push_bind(like_pattern(location));
        }
        if let Some(featured) = filter.featured {
            builder.push(" AND featured = ").push_bind(featured);
        }

        builder
            .push(" ORDER BY created_at DESC OFFSET ")
            .push_bind(page.skip)
            .push(" LIMIT ")
            .push_bind(page.limit);

        Ok(builder
            .build_query_as::<Property>()
            .fetch_all(&self.pool)
            .await?)
    }

    async fn featured_properties(&self, limit: i64) -> Result<Vec<Property>, AppError> {
        let sql = format!(
            "SELECT {} FROM properties WHERE featured = TRUE AND status = $1 \
             ORDER BY created_at DESC LIMIT $2",
            PROPERTY_COLUMNS
        );
        Ok(sqlx::query_as::<_, Property>(&sql)
            .bind(PropertyStatus::Active)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_property(&self, id: Uuid) -> Result<Option<Property>, AppError> {
        let sql = format!("SELECT {} FROM properties WHERE id = $1", PROPERTY_COLUMNS);
        Ok(sqlx::query_as::<_, Property>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn get_property_by_slug(&self, slug: &str) -> Result<Option<Property>, AppError> {
        let sql = format!("SELECT {} FROM properties WHERE slug = $1", PROPERTY_COLUMNS);
        Ok(sqlx::query_as::<_, Property>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_property(
        &self,
        req: &CreatePropertyRequest,
        slug: &str,
        owner: Uuid,
    ) -> Result<Property, AppError> {
        let sql = format!(
            r#"
            INSERT INTO properties (
                id, slug, title, description, price, location, address, zip_code, city,
                province, latitude, longitude, bedrooms, bathrooms, area, year_built,
                energy_rating, property_type, featured, status, user_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21, NOW(), NOW())
            RETURNING {}
            "#,
            PROPERTY_COLUMNS
        );
        Ok(sqlx::query_as::<_, Property>(&sql)
            .bind(Uuid::new_v4())
            .bind(slug)
            .bind(&req.title)
            .bind(&req.description)
            .bind(req.price)
            .bind(&req.location)
            .bind(&req.address)
            .bind(&req.zip_code)
            .bind(&req.city)
            .bind(&req.province)
            .bind(req.latitude)
            .bind(req.longitude)
            .bind(req.bedrooms)
            .bind(req.bathrooms)
            .bind(req.area)
            .bind(req.year_built)
            .bind(&req.energy_rating)
            .bind(&req.property_type)
            .bind(req.featured)
            .bind(PropertyStatus::Active)
            .bind(owner)
            .fetch_one(&self.pool)
            .await?)
    }

    /// update_property
    ///
    /// Builds the `SET` list from the fields present in the patch. An explicit `null` on a
    /// nullable column binds `NULL`; absent fields never appear in the statement.
    async fn update_property(
        &self,
        id: Uuid,
        patch: &PropertyPatch,
    ) -> Result<Option<Property>, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE properties SET ");
        let mut set = builder.separated(", ");

        if let Some(v) = &patch.title {
            set.push("title = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = &patch.description {
            set.push("description = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = patch.price {
            set.push("price = ").push_bind_unseparated(v);
        }
        if let Some(v) = &patch.location {
            set.push("location = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = &patch.address {
            set.push("address = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = &patch.zip_code {
            set.push("zip_code = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = &patch.city {
            set.push("city = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = &patch.province {
            set.push("province = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = patch.latitude {
            set.push("latitude = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.longitude {
            set.push("longitude = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.bedrooms {
            set.push("bedrooms = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.bathrooms {
            set.push("bathrooms = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.area {
            set.push("area = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.year_built {
            set.push("year_built = ").push_bind_unseparated(v);
        }
        if let Some(v) = &patch.energy_rating {
            set.push("energy_rating = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = &patch.property_type {
            set.push("property_type = ").push_bind_unseparated(v.clone());
        }
        if let Some(v) = patch.featured {
            set.push("featured = ").push_bind_unseparated(v);
        }
        if let Some(v) = patch.status {
            set.push("status = ").push_bind_unseparated(v);
        }
        set.push("updated_at = NOW()");

        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {}", PROPERTY_COLUMNS));

        Ok(builder
            .build_query_as::<Property>()
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_property(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM images WHERE property_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM features WHERE property_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let res = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(res.rows_affected() > 0)
    }

    async fn property_status_counts(&self) -> Result<StatusCounts, AppError> {
        let rows = sqlx::query_as::<_, (PropertyStatus, i64)>(
            "SELECT status, COUNT(*) FROM properties GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            match status {
                PropertyStatus::Active => counts.active = count,
                PropertyStatus::Sold => counts.sold = count,
                PropertyStatus::Reserved => counts.reserved = count,
                PropertyStatus::Inactive => counts.inactive = count,
            }
        }
        Ok(counts)
    }

    // --- IMAGES & FEATURES ---

    async fn images_for(&self, property_ids: &[Uuid]) -> Result<Vec<Image>, AppError> {
        let sql = format!(
            "SELECT {} FROM images WHERE property_id = ANY($1) ORDER BY main DESC, created_at ASC",
            IMAGE_COLUMNS
        );
        Ok(sqlx::query_as::<_, Image>(&sql)
            .bind(property_ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn features_for(&self, property_ids: &[Uuid]) -> Result<Vec<Feature>, AppError> {
        Ok(sqlx::query_as::<_, Feature>(
            "SELECT id, name, property_id FROM features WHERE property_id = ANY($1) ORDER BY name",
        )
        .bind(property_ids)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_image(&self, id: Uuid) -> Result<Option<Image>, AppError> {
        let sql = format!("SELECT {} FROM images WHERE id = $1", IMAGE_COLUMNS);
        Ok(sqlx::query_as::<_, Image>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// insert_image
    ///
    /// Clearing the previous main image and inserting the new one share a transaction, so
    /// the property never ends up with two main images.
    async fn insert_image(&self, image: NewImage) -> Result<Image, AppError> {
        let mut tx = self.pool.begin().await?;

        if image.main {
            sqlx::query("UPDATE images SET main = FALSE WHERE property_id = $1")
                .bind(image.property_id)
                .execute(&mut *tx)
                .await?;
        }

        let sql = format!(
            "INSERT INTO images (id, url, public_id, property_id, main, created_at) \
             VALUES ($1, $2, $3, $4, $5, NOW()) RETURNING {}",
            IMAGE_COLUMNS
        );
        let inserted = sqlx::query_as::<_, Image>(&sql)
            .bind(Uuid::new_v4())
            .bind(image.url)
            .bind(image.public_id)
            .bind(image.property_id)
            .bind(image.main)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(inserted)
    }

    async fn set_main_image(
        &self,
        property_id: Uuid,
        image_id: Uuid,
    ) -> Result<Option<Image>, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("UPDATE images SET main = (id = $2) WHERE property_id = $1")
            .bind(property_id)
            .bind(image_id)
            .execute(&mut *tx)
            .await?;
        let sql = format!(
            "SELECT {} FROM images WHERE id = $1 AND property_id = $2",
            IMAGE_COLUMNS
        );
        let image = sqlx::query_as::<_, Image>(&sql)
            .bind(image_id)
            .bind(property_id)
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(image)
    }

    async fn delete_image(&self, id: Uuid) -> Result<bool, AppError> {
        let res = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn insert_feature(&self, property_id: Uuid, name: &str) -> Result<Feature, AppError> {
        Ok(sqlx::query_as::<_, Feature>(
            "INSERT INTO features (id, name, property_id) VALUES ($1, $2, $3) \
             RETURNING id, name, property_id",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(property_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn get_feature(&self, id: Uuid) -> Result<Option<Feature>, AppError> {
        Ok(
            sqlx::query_as::<_, Feature>("SELECT id, name, property_id FROM features WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn delete_feature(&self, id: Uuid) -> Result<bool, AppError> {
        let res = sqlx::query("DELETE FROM features WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- CATEGORIES ---

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let sql = format!("SELECT {} FROM categories ORDER BY name", CATEGORY_COLUMNS);
        Ok(sqlx::query_as::<_, Category>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        let sql = format!("SELECT {} FROM categories WHERE id = $1", CATEGORY_COLUMNS);
        Ok(sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_category(&self, name: &str, slug: &str) -> Result<Category, AppError> {
        let sql = format!(
            "INSERT INTO categories (id, name, slug, created_at, updated_at) \
             VALUES ($1, $2, $3, NOW(), NOW()) RETURNING {}",
            CATEGORY_COLUMNS
        );
        Ok(sqlx::query_as::<_, Category>(&sql)
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(slug)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_category(
        &self,
        id: Uuid,
        name: &str,
        slug: &str,
    ) -> Result<Option<Category>, AppError> {
        let sql = format!(
            "UPDATE categories SET name = $2, slug = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            CATEGORY_COLUMNS
        );
        Ok(sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .bind(name)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM post_categories WHERE category_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let res = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(res.rows_affected() > 0)
    }

    async fn count_categories(&self) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?)
    }

    // --- POSTS ---

    async fn list_posts(
        &self,
        filter: &PostFilter,
        page: Pagination,
    ) -> Result<Vec<Post>, AppError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM posts WHERE TRUE", POST_COLUMNS));

        if let Some(published) = filter.published {
            builder.push(" AND published = ").push_bind(published);
        }
        if let Some(category) = &filter.category {
            builder
                .push(
                    " AND id IN (SELECT pc.post_id FROM post_categories pc \
                     JOIN categories c ON c.id = pc.category_id WHERE c.slug = ",
                )
                .push_bind(category.clone())
                .push(")");
        }

        builder
            .push(" ORDER BY created_at DESC OFFSET ")
            .push_bind(page.skip)
            .push(" LIMIT ")
            .push_bind(page.limit);

        Ok(builder
            .build_query_as::<Post>()
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, AppError> {
        let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
        Ok(sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, AppError> {
        let sql = format!("SELECT {} FROM posts WHERE slug = $1", POST_COLUMNS);
        Ok(sqlx::query_as::<_, Post>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, AppError> {
        let sql = format!(
            "INSERT INTO posts (id, slug, title, content, excerpt, cover_image, published, user_id, \
             created_at, updated_at) VALUES ($1, $2, $3, $4, $5, NULL, $6, $7, NOW(), NOW()) \
             RETURNING {}",
            POST_COLUMNS
        );
        let mut tx = self.pool.begin().await?;
        let created = sqlx::query_as::<_, Post>(&sql)
            .bind(Uuid::new_v4())
            .bind(post.slug)
            .bind(post.title)
            .bind(post.content)
            .bind(post.excerpt)
            .bind(post.published)
            .bind(post.user_id)
            .fetch_one(&mut *tx)
            .await?;
        write_post_categories(&mut tx, created.id, &post.category_ids).await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE posts SET ");
        let mut set = builder.separated(", ");

        if let Some(v) = changes.slug {
            set.push("slug = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.title {
            set.push("title = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.content {
            set.push("content = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.excerpt {
            set.push("excerpt = ").push_bind_unseparated(v);
        }
        if let Some(v) = changes.published {
            set.push("published = ").push_bind_unseparated(v);
        }
        set.push("updated_at = NOW()");

        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {}", POST_COLUMNS));

        let mut tx = self.pool.begin().await?;
        let updated = builder
            .build_query_as::<Post>()
            .fetch_optional(&mut *tx)
            .await?;
        if let (Some(post), Some(category_ids)) = (&updated, &changes.category_ids) {
            sqlx::query("DELETE FROM post_categories WHERE post_id = $1")
                .bind(post.id)
                .execute(&mut *tx)
                .await?;
            write_post_categories(&mut tx, post.id, category_ids).await?;
        }
        tx.commit().await?;
        Ok(updated)
    }

    async fn set_post_cover(&self, id: Uuid, url: &str) -> Result<Option<Post>, AppError> {
        let sql = format!(
            "UPDATE posts SET cover_image = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            POST_COLUMNS
        );
        Ok(sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .bind(url)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM post_categories WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let res = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(res.rows_affected() > 0)
    }

    async fn categories_for_posts(
        &self,
        post_ids: &[Uuid],
    ) -> Result<Vec<PostCategoryRow>, AppError> {
        Ok(sqlx::query_as::<_, PostCategoryRow>(
            r#"
            SELECT pc.post_id, c.id, c.name, c.slug, c.created_at, c.updated_at
            FROM post_categories pc
            JOIN categories c ON c.id = pc.category_id
            WHERE pc.post_id = ANY($1)
            ORDER BY c.name
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn post_publish_counts(&self) -> Result<(i64, i64), AppError> {
        Ok(sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*) FILTER (WHERE published), COUNT(*) FILTER (WHERE NOT published) \
             FROM posts",
        )
        .fetch_one(&self.pool)
        .await?)
    }
}
