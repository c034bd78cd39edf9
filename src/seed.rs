use tracing::{info, instrument};

use crate::{
    auth,
    error::AppResult,
    models::{NewUser, Role},
    repository::Repository,
    services::unique_slug,
    slug::SlugScope,
};

pub const DEFAULT_CATEGORIES: [&str; 5] = [
    "Noticias",
    "Consejos",
    "Mercado inmobiliario",
    "Reformas",
    "Decoración",
];

const BOOTSTRAP_ADMIN_NAME: &str = "Administrador";

/// BootstrapAdmin
///
/// Credentials of the administrator created on first start (`ADMIN_EMAIL` / `ADMIN_PASSWORD`).
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// seed_defaults
///
/// Idempotent startup seeding: creates the bootstrap administrator when its email is not
/// registered yet, and the default blog categories when there are none.
#[instrument(skip_all)]
pub async fn seed_defaults(repo: &dyn Repository, admin: Option<BootstrapAdmin>) -> AppResult<()> {
    if let Some(admin) = admin {
        if repo.get_user_by_email(&admin.email).await?.is_none() {
            let user = repo
                .create_user(NewUser {
                    name: BOOTSTRAP_ADMIN_NAME.to_string(),
                    email: admin.email,
                    password_hash: auth::hash_password(&admin.password)?,
                    role: Role::Admin,
                    active: true,
                })
                .await?;
            info!(user_id = %user.id, email = %user.email, "bootstrap administrator created");
        }
    }

    if repo.count_categories().await? == 0 {
        for name in DEFAULT_CATEGORIES {
            let slug = unique_slug(repo, SlugScope::Category, name, None).await?;
            repo.create_category(name, &slug).await?;
        }
        info!(count = DEFAULT_CATEGORIES.len(), "default categories created");
    }

    Ok(())
}
