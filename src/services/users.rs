use tracing::{info, instrument};
use uuid::Uuid;
use validator::ValidateEmail;

use crate::{
    auth::{self, AuthUser},
    error::{AppError, AppResult},
    models::{CreateUserRequest, NewUser, Role, UpdateUserRequest, User, UserChanges, UserResponse},
    policy,
    repository::RepositoryState,
};

/// UserService
///
/// Account management. Creation, listing and deletion are admin-only; a user may read
/// and edit their own record but not their own role or active flag.
#[derive(Clone)]
pub struct UserService {
    repo: RepositoryState,
}

fn non_blank(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        Err(AppError::BadRequest(format!("{} must not be empty", field)))
    } else {
        Ok(())
    }
}

fn valid_email(email: &str) -> AppResult<()> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(AppError::BadRequest("invalid email address".to_string()))
    }
}

impl UserService {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    async fn load(&self, id: Uuid) -> AppResult<User> {
        self.repo
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::not_found("user"))
    }

    pub async fn me(&self, principal: &AuthUser) -> AppResult<UserResponse> {
        self.load(principal.id).await.map(UserResponse::from)
    }

    pub async fn list(&self, principal: &AuthUser) -> AppResult<Vec<UserResponse>> {
        policy::require_admin(principal)?;
        let users = self.repo.list_users().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get(&self, id: Uuid, principal: &AuthUser) -> AppResult<UserResponse> {
        policy::require_self_or_admin(principal, id)?;
        self.load(id).await.map(UserResponse::from)
    }

    #[instrument(skip(self, req, principal), fields(user_id = %principal.id, email = %req.email))]
    pub async fn create(
        &self,
        req: CreateUserRequest,
        principal: &AuthUser,
    ) -> AppResult<UserResponse> {
        policy::require_admin(principal)?;
        non_blank("name", &req.name)?;
        valid_email(&req.email)?;
        non_blank("password", &req.password)?;

        if self.repo.get_user_by_email(&req.email).await?.is_some() {
            return Err(AppError::Conflict("email already registered".to_string()));
        }

        let user = self
            .repo
            .create_user(NewUser {
                name: req.name,
                email: req.email,
                password_hash: auth::hash_password(&req.password)?,
                role: req.role.unwrap_or_default(),
                active: true,
            })
            .await?;
        info!(new_user_id = %user.id, role = %user.role, "user created");
        Ok(user.into())
    }

    /// update
    ///
    /// Changing `role` or `active` requires an administrator. Demoting or deactivating the
    /// last active ADMIN is refused with `Conflict`.
    #[instrument(skip(self, req, principal), fields(user_id = %principal.id))]
    pub async fn update(
        &self,
        id: Uuid,
        req: UpdateUserRequest,
        principal: &AuthUser,
    ) -> AppResult<UserResponse> {
        policy::require_self_or_admin(principal, id)?;
        if req.role.is_some() || req.active.is_some() {
            policy::require_admin(principal)?;
        }

        let target = self.load(id).await?;

        let demoted = req.role == Some(Role::Agent) || req.active == Some(false);
        if demoted && target.role == Role::Admin {
            let admins = self.repo.count_active_admins().await?;
            policy::ensure_not_last_admin(&target, admins)?;
        }

        if let Some(name) = &req.name {
            non_blank("name", name)?;
        }
        if let Some(email) = &req.email {
            valid_email(email)?;
            if let Some(other) = self.repo.get_user_by_email(email).await? {
                if other.id != id {
                    return Err(AppError::Conflict("email already registered".to_string()));
                }
            }
        }

        let password_hash = match &req.password {
            Some(password) => {
                non_blank("password", password)?;
                Some(auth::hash_password(password)?)
            }
            None => None,
        };

        let user = self
            .repo
            .update_user(
                id,
                UserChanges {
                    name: req.name,
                    email: req.email,
                    password_hash,
                    role: req.role,
                    active: req.active,
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found("user"))?;
        info!(target_id = %id, "user updated");
        Ok(user.into())
    }

    #[instrument(skip(self, principal), fields(user_id = %principal.id))]
    pub async fn delete(&self, id: Uuid, principal: &AuthUser) -> AppResult<()> {
        policy::require_admin(principal)?;
        let target = self.load(id).await?;

        let admins = self.repo.count_active_admins().await?;
        policy::ensure_not_last_admin(&target, admins)?;

        self.repo.delete_user(id).await?;
        info!(target_id = %id, "user deleted");
        Ok(())
    }
}
