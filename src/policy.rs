//! Authorization predicates.
//!
//! Each check is a pure function of the principal and the target, evaluated by the
//! services before any mutation.

use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    models::{Role, User},
};

pub fn require_admin(principal: &AuthUser) -> AppResult<()> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("administrator role required".to_string()))
    }
}

/// Passes for the resource owner and for any administrator.
pub fn require_owner_or_admin(principal: &AuthUser, owner_id: Uuid) -> AppResult<()> {
    if principal.is_admin() || principal.id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "not allowed to modify this resource".to_string(),
        ))
    }
}

pub fn require_self_or_admin(principal: &AuthUser, target_id: Uuid) -> AppResult<()> {
    if principal.is_admin() || principal.id == target_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "not allowed to access this user".to_string(),
        ))
    }
}

/// ensure_not_last_admin
///
/// Guards the removal (deletion, demotion or deactivation) of `target`: refused when it
/// is an active ADMIN and no other active ADMIN would remain. `active_admin_count`
/// includes `target`.
pub fn ensure_not_last_admin(target: &User, active_admin_count: i64) -> AppResult<()> {
    if target.role == Role::Admin && target.active && active_admin_count <= 1 {
        Err(AppError::Conflict(
            "cannot remove the last administrator".to_string(),
        ))
    } else {
        Ok(())
    }
}
