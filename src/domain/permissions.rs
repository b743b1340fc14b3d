//! Role-based permission predicates.
//!
//! A [`Permission`] answers two questions for a request: may it reach the
//! endpoint at all (`has_permission`), and may it act on a specific owned
//! object (`has_object_permission`). Predicates only read the request context.

use axum::http::Method;
use serde_json::json;

use crate::domain::entities::{Owned, User};
use crate::error::AppError;

/// Whether a request only reads or also mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl From<&Method> for Access {
    /// GET, HEAD and OPTIONS are safe methods.
    fn from(method: &Method) -> Self {
        if method == Method::GET || method == Method::HEAD || method == Method::OPTIONS {
            Access::Read
        } else {
            Access::Write
        }
    }
}

/// Everything a predicate may look at.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub access: Access,
    pub user: Option<&'a User>,
}

impl<'a> RequestContext<'a> {
    pub fn new(access: Access, user: Option<&'a User>) -> Self {
        Self { access, user }
    }

    pub fn is_safe(&self) -> bool {
        self.access == Access::Read
    }
}

pub trait Permission {
    fn has_permission(&self, ctx: &RequestContext<'_>) -> bool;

    fn has_object_permission(&self, ctx: &RequestContext<'_>, _object: &dyn Owned) -> bool {
        self.has_permission(ctx)
    }
}

/// Safe methods only.
pub struct ReadOnly;

impl Permission for ReadOnly {
    fn has_permission(&self, ctx: &RequestContext<'_>) -> bool {
        ctx.is_safe()
    }
}

/// Any signed-in user.
pub struct IsAuthenticated;

impl Permission for IsAuthenticated {
    fn has_permission(&self, ctx: &RequestContext<'_>) -> bool {
        ctx.user.is_some()
    }
}

/// Admin role, superuser or staff.
pub struct IsAdmin;

impl Permission for IsAdmin {
    fn has_permission(&self, ctx: &RequestContext<'_>) -> bool {
        ctx.user.is_some_and(User::is_admin)
    }
}

/// Anyone may read; only admins may write.
pub struct IsAdminOrReadOnly;

impl Permission for IsAdminOrReadOnly {
    fn has_permission(&self, ctx: &RequestContext<'_>) -> bool {
        ReadOnly.has_permission(ctx) || IsAdmin.has_permission(ctx)
    }
}

/// Anyone may read; signed-in users may create; only the author, moderators,
/// admins and superusers may change an existing object.
pub struct IsAuthorOrStaffOrReadOnly;

impl Permission for IsAuthorOrStaffOrReadOnly {
    fn has_permission(&self, ctx: &RequestContext<'_>) -> bool {
        ReadOnly.has_permission(ctx) || IsAuthenticated.has_permission(ctx)
    }

    fn has_object_permission(&self, ctx: &RequestContext<'_>, object: &dyn Owned) -> bool {
        if ctx.is_safe() {
            return true;
        }

        ctx.user.is_some_and(|user| {
            object.author_id() == user.id
                || user.is_admin()
                || user.is_moderator()
                || user.is_superuser
        })
    }
}

/// Endpoint-level check.
///
/// # Errors
///
/// Returns [`AppError::Unauthorized`] for anonymous requests and
/// [`AppError::Forbidden`] for signed-in users lacking the permission.
pub fn authorize(permission: &dyn Permission, ctx: &RequestContext<'_>) -> Result<(), AppError> {
    if permission.has_permission(ctx) {
        Ok(())
    } else {
        Err(denied(ctx))
    }
}

/// Endpoint-level followed by object-level check.
///
/// # Errors
///
/// See [`authorize`].
pub fn authorize_object(
    permission: &dyn Permission,
    ctx: &RequestContext<'_>,
    object: &dyn Owned,
) -> Result<(), AppError> {
    authorize(permission, ctx)?;

    if permission.has_object_permission(ctx, object) {
        Ok(())
    } else {
        Err(denied(ctx))
    }
}

fn denied(ctx: &RequestContext<'_>) -> AppError {
    match ctx.user {
        None => AppError::unauthorized(
            "Authentication credentials were not provided",
            json!({}),
        ),
        Some(user) => AppError::forbidden(
            "You do not have permission to perform this action",
            json!({ "username": user.username }),
        ),
    }
}
