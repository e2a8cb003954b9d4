use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::CurrentPrincipal;
use crate::error::AppError;
use crate::services::auth::{Principal, Role};

/// Type-level role requirement for [`RequireRole`].
pub trait RequiredRole: Send + Sync + 'static {
    const ROLE: Role;
}

#[derive(Debug)]
pub struct Admin;

impl RequiredRole for Admin {
    const ROLE: Role = Role::Admin;
}

/// Rejects the request unless the current principal holds `R::ROLE`.
///
/// - no principal → 401
/// - principal without the role → 403
#[derive(Debug)]
pub struct RequireRole<R: RequiredRole>(pub Principal, PhantomData<R>);

pub type IsAdmin = RequireRole<Admin>;

impl<R: RequiredRole> RequireRole<R> {
    pub fn into_inner(self) -> Principal {
        self.0
    }
}

impl<S, R> FromRequestParts<S> for RequireRole<R>
where
    S: Send + Sync,
    R: RequiredRole,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentPrincipal(principal) = CurrentPrincipal::from_request_parts(parts, state).await?;

        if !principal.has_role(R::ROLE) {
            tracing::warn!(
                principal = %principal.username,
                required = %R::ROLE,
                path = %parts.uri.path(),
                "access denied: missing role"
            );
            return Err(AppError::Forbidden {
                required: R::ROLE.name(),
            });
        }

        Ok(RequireRole(principal, PhantomData))
    }
}
