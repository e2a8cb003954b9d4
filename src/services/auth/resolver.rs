//! Principal → roles lookup.
//!
//! The gate only depends on [`RoleResolver`], so a real identity store can be
//! swapped in without touching the gate or the path/method layers.
use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use super::{PreAuthToken, Principal, Role};

pub const ADMIN_USERNAME: &str = "admin-user";
pub const NORMAL_USERNAME: &str = "normal-user";

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("pre-authenticated principal is missing")]
    MissingIdentity,
}

/// Turns a pre-authenticated token into a role-bearing principal.
///
/// Implementations must be pure with respect to the request: no per-request
/// state is kept between calls.
#[async_trait]
pub trait RoleResolver: Send + Sync {
    // Resolver name (for logging).
    fn name(&self) -> &'static str;

    async fn resolve(&self, token: &PreAuthToken) -> Result<Principal, ResolveError>;
}

/// Fixed rule: listed identities are ADMIN, everyone else is USER.
///
/// Credentials are carried on the token but not checked here.
#[derive(Debug, Clone)]
pub struct StaticRoleResolver {
    admins: HashSet<String>,
}

impl StaticRoleResolver {
    pub fn new<I, S>(admins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            admins: admins.into_iter().map(Into::into).collect(),
        }
    }

    pub fn resolve_identity(&self, identity: Option<&str>) -> Result<Principal, ResolveError> {
        let identity = identity.ok_or(ResolveError::MissingIdentity)?;

        if self.admins.contains(identity) {
            Ok(Principal::new(ADMIN_USERNAME, [Role::Admin]))
        } else {
            Ok(Principal::new(NORMAL_USERNAME, [Role::User]))
        }
    }
}

impl Default for StaticRoleResolver {
    fn default() -> Self {
        Self::new([crate::config::DEFAULT_ADMIN_PRINCIPAL])
    }
}

#[async_trait]
impl RoleResolver for StaticRoleResolver {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn resolve(&self, token: &PreAuthToken) -> Result<Principal, ResolveError> {
        self.resolve_identity(Some(&token.principal))
    }
}
