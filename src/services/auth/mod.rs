/*
 * Responsibility
 * - Pre-authentication domain: roles, pending token, resolved principal
 * - Pluggable role lookup (RoleResolver) and the path-level policy
 * - No axum types here; middleware/extractors adapt these to HTTP
 */
pub mod factory;
pub mod policy;
pub mod principal;
pub mod resolver;
pub mod role;

use std::fmt;
use std::sync::Arc;

pub use factory::build_auth_service;
pub use policy::{Decision, PathPolicy};
pub use principal::{PreAuthToken, Principal};
pub use resolver::{ResolveError, RoleResolver, StaticRoleResolver};
pub use role::Role;

use crate::config::PreAuthHeaders;

/// Everything the gate and the path layer need, shared across requests.
pub struct AuthService {
    headers: PreAuthHeaders,
    resolver: Arc<dyn RoleResolver>,
    policy: PathPolicy,
}

impl AuthService {
    pub fn new(
        headers: PreAuthHeaders,
        resolver: Arc<dyn RoleResolver>,
        policy: PathPolicy,
    ) -> Self {
        Self {
            headers,
            resolver,
            policy,
        }
    }

    pub fn headers(&self) -> &PreAuthHeaders {
        &self.headers
    }

    pub fn resolver(&self) -> &dyn RoleResolver {
        self.resolver.as_ref()
    }

    pub fn policy(&self) -> &PathPolicy {
        &self.policy
    }
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService")
            .field("headers", &self.headers)
            .field("resolver", &self.resolver.name())
            .field("policy", &self.policy)
            .finish()
    }
}
