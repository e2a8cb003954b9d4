/// Factory: build `AuthService` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AuthService, PathPolicy, StaticRoleResolver};

pub fn build_auth_service(config: &Config) -> Arc<AuthService> {
    let resolver = StaticRoleResolver::new(config.admin_principals.iter().cloned());

    Arc::new(AuthService::new(
        config.preauth.clone(),
        Arc::new(resolver),
        PathPolicy::default_rules(),
    ))
}
