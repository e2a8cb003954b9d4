//! Pending token and resolved principal.
use std::collections::BTreeSet;

use super::Role;

/// What the gate pulled out of the trusted headers, before any role lookup.
///
/// Nothing here is verified: the upstream gateway vouches for both values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreAuthToken {
    pub principal: String,
    pub credentials: String,
}

impl PreAuthToken {
    pub fn new(principal: impl Into<String>, credentials: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            credentials: credentials.into(),
        }
    }
}

/// Request-scoped identity with its roles.
///
/// Created by the gate for one request and dropped with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub roles: BTreeSet<Role>,
}

impl Principal {
    pub fn new(username: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            username: username.into(),
            roles: roles.into_iter().collect(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn authorities(&self) -> Vec<&'static str> {
        self.roles.iter().map(Role::authority).collect()
    }
}
