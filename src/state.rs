/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - auth: header names, role resolver, path policy
 * - Cheap to Clone (Arc inside)
 */
use std::sync::Arc;

use crate::services::auth::AuthService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }
}
