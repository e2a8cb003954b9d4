//! Security filter chain.
//!
//! Order per request: the pre-auth gate attaches a `Principal` (or nothing),
//! then the path policy rejects paths outside the allow list. Role checks
//! happen last, in handler extractors.
pub mod path_policy;
pub mod preauth;

use axum::Router;

use crate::state::AppState;

/// Wrap `router` (routes and fallback already added) with the filter chain.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // Outermost layer runs first, so the gate is added last.
    let router = path_policy::apply(router, state.clone());
    preauth::apply(router, state)
}
