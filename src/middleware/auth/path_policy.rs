//! Path layer of the filter chain.
//!
//! Runs before routing so unknown paths are denied instead of reaching the
//! 404 fallback. Permitted paths go on to routing and method-level checks.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::{Decision, Principal};
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, path_policy_middleware))
}

async fn path_policy_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    match state.auth.policy().evaluate(path) {
        Decision::Allow => Ok(next.run(req).await),
        Decision::Deny => {
            let principal = req
                .extensions()
                .get::<Principal>()
                .map(|p| p.username.as_str());
            tracing::info!(path = %path, principal = ?principal, "path denied by policy");
            Err(AppError::access_denied(path))
        }
    }
}
