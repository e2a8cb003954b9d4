//! Header trust gate: gateway-injected headers → `Principal` in extensions.
//!
//! The identity and credential headers are taken at face value. Whatever sits
//! in front of this service (reverse proxy / API gateway) has already
//! authenticated the caller; the service must not be reachable around it.
//!
//! - principal header missing → request continues unauthenticated
//!   (or 401 when `exception_if_header_missing` is set)
//! - credential header missing → unauthenticated, no token can be built
//! - both present → `PreAuthToken` → `RoleResolver` → `Principal`

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderName, Request},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::PreAuthToken;
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 `from_fn` cannot take the State extractor, so state is passed explicitly.
    router.layer(middleware::from_fn_with_state(state, preauth_middleware))
}

async fn preauth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let headers = state.auth.headers();

    // Non UTF-8 counts as absent here too, so the strict check sees the same
    // value the token is built from.
    let Some(actor) = header_str(req.headers(), &headers.principal).map(str::to_owned) else {
        if headers.exception_if_header_missing {
            tracing::warn!(
                header = %headers.principal,
                path = %req.uri().path(),
                "pre-authenticated principal header missing"
            );
            return Err(AppError::Unauthorized);
        }
        tracing::debug!(path = %req.uri().path(), "no pre-authenticated principal, continuing");
        return Ok(next.run(req).await);
    };

    let Some(token) = build_token(req.headers(), actor, &headers.credentials) else {
        return Ok(next.run(req).await);
    };

    let principal = state.auth.resolver().resolve(&token).await.map_err(|err| {
        tracing::error!(
            error = %err,
            resolver = state.auth.resolver().name(),
            "role resolution failed"
        );
        AppError::from(err)
    })?;

    tracing::debug!(
        actor = %token.principal,
        principal = %principal.username,
        authorities = ?principal.authorities(),
        "pre-authenticated"
    );

    // middleware → extractor hand-off
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Pair the principal with the credential header.
///
/// `None` when the credential header is missing (or not UTF-8): no token can
/// be built and the request stays unauthenticated. Empty values are accepted.
fn build_token(
    headers: &HeaderMap,
    principal: String,
    credentials_header: &HeaderName,
) -> Option<PreAuthToken> {
    let Some(credentials) = header_str(headers, credentials_header) else {
        tracing::debug!(
            header = %credentials_header,
            "no pre-authenticated credentials found in request"
        );
        return None;
    };

    Some(PreAuthToken::new(principal, credentials))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    let value = headers.get(name)?;
    match std::str::from_utf8(value.as_bytes()) {
        Ok(s) => Some(s),
        Err(_) => {
            tracing::warn!(header = %name, "ignoring non UTF-8 pre-auth header");
            None
        }
    }
}
