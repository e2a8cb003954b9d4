/*
 * Responsibility
 * - v1 URL layout
 * - Handlers accept any HTTP method; role requirements live on the handlers (extractors)
 */
use axum::{Router, routing::any};

use crate::api::v1::handlers::greeting::{bye, hello};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/hello", any(hello))
        .route("/bye", any(bye))
}
