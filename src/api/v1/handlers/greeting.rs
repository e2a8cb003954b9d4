/*
 * Responsibility
 * - /v1/hello: ADMIN only (checked by the IsAdmin extractor before the body runs)
 * - /v1/bye: no role required, authenticated or not
 */
use crate::api::v1::extractors::IsAdmin;

pub async fn hello(admin: IsAdmin) -> &'static str {
    tracing::debug!(principal = %admin.into_inner().username, "hello");
    "Hello World"
}

pub async fn bye() -> &'static str {
    "bye"
}
