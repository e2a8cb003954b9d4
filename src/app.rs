/*
 * Responsibility
 * - Load Config → build services → assemble the Router
 * - Apply middleware (HTTP infra, pre-auth gate, path policy)
 * - Start with axum::serve()
 */
use std::{panic, process};

use anyhow::Result;
use axum::{Router, ServiceExt, extract::Request, http::Uri};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::build_auth_service;
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,header_preauth=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so it gets noticed.
        // Production: default hook, the server keeps running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    let state = AppState::new(build_auth_service(&config));

    tracing::info!(
        env = ?config.app_env,
        addr = %config.addr,
        principal_header = %config.preauth.principal,
        credentials_header = %config.preauth.credentials,
        path_rules = state.auth.policy().rules().len(),
        resolver = state.auth.resolver().name(),
        "starting pre-auth demo"
    );

    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;
    Ok(())
}

/// `/v1/hello/` and `/v1/hello` are the same endpoint; the slash is trimmed
/// before any layer sees the path, so policy and role checks apply unchanged.
pub fn build_router(state: AppState, config: &Config) -> NormalizePath<Router> {
    let router = Router::new()
        .merge(api::actuator::routes())
        .nest("/v1", api::v1::routes())
        .fallback(fallback);

    // Layers must come after routes and fallback to cover them.
    let router = middleware::auth::apply(router, state.clone()).with_state(state);

    let router = middleware::http::apply(router, &config.http);

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// Paths the policy permits but nothing serves.
async fn fallback(uri: Uri) -> AppError {
    AppError::not_found(uri.path())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::middleware::http::REQUEST_ID_HEADER;

    const CALLERS: [(Option<&str>, Option<&str>); 3] = [
        (None, None),
        (Some("alice"), Some("gw")),
        (Some("joe"), Some("gw")),
    ];

    fn app() -> NormalizePath<Router> {
        app_with(Config::default())
    }

    fn app_with(config: Config) -> NormalizePath<Router> {
        let state = AppState::new(build_auth_service(&config));
        build_router(state, &config)
    }

    fn request(uri: &str, actor: Option<&str>, grantor: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(actor) = actor {
            builder = builder.header("x-actor-id", actor);
        }
        if let Some(grantor) = grantor {
            builder = builder.header("x-grantor-id", grantor);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn send(app: NormalizePath<Router>, req: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn error_code(body: &str) -> String {
        let json: Value = serde_json::from_str(body).unwrap();
        json["error"]["code"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn joe_can_say_hello() {
        let (status, body) = send(app(), request("/v1/hello", Some("joe"), Some("gw"))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello World");
    }

    #[tokio::test]
    async fn joe_with_empty_credentials_is_still_admin() {
        let (status, body) = send(app(), request("/v1/hello", Some("joe"), Some(""))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello World");
    }

    #[tokio::test]
    async fn hello_accepts_any_method() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/v1/hello")
            .header("x-actor-id", "joe")
            .header("x-grantor-id", "gw")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello World");
    }

    #[tokio::test]
    async fn alice_is_forbidden_from_hello() {
        let (status, body) = send(app(), request("/v1/hello", Some("alice"), Some("gw"))).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_code(&body), "FORBIDDEN");
    }

    #[tokio::test]
    async fn anonymous_hello_is_unauthorized() {
        let (status, body) = send(app(), request("/v1/hello", None, None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&body), "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn principal_without_credentials_stays_anonymous() {
        let (status, body) = send(app(), request("/v1/hello", Some("joe"), None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&body), "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn bye_is_public() {
        for (actor, grantor) in CALLERS {
            let (status, body) = send(app(), request("/v1/bye", actor, grantor)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, "bye");
        }
    }

    #[tokio::test]
    async fn unknown_paths_are_denied_for_everyone() {
        for (actor, grantor) in CALLERS {
            let (status, body) = send(app(), request("/unknown/path", actor, grantor)).await;
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(error_code(&body), "ACCESS_DENIED");
        }
    }

    #[tokio::test]
    async fn permitted_path_without_handler_is_not_found() {
        let (status, body) = send(app(), request("/v1/missing", Some("joe"), Some("gw"))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_code(&body), "NOT_FOUND");
    }

    #[tokio::test]
    async fn actuator_and_favicon_are_open() {
        let (status, body) = send(app(), request("/actuator/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "UP");

        let (status, body) = send(app(), request("/actuator/info", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["name"], env!("CARGO_PKG_NAME"));

        let (status, _) = send(app(), request("/favicon.ico", None, None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn strict_gate_rejects_missing_principal_header() {
        let mut config = Config::default();
        config.preauth.exception_if_header_missing = true;

        let (status, body) = send(app_with(config.clone()), request("/v1/bye", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&body), "UNAUTHORIZED");

        let (status, body) =
            send(app_with(config), request("/v1/hello", Some("joe"), Some("gw"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello World");
    }

    #[tokio::test]
    async fn strict_gate_treats_non_utf8_principal_as_missing() {
        let mut config = Config::default();
        config.preauth.exception_if_header_missing = true;

        let req = Request::builder()
            .uri("/v1/bye")
            .header("x-actor-id", axum::http::HeaderValue::from_bytes(&[0xff]).unwrap())
            .header("x-grantor-id", "gw")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app_with(config), req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&body), "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn strict_gate_runs_before_actuator_paths() {
        let mut config = Config::default();
        config.preauth.exception_if_header_missing = true;

        let (status, _) =
            send(app_with(config.clone()), request("/actuator/health", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            app_with(config),
            request("/actuator/health", Some("alice"), Some("gw")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn trailing_slash_reaches_same_handler_and_checks() {
        let (status, body) = send(app(), request("/v1/hello/", Some("joe"), Some("gw"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello World");

        let (status, body) = send(app(), request("/v1/hello/", Some("alice"), Some("gw"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_code(&body), "FORBIDDEN");

        let (status, body) = send(app(), request("/v1/bye/", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "bye");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let mut config = Config::default();
        config.http.body_limit_bytes = 16;

        let payload = vec![b'a'; 64];
        let req = Request::builder()
            .method(Method::POST)
            .uri("/v1/bye")
            .header("content-length", payload.len())
            .body(Body::from(payload))
            .unwrap();

        let (status, _) = send(app_with(config), req).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn custom_header_names_and_admins() {
        let mut config = Config::default();
        config.preauth.principal = axum::http::HeaderName::from_static("x-remote-user");
        config.preauth.credentials = axum::http::HeaderName::from_static("x-remote-grant");
        config.admin_principals = vec!["root".to_string()];

        let req = Request::builder()
            .uri("/v1/hello")
            .header("x-remote-user", "root")
            .header("x-remote-grant", "gw")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app_with(config.clone()), req).await;
        assert_eq!(status, StatusCode::OK);

        // Default headers mean nothing once renamed.
        let (status, _) =
            send(app_with(config), request("/v1/hello", Some("root"), Some("gw"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let response = app()
            .oneshot(request("/unknown", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }
}
