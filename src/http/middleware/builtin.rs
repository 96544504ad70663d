//! Built-in middlewares, registered under `quant.middlewares`.

use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{header, HeaderValue, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::http::middleware::MiddlewareRegistry;

pub const MODULE: &str = "quant.middlewares";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub(crate) fn register_all(registry: &mut MiddlewareRegistry) {
    registry
        .register(MODULE, "request_id", request_id)
        .register(MODULE, "trace", trace)
        .register(MODULE, "access_log", access_log)
        .register(MODULE, "server_header", server_header)
        .register(MODULE, "timeout", timeout)
        .register(MODULE, "body_limit", body_limit);
}

/// Assign an `x-request-id` to requests lacking one and echo it back.
pub fn request_id(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id()),
    )
}

pub fn trace(router: Router) -> Router {
    router.layer(TraceLayer::new_for_http())
}

/// Log method, path, status and latency of every request.
pub fn access_log(router: Router) -> Router {
    router.layer(middleware::from_fn(log_request))
}

pub fn server_header(router: Router) -> Router {
    router.layer(SetResponseHeaderLayer::if_not_present(
        header::SERVER,
        HeaderValue::from_static("quant-runtime"),
    ))
}

#[allow(deprecated)]
pub fn timeout(router: Router) -> Router {
    router.layer(TimeoutLayer::new(REQUEST_TIMEOUT))
}

pub fn body_limit(router: Router) -> Router {
    router.layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}

async fn log_request(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let status: StatusCode = response.status();
    tracing::debug!(
        method = %method,
        path = %path,
        status = status.as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request handled"
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use tower::ServiceExt;

    fn app(references: &[&str]) -> Router {
        let chain = MiddlewareRegistry::builtin().resolve_chain(references).unwrap();
        chain.apply(Router::new().route("/", get(|| async { "ok" })))
    }

    #[tokio::test]
    async fn test_request_id_is_generated_and_propagated() {
        let response = app(&["quant.middlewares.request_id"])
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let id = response.headers().get("x-request-id").unwrap().to_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn test_request_id_keeps_incoming() {
        let response = app(&["quant.middlewares.request_id"])
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_server_header() {
        let response = app(&["quant.middlewares.server_header", "quant.middlewares.access_log"])
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::SERVER], "quant-runtime");
    }

    #[test]
    fn test_all_builtins_resolve() {
        let registry = MiddlewareRegistry::builtin();
        for attribute in ["request_id", "trace", "access_log", "server_header", "timeout", "body_limit"] {
            let reference = format!("{}.{}", MODULE, attribute);
            assert!(registry.resolve(&reference).is_ok(), "{} should resolve", reference);
        }
    }
}
