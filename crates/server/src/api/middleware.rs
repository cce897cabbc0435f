//! Session and metrics middleware for API routes.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;

use super::responses::api_error;
use crate::metrics::{
    normalize_path, AUTH_FAILURES_TOTAL, HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL,
    HTTP_REQUEST_DURATION,
};
use crate::state::AppState;

/// Metrics middleware that tracks HTTP request duration and counts.
///
/// This middleware records:
/// - Request duration (histogram)
/// - Request count (counter)
/// - Requests in flight (gauge)
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    HTTP_REQUESTS_IN_FLIGHT.inc();

    let response = next.run(request).await;

    HTTP_REQUESTS_IN_FLIGHT.dec();

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUEST_DURATION
        .with_label_values(&[&method, &path, &status])
        .observe(duration);
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();

    response
}

/// Reject requests with 401 while nobody is signed in.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let signed_in = state.shelf().is_authenticated();
    if !signed_in {
        AUTH_FAILURES_TOTAL.with_label_values(&["no_session"]).inc();
        return api_error(StatusCode::UNAUTHORIZED, "Sign in to continue").into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use myshelf_core::{testing::fixtures, Config, MemoryStore, Shelf};
    use tower::ServiceExt;

    async fn dummy_handler() -> &'static str {
        "OK"
    }

    fn app(shelf: Shelf) -> Router {
        let state = Arc::new(AppState::new(Config::default(), shelf, None));
        Router::new()
            .route("/test", get(dummy_handler))
            .layer(middleware::from_fn_with_state(state.clone(), require_session))
            .with_state(state)
    }

    async fn status_of(app: Router) -> StatusCode {
        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_require_session_rejects_anonymous() {
        let shelf = Shelf::new(Arc::new(MemoryStore::new()));
        assert_eq!(status_of(app(shelf)).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_require_session_allows_signed_in_user() {
        let shelf = fixtures::signed_in_shelf("Ana", "ana@myshelf.test");
        assert_eq!(status_of(app(shelf)).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_middleware_passes_response_through() {
        let app = Router::new()
            .route("/api/v1/works/12", get(dummy_handler))
            .layer(middleware::from_fn(metrics_middleware));

        assert_eq!(status_of_path(app, "/api/v1/works/12").await, StatusCode::OK);
        let count = HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/api/v1/works/{id}", "200"])
            .get();
        assert!(count >= 1);
    }

    async fn status_of_path(app: Router, path: &str) -> StatusCode {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        app.oneshot(request).await.unwrap().status()
    }
}
