use axum::{
    body::Body,
    http::{HeaderValue, Request, Response, header},
    middleware::Next,
};

const IMMUTABLE: &str = "public, max-age=31536000, immutable";
const SDK: &str = "public, max-age=86400";
const NO_STORE: &str = "no-store, no-cache, must-revalidate, proxy-revalidate";

/// Middleware to set cache control headers
/// - Embedded assets: cached for a year
/// - Map SDK script: cached for a day, only when it was actually served
/// - Pages and actions: never cached, they reflect per-page state
pub async fn cache_control_middleware(req: Request<Body>, next: Next) -> Response<Body> {
    let path = req.uri().path().to_owned();
    let mut response = next.run(req).await;
    let success = response.status().is_success();
    let headers = response.headers_mut();

    if path.starts_with("/static/") && success {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(IMMUTABLE));
    } else if path == "/map/sdk.js" && success {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(SDK));
    } else {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    }

    response
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::get};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route("/static/app.css", get(|| async { "body {}" }))
            .route("/map/sdk.js", get(|| async { StatusCode::NOT_FOUND }))
            .route("/recommendation/1", get(|| async { "<html></html>" }))
            .layer(axum::middleware::from_fn(cache_control_middleware))
    }

    async fn cache_control(uri: &str) -> String {
        let response = app()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        response.headers()[header::CACHE_CONTROL]
            .to_str()
            .unwrap()
            .to_owned()
    }

    #[tokio::test]
    async fn test_static_assets_are_immutable() {
        assert_eq!(
            cache_control("/static/app.css").await,
            "public, max-age=31536000, immutable"
        );
    }

    #[tokio::test]
    async fn test_missing_sdk_is_not_cached() {
        assert!(cache_control("/map/sdk.js").await.starts_with("no-store"));
    }

    #[tokio::test]
    async fn test_pages_are_not_cached() {
        assert!(
            cache_control("/recommendation/1")
                .await
                .starts_with("no-store")
        );
    }
}
