//! Route registration — system endpoints plus the module surface.

use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use domus_core::Module;

/// Build the complete router. Module routes are mounted under `/v1`;
/// system endpoints stay at the root.
pub fn build_router(module: &dyn Module) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .nest("/v1", module.routes())
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "domusd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    struct EmptyModule;

    impl Module for EmptyModule {
        fn name(&self) -> &str {
            "empty"
        }

        fn routes(&self) -> Router {
            Router::new()
        }
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = build_router(&EmptyModule);
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn version_endpoint() {
        let app = build_router(&EmptyModule);
        let resp = app
            .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["name"], "domusd");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
