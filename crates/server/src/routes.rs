use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::errors::JsonApiError;
use crate::state::AppState;

pub mod documents;
pub mod info;
pub mod proxy;
pub mod records;

pub const API_ENDPOINTS: &[&str] = &[
    "/api/exam-records",
    "/api/exam-records/status",
    "/api/sync",
    "/api/master-questions",
    "/api/master-config",
    "/api/sync-status",
    "/api/apiconfig",
    "/api/proxy",
];

/// Browser CORS: any origin, 24h preflight cache.
pub fn build_cors() -> CorsLayer {
    CorsLayer::permissive().max_age(Duration::from_secs(86400))
}

/// Wrong method on a known path. Bare `OPTIONS` (no preflight headers, so
/// the CORS layer let it through) still answers 200.
async fn method_not_allowed(method: Method) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    JsonApiError::failure(StatusCode::METHOD_NOT_ALLOWED, "method not allowed").into_response()
}

/// Unknown `/api/*` paths get a JSON 404; everything else gets the service info.
async fn fallback(uri: Uri) -> Response {
    if uri.path().starts_with("/api/") {
        let body = json!({
            "success": false,
            "message": "endpoint not found",
            "available_endpoints": API_ENDPOINTS,
        });
        return (StatusCode::NOT_FOUND, Json(body)).into_response();
    }
    info::service_info().await.into_response()
}

/// Build the full application router
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route(
            "/api/exam-records",
            get(records::list_records).post(records::submit_record).fallback(method_not_allowed),
        )
        .route("/api/exam-records/status", get(records::record_status).fallback(method_not_allowed))
        .route("/api/sync", post(records::sync_records).fallback(method_not_allowed))
        .route("/api/master-questions", get(documents::master_questions).fallback(method_not_allowed))
        .route("/api/master-config", get(documents::master_config).fallback(method_not_allowed))
        .route("/api/sync-status", get(documents::sync_status).fallback(method_not_allowed))
        .route("/api/apiconfig", get(proxy::api_config).fallback(proxy::method_not_allowed))
        .route("/api/proxy", post(proxy::forward).fallback(proxy::method_not_allowed))
        .layer(DefaultBodyLimit::max(state.max_body_bytes));

    Router::new()
        .route("/", get(info::service_info))
        .route("/health", get(info::health))
        .merge(api)
        .fallback(fallback)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_router() -> anyhow::Result<Router> {
        let dir = std::env::temp_dir().join(format!("routes_{}", uuid::Uuid::new_v4()));
        let mut cfg = configs::AppConfig::default();
        cfg.storage.data_dir = dir.clone();
        cfg.storage.questions_file = dir.join("q.json");
        cfg.storage.master_config_file = dir.join("c.json");
        Ok(build_router(AppState::from_config(&cfg)?, build_cors()))
    }

    async fn body_json(res: Response) -> anyhow::Result<Value> {
        let bytes = to_bytes(res.into_body(), usize::MAX).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    #[tokio::test]
    async fn bare_options_is_ok() -> anyhow::Result<()> {
        let res = test_router()?
            .oneshot(Request::builder().method("OPTIONS").uri("/api/exam-records").body(Body::empty())?)
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_api_path_lists_endpoints() -> anyhow::Result<()> {
        let res = test_router()?
            .oneshot(Request::builder().uri("/api/missing").body(Body::empty())?)
            .await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = body_json(res).await?;
        assert_eq!(body["available_endpoints"].as_array().map(Vec::len), Some(API_ENDPOINTS.len()));
        Ok(())
    }

    #[tokio::test]
    async fn oversized_body_is_json_413() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("routes_{}", uuid::Uuid::new_v4()));
        let mut cfg = configs::AppConfig::default();
        cfg.storage.data_dir = dir.clone();
        cfg.server.max_body_bytes = 64;
        let router = build_router(AppState::from_config(&cfg)?, build_cors());

        let payload = format!(r#"[{{"id":"a","note":"{}"}}]"#, "x".repeat(256));
        let res = router
            .clone()
            .oneshot(Request::builder().method("POST").uri("/api/sync").body(Body::from(payload.clone()))?)
            .await?;
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(res).await?, json!({"success": false, "message": "request body too large"}));

        let res = router
            .oneshot(Request::builder().method("POST").uri("/api/proxy").body(Body::from(payload))?)
            .await?;
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(res).await?["error"], json!("Payload Too Large"));
        Ok(())
    }

    #[tokio::test]
    async fn empty_store_status() -> anyhow::Result<()> {
        let res = test_router()?
            .oneshot(Request::builder().uri("/api/exam-records/status").body(Body::empty())?)
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await?, json!({"total": 0, "lastTimestamp": null}));
        Ok(())
    }
}
