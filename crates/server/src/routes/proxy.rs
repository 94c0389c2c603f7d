use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use service::llm_proxy::{ApiConfigDescriptor, ProxyRequest};

use crate::{errors::JsonApiError, state::AppState};

/// POST /api/proxy: one upstream attempt, upstream JSON passed back as-is.
pub async fn forward(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, JsonApiError> {
    let body = body.map_err(JsonApiError::proxy_body)?;
    let (api_key, request_body) = ProxyRequest::parse(&body)?;
    let data = state.forwarder.forward(&api_key, &request_body).await?;
    Ok(Json(data))
}

/// GET /api/apiconfig
pub async fn api_config(State(state): State<AppState>) -> Json<ApiConfigDescriptor> {
    let d = &state.api_descriptor;
    Json(ApiConfigDescriptor::new(&d.url, &d.model, &d.key))
}

pub async fn method_not_allowed(method: Method) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    JsonApiError::proxy(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed", "unsupported request method")
        .into_response()
}
