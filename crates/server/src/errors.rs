use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::{error, warn};

use service::{errors::ServiceError, llm_proxy::ProxyError};

/// JSON error response: a status plus a ready-made body.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub body: Value,
}

impl JsonApiError {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    /// `{success: false, message}`, the shape the record endpoints use.
    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, json!({"success": false, "message": message.into()}))
    }

    /// `{error, message}`, the shape the proxy endpoints use.
    pub fn proxy(status: StatusCode, error: &str, message: impl Into<String>) -> Self {
        Self::new(status, json!({"error": error, "message": message.into()}))
    }

    /// Body extraction failure in the proxy's `{error, message}` shape.
    pub fn proxy_body(rejection: BytesRejection) -> Self {
        let status = rejection.status();
        let error = if status == StatusCode::PAYLOAD_TOO_LARGE { "Payload Too Large" } else { "Bad Request" };
        warn!(%status, detail = %rejection.body_text(), "proxy request body rejected");
        Self::proxy(status, error, body_message(status, &rejection))
    }
}

fn body_message(status: StatusCode, rejection: &BytesRejection) -> String {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        "request body too large".to_string()
    } else {
        rejection.body_text()
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::InputFormat(detail) => {
                warn!(%detail, "rejected malformed payload");
                Self::failure(StatusCode::BAD_REQUEST, "invalid data format")
            }
            ServiceError::SaveFailed(target) => {
                error!(%target, "record save failed");
                Self::failure(StatusCode::INTERNAL_SERVER_ERROR, "failed to save records")
            }
        }
    }
}

impl From<BytesRejection> for JsonApiError {
    fn from(rejection: BytesRejection) -> Self {
        let status = rejection.status();
        warn!(%status, detail = %rejection.body_text(), "request body rejected");
        Self::failure(status, body_message(status, &rejection))
    }
}

impl From<ProxyError> for JsonApiError {
    fn from(e: ProxyError) -> Self {
        let message = e.to_string();
        match e {
            ProxyError::EmptyBody
            | ProxyError::InvalidBody(_)
            | ProxyError::MissingApiKey
            | ProxyError::MissingRequestBody => Self::proxy(StatusCode::BAD_REQUEST, "Bad Request", message),
            ProxyError::Upstream { status, details } => Self::new(
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                json!({"error": "API Error", "message": message, "details": details}),
            ),
            ProxyError::InvalidResponse(response) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "Invalid Response", "message": message, "response": response}),
            ),
            ProxyError::Unreachable(_) => Self::proxy(StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable", message),
            ProxyError::Timeout => Self::proxy(StatusCode::GATEWAY_TIMEOUT, "Gateway Timeout", message),
            ProxyError::Internal(_) => {
                Self::proxy(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_client_and_server_statuses() {
        let e: JsonApiError = ServiceError::InputFormat("eof".into()).into();
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.body["success"], json!(false));

        let e: JsonApiError = ServiceError::SaveFailed("x.json".into()).into();
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn proxy_errors_follow_upstream_semantics() {
        let e: JsonApiError = ProxyError::Upstream { status: 429, details: "slow down".into() }.into();
        assert_eq!(e.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(e.body["details"], json!("slow down"));

        let e: JsonApiError = ProxyError::Timeout.into();
        assert_eq!(e.status, StatusCode::GATEWAY_TIMEOUT);
        let e: JsonApiError = ProxyError::Unreachable("refused".into()).into();
        assert_eq!(e.status, StatusCode::SERVICE_UNAVAILABLE);
        let e: JsonApiError = ProxyError::MissingApiKey.into();
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.body["error"], json!("Bad Request"));
    }
}
