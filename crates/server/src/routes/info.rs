use axum::Json;
use serde_json::{json, Value};

use common::types::Health;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

pub async fn service_info() -> Json<Value> {
    Json(json!({
        "service": "Sales quiz exam sync server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "GET /api/exam-records - list exam records",
            "POST /api/exam-records - save one exam record",
            "GET /api/exam-records/status - record count and last timestamp",
            "POST /api/sync - merge a batch of exam records",
            "GET /api/master-questions - master question bank",
            "GET /api/master-config - master configuration",
            "GET /api/sync-status - sync status",
            "GET /api/apiconfig - LLM proxy descriptor",
            "POST /api/proxy - forward a prompt to the LLM API"
        ],
        "usage": "open the single-file quiz with ?api=http://<this-server-address>"
    }))
}
