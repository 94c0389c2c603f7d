use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    Json,
};
use serde_json::{json, Value};

use service::records::{parse_batch, parse_record, RecordCollection, RecordStatus};

use crate::{errors::JsonApiError, state::AppState};

/// GET /api/exam-records
pub async fn list_records(State(state): State<AppState>) -> Json<RecordCollection> {
    Json(state.records.list().await)
}

/// POST /api/exam-records
pub async fn submit_record(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, JsonApiError> {
    let record = parse_record(&body?)?;
    let outcome = state.records.submit(record).await?;
    Ok(Json(json!({
        "success": true,
        "message": "record saved",
        "totalRecords": outcome.total,
    })))
}

/// POST /api/sync
pub async fn sync_records(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, JsonApiError> {
    let batch = parse_batch(&body?)?;
    let outcome = state.records.sync(batch).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("synced {} records", outcome.processed),
        "processed": outcome.processed,
        "totalRecords": outcome.total,
    })))
}

/// GET /api/exam-records/status
pub async fn record_status(State(state): State<AppState>) -> Json<RecordStatus> {
    Json(state.records.status().await)
}
