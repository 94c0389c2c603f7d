use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;

use service::sync_status::{self, SyncStatus};

use crate::{errors::JsonApiError, state::AppState};

pub async fn master_questions(State(state): State<AppState>) -> Result<Json<Value>, JsonApiError> {
    state
        .questions
        .read()
        .await
        .map(Json)
        .ok_or_else(|| JsonApiError::failure(StatusCode::NOT_FOUND, "question bank not found"))
}

pub async fn master_config(State(state): State<AppState>) -> Result<Json<Value>, JsonApiError> {
    state
        .master_config
        .read_redacted()
        .await
        .map(Json)
        .ok_or_else(|| JsonApiError::failure(StatusCode::NOT_FOUND, "config not found"))
}

pub async fn sync_status(State(state): State<AppState>) -> Json<SyncStatus> {
    Json(sync_status::collect(&state.records, &state.questions, &state.master_config).await)
}
