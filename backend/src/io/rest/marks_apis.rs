//! # REST API for Marks

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::domain::marks_service::RecordMarksCommand;
use crate::io::rest::error::error_response;
use crate::io::rest::mappers::marks_mapper::MarksMapper;
use crate::AppState;
use shared::RecordMarksRequest;

pub fn router() -> Router<AppState> {
    Router::new().route("/subjects/:id/marks", get(get_marks_table).post(record_marks))
}

/// Insert or replace the marks of one exam
pub async fn record_marks(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
    Json(request): Json<RecordMarksRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/subjects/{}/marks - exam '{}' with {} records",
        subject_id,
        request.exam_id,
        request.records.len()
    );

    let command = RecordMarksCommand {
        subject_id,
        exam_id: request.exam_id,
        records: request.records,
    };

    match state.marks_service.record_exam_marks(command).await {
        Ok(exam) => (StatusCode::OK, Json(MarksMapper::to_record_response(exam))).into_response(),
        Err(e) => error_response("record marks", e),
    }
}

pub async fn get_marks_table(State(state): State<AppState>, Path(subject_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/subjects/{}/marks", subject_id);

    match state.marks_service.marks_table(&subject_id).await {
        Ok(table) => (StatusCode::OK, Json(table)).into_response(),
        Err(e) => error_response("build marks table", e),
    }
}
