//! # REST API for Attendance
//!
//! Session submission and the aggregated reports, per subject and per
//! student.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::domain::attendance_service::SubmitSessionCommand;
use crate::io::rest::error::error_response;
use crate::io::rest::mappers::attendance_mapper::AttendanceMapper;
use crate::AppState;
use shared::SubmitAttendanceRequest;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subjects/:id/attendance", get(get_subject_report).post(submit_attendance))
        .route("/subjects/:id/attendance/sessions", get(list_sessions))
        .route("/students/:id/attendance", get(get_student_attendance))
}

/// Record one session for a subject
pub async fn submit_attendance(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
    Json(request): Json<SubmitAttendanceRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/subjects/{}/attendance - date {} with {} records",
        subject_id,
        request.date,
        request.records.len()
    );

    let command = SubmitSessionCommand {
        subject_id,
        date: request.date,
        records: request.records,
    };

    match state.attendance_service.submit_session(command).await {
        Ok(result) => (StatusCode::CREATED, Json(AttendanceMapper::to_submit_response(result))).into_response(),
        Err(e) => error_response("submit attendance", e),
    }
}

/// Roster x dates table for a subject
pub async fn get_subject_report(State(state): State<AppState>, Path(subject_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/subjects/{}/attendance", subject_id);

    match state.attendance_service.subject_report(&subject_id).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => error_response("build attendance report", e),
    }
}

pub async fn list_sessions(State(state): State<AppState>, Path(subject_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/subjects/{}/attendance/sessions", subject_id);

    match state.attendance_service.list_sessions(&subject_id).await {
        Ok(sessions) => (StatusCode::OK, Json(AttendanceMapper::to_list_response(sessions))).into_response(),
        Err(e) => error_response("list attendance sessions", e),
    }
}

pub async fn get_student_attendance(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/students/{}/attendance", student_id);

    match state.attendance_service.student_attendance(&student_id).await {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(e) => error_response("build student attendance", e),
    }
}
