//! # REST API for Subjects
//!
//! Subjects are created with their roster and teachers and cannot be edited
//! afterwards; deleting one leaves its attendance and marks in storage.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::io::rest::error::error_response;
use crate::io::rest::mappers::subject_mapper::SubjectMapper;
use crate::AppState;
use shared::CreateSubjectRequest;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_subjects).post(create_subject))
        .route("/:id", get(get_subject).delete(delete_subject))
}

pub async fn create_subject(
    State(state): State<AppState>,
    Json(request): Json<CreateSubjectRequest>,
) -> impl IntoResponse {
    info!("POST /api/subjects - request: {:?}", request);

    match state.subject_service.create_subject(request).await {
        Ok(subject) => {
            let response = SubjectMapper::to_response(subject, "Subject created successfully");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("create subject", e),
    }
}

pub async fn list_subjects(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/subjects");

    match state.subject_service.list_subjects().await {
        Ok(subjects) => (StatusCode::OK, Json(SubjectMapper::to_list_response(subjects))).into_response(),
        Err(e) => error_response("list subjects", e),
    }
}

pub async fn get_subject(State(state): State<AppState>, Path(subject_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/subjects/{}", subject_id);

    match state.subject_service.get_subject(&subject_id).await {
        Ok(subject) => (StatusCode::OK, Json(SubjectMapper::to_dto(subject))).into_response(),
        Err(e) => error_response("get subject", e),
    }
}

pub async fn delete_subject(State(state): State<AppState>, Path(subject_id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/subjects/{}", subject_id);

    match state.subject_service.delete_subject(&subject_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("delete subject", e),
    }
}
