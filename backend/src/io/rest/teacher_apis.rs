//! # REST API for Teacher Management

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::io::rest::error::error_response;
use crate::io::rest::mappers::teacher_mapper::TeacherMapper;
use crate::AppState;
use shared::{CreateTeacherRequest, UpdateTeacherRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teachers).post(create_teacher))
        .route("/:id", get(get_teacher).put(update_teacher).delete(delete_teacher))
}

pub async fn create_teacher(
    State(state): State<AppState>,
    Json(request): Json<CreateTeacherRequest>,
) -> impl IntoResponse {
    info!("POST /api/teachers - request: {:?}", request);

    match state.teacher_service.create_teacher(request).await {
        Ok(teacher) => {
            let response = TeacherMapper::to_response(teacher, "Teacher created successfully");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("create teacher", e),
    }
}

pub async fn list_teachers(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/teachers");

    match state.teacher_service.list_teachers().await {
        Ok(teachers) => (StatusCode::OK, Json(TeacherMapper::to_list_response(teachers))).into_response(),
        Err(e) => error_response("list teachers", e),
    }
}

pub async fn get_teacher(State(state): State<AppState>, Path(teacher_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/teachers/{}", teacher_id);

    match state.teacher_service.get_teacher(&teacher_id).await {
        Ok(teacher) => (StatusCode::OK, Json(TeacherMapper::to_dto(teacher))).into_response(),
        Err(e) => error_response("get teacher", e),
    }
}

pub async fn update_teacher(
    State(state): State<AppState>,
    Path(teacher_id): Path<String>,
    Json(request): Json<UpdateTeacherRequest>,
) -> impl IntoResponse {
    info!("PUT /api/teachers/{} - request: {:?}", teacher_id, request);

    match state.teacher_service.update_teacher(&teacher_id, request).await {
        Ok(teacher) => {
            let response = TeacherMapper::to_response(teacher, "Teacher updated successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("update teacher", e),
    }
}

pub async fn delete_teacher(State(state): State<AppState>, Path(teacher_id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/teachers/{}", teacher_id);

    match state.teacher_service.delete_teacher(&teacher_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("delete teacher", e),
    }
}
