//! # REST API for Student Management
//!
//! Endpoints for creating, retrieving, updating, and deleting students.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::io::rest::error::error_response;
use crate::io::rest::mappers::student_mapper::StudentMapper;
use crate::AppState;
use shared::{CreateStudentRequest, UpdateStudentRequest};

/// Create a router for student related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route("/:id", get(get_student).put(update_student).delete(delete_student))
}

/// Create a new student
pub async fn create_student(
    State(state): State<AppState>,
    Json(request): Json<CreateStudentRequest>,
) -> impl IntoResponse {
    info!("POST /api/students - request: {:?}", request);

    match state.student_service.create_student(request).await {
        Ok(student) => {
            let response = StudentMapper::to_response(student, "Student created successfully");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("create student", e),
    }
}

/// List all students ordered by roll number
pub async fn list_students(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/students");

    match state.student_service.list_students().await {
        Ok(students) => (StatusCode::OK, Json(StudentMapper::to_list_response(students))).into_response(),
        Err(e) => error_response("list students", e),
    }
}

pub async fn get_student(State(state): State<AppState>, Path(student_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/students/{}", student_id);

    match state.student_service.get_student(&student_id).await {
        Ok(student) => (StatusCode::OK, Json(StudentMapper::to_dto(student))).into_response(),
        Err(e) => error_response("get student", e),
    }
}

pub async fn update_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(request): Json<UpdateStudentRequest>,
) -> impl IntoResponse {
    info!("PUT /api/students/{} - request: {:?}", student_id, request);

    match state.student_service.update_student(&student_id, request).await {
        Ok(student) => {
            let response = StudentMapper::to_response(student, "Student updated successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("update student", e),
    }
}

pub async fn delete_student(State(state): State<AppState>, Path(student_id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/students/{}", student_id);

    match state.student_service.delete_student(&student_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("delete student", e),
    }
}

#[cfg(test)]
mod tests {
    use crate::io::rest::test_support::{send, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_student_crud_over_http() {
        let (_env, app) = test_app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/students",
            Some(json!({"roll_no": "CS-01", "name": "Asha Rao", "course": "BSc CS", "semester": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success_message"], "Student created successfully");
        let id = body["student"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, "GET", &format!("/api/students/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["roll_no"], "CS-01");

        let (status, body) = send(&app, "PUT", &format!("/api/students/{}", id), Some(json!({"semester": 2}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["student"]["semester"], 2);

        let (status, body) = send(&app, "GET", "/api/students", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["students"].as_array().unwrap().len(), 1);

        let (status, _) = send(&app, "DELETE", &format!("/api/students/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, "GET", &format!("/api/students/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_duplicate_roll_number_is_conflict() {
        let (_env, app) = test_app();
        let request = json!({"roll_no": "CS-01", "name": "Asha", "course": "BSc CS", "semester": 1});

        let (status, _) = send(&app, "POST", "/api/students", Some(request.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = send(&app, "POST", "/api/students", Some(request)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("CS-01"));
    }
}
