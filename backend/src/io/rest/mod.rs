//! # REST API Interface Layer
//!
//! JSON endpoints under `/api`. Each `*_apis` module exposes a `router()`;
//! [`api_router`] assembles them.
//!
//! Failures are returned as `{"error": ..., "code": ...}` with the status
//! chosen by [`error::classify`]: 400 for validation, 404 for missing
//! entities, 409 for conflicts, 500 otherwise.

pub mod attendance_apis;
pub mod error;
pub mod fee_apis;
pub mod mappers;
pub mod marks_apis;
pub mod student_apis;
pub mod subject_apis;
pub mod teacher_apis;

use axum::Router;

use crate::AppState;

/// All API routes, relative to `/api`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/students", student_apis::router())
        .nest("/teachers", teacher_apis::router())
        .nest("/subjects", subject_apis::router())
        .merge(attendance_apis::router())
        .merge(marks_apis::router())
        .merge(fee_apis::router())
}
