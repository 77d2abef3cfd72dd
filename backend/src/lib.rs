//! # College Manager Backend
//!
//! Students, teachers, subjects, attendance, marks, and fees for a college,
//! served over a JSON REST API.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (axum REST handlers, DTO mappers)
//!     ↓
//! Domain Layer (services, attendance aggregation, fee reconciliation)
//!     ↓
//! Storage Layer (document-store traits, file-backed implementation)
//! ```
//!
//! [`initialize_backend`] wires the layers together from an [`AppConfig`];
//! [`create_router`] exposes them under `/api`.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub use config::AppConfig;
use domain::{AttendanceService, FeeService, MarksService, StudentService, SubjectService, TeacherService};
use storage::{FileConnection, Repositories};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub student_service: StudentService,
    pub teacher_service: TeacherService,
    pub subject_service: SubjectService,
    pub attendance_service: AttendanceService,
    pub marks_service: MarksService,
    pub fee_service: FeeService,
}

impl AppState {
    pub fn new(repositories: &Repositories, config: &AppConfig) -> Self {
        Self {
            student_service: StudentService::new(repositories),
            teacher_service: TeacherService::new(repositories),
            subject_service: SubjectService::new(repositories),
            attendance_service: AttendanceService::new(repositories, config.attendance.low_threshold),
            marks_service: MarksService::new(repositories),
            fee_service: FeeService::new(repositories, &config.fees),
        }
    }
}

/// Initialize the backend with all required services
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up data directory at {}", config.data_directory.display());
    let connection = FileConnection::new(&config.data_directory)?;

    info!("Setting up domain services");
    let repositories = Repositories::from_files(connection);

    info!(
        "Fee catalog: compulsory {:?}, optional {:?}, paid amounts from {:?}",
        config.fees.compulsory, config.fees.optional, config.fees.paid_source
    );
    Ok(AppState::new(&repositories, config))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin '{}'", cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Ok(Router::new()
        .nest("/api", io::rest::api_router())
        .layer(cors)
        .with_state(app_state))
}
