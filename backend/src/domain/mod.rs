//! # Domain Layer
//!
//! Business logic for the college manager. Pure aggregation lives in
//! [`attendance`], [`fee_reconciliation`] and [`marks`]; the `*_service`
//! modules load data through the storage traits, validate input, and call
//! into them.
//!
//! Services return `anyhow::Result`. Failures the caller can act on are
//! raised as [`errors::DomainError`] or [`errors::FeeError`] so the REST layer
//! can map them to status codes.

pub mod attendance;
pub mod attendance_service;
pub mod errors;
pub mod fee_reconciliation;
pub mod fee_service;
pub mod marks;
pub mod marks_service;
pub mod models;
pub mod student_service;
pub mod subject_service;
pub mod teacher_service;

pub use attendance_service::AttendanceService;
pub use errors::{DomainError, FeeError};
pub use fee_service::FeeService;
pub use marks_service::MarksService;
pub use student_service::StudentService;
pub use subject_service::SubjectService;
pub use teacher_service::TeacherService;
