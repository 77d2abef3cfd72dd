//! # Storage Module
//!
//! Persists the college data set behind the traits in [`traits`]. The domain
//! layer only sees those traits, so the file-backed implementation in
//! [`files`] can be swapped for a hosted document database without touching
//! services.
//!
//! ## Guarantees (and the lack of them)
//!
//! - Document writes are atomic per file (temp file + rename)
//! - Concurrent updates to the same document are last-write-wins
//! - There is no cross-document transaction: a payment append and the student
//!   update that follows it can be separated by a failure

pub mod files;
pub mod traits;

use std::sync::Arc;

pub use files::FileConnection;
pub use traits::*;

/// One handle per collection, shared by the services
#[derive(Clone)]
pub struct Repositories {
    pub students: Arc<dyn StudentStorage>,
    pub teachers: Arc<dyn TeacherStorage>,
    pub subjects: Arc<dyn SubjectStorage>,
    pub attendance: Arc<dyn AttendanceStorage>,
    pub marks: Arc<dyn MarksStorage>,
    pub fee_structures: Arc<dyn FeeStructureStorage>,
    pub fee_payments: Arc<dyn FeePaymentStorage>,
}

impl Repositories {
    pub fn from_files(connection: FileConnection) -> Self {
        Self {
            students: Arc::new(files::StudentRepository::new(connection.clone())),
            teachers: Arc::new(files::TeacherRepository::new(connection.clone())),
            subjects: Arc::new(files::SubjectRepository::new(connection.clone())),
            attendance: Arc::new(files::AttendanceRepository::new(connection.clone())),
            marks: Arc::new(files::MarksRepository::new(connection.clone())),
            fee_structures: Arc::new(files::FeeStructureRepository::new(connection.clone())),
            fee_payments: Arc::new(files::FeePaymentRepository::new(connection)),
        }
    }
}
