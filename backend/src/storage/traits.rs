//! # Storage Traits
//!
//! The document-store abstraction the domain layer talks to. Each trait covers
//! one collection (or sub-collection) and offers the capabilities the college
//! data set needs: fetch by id, query by field, ordered listing, add, update and
//! delete. Implementations decide how documents are laid out.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::attendance::AttendanceSession;
use crate::domain::models::fees::{FeePayment, FeeStructure};
use crate::domain::models::marks::MarksExam;
use crate::domain::models::student::Student;
use crate::domain::models::subject::Subject;
use crate::domain::models::teacher::Teacher;

#[async_trait]
pub trait StudentStorage: Send + Sync {
    /// Store a new student
    async fn store_student(&self, student: &Student) -> Result<()>;

    async fn get_student(&self, student_id: &str) -> Result<Option<Student>>;

    /// Query by the `roll_no` field
    async fn find_student_by_roll_no(&self, roll_no: &str) -> Result<Option<Student>>;

    /// List all students ordered by roll number
    async fn list_students(&self) -> Result<Vec<Student>>;

    /// Replace an existing student document (last write wins)
    async fn update_student(&self, student: &Student) -> Result<()>;

    /// Returns true if the student existed
    async fn delete_student(&self, student_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait TeacherStorage: Send + Sync {
    async fn store_teacher(&self, teacher: &Teacher) -> Result<()>;

    async fn get_teacher(&self, teacher_id: &str) -> Result<Option<Teacher>>;

    /// List all teachers ordered by name
    async fn list_teachers(&self) -> Result<Vec<Teacher>>;

    async fn update_teacher(&self, teacher: &Teacher) -> Result<()>;

    async fn delete_teacher(&self, teacher_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait SubjectStorage: Send + Sync {
    async fn store_subject(&self, subject: &Subject) -> Result<()>;

    async fn get_subject(&self, subject_id: &str) -> Result<Option<Subject>>;

    /// List all subjects ordered by subject code
    async fn list_subjects(&self) -> Result<Vec<Subject>>;

    /// Removes the subject document only. Attendance and marks stored under
    /// the subject are left in place.
    async fn delete_subject(&self, subject_id: &str) -> Result<bool>;
}

/// Attendance sessions, a sub-collection of a subject
#[async_trait]
pub trait AttendanceStorage: Send + Sync {
    async fn store_session(&self, session: &AttendanceSession) -> Result<()>;

    /// Sessions ordered by date, then submission time
    async fn list_sessions(&self, subject_id: &str) -> Result<Vec<AttendanceSession>>;
}

/// Exam marks, a sub-collection of a subject
#[async_trait]
pub trait MarksStorage: Send + Sync {
    /// Insert or replace the exam document
    async fn upsert_exam(&self, exam: &MarksExam) -> Result<()>;

    /// Exams ordered by exam id
    async fn list_exams(&self, subject_id: &str) -> Result<Vec<MarksExam>>;
}

#[async_trait]
pub trait FeeStructureStorage: Send + Sync {
    async fn store_structure(&self, structure: &FeeStructure) -> Result<()>;

    /// All structures ordered by semester, then fee type
    async fn list_structures(&self) -> Result<Vec<FeeStructure>>;

    /// Query by the `semester` field
    async fn list_structures_for_semester(&self, semester: u32) -> Result<Vec<FeeStructure>>;

    async fn delete_structure(&self, structure_id: &str) -> Result<bool>;
}

/// The append-only payment log. Rows are never updated or deleted.
#[async_trait]
pub trait FeePaymentStorage: Send + Sync {
    async fn append_payment(&self, payment: &FeePayment) -> Result<()>;

    /// Query by the `student_id` field, in append order
    async fn list_payments_for_student(&self, student_id: &str) -> Result<Vec<FeePayment>>;
}
