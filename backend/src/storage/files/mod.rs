//! File-backed document store: YAML documents plus CSV tables under one data
//! directory.

pub mod attendance_repository;
pub mod connection;
pub mod fee_payment_repository;
pub mod fee_structure_repository;
pub mod marks_repository;
pub mod student_repository;
pub mod subject_repository;
pub mod teacher_repository;

#[cfg(test)]
pub mod test_utils;

pub use attendance_repository::AttendanceRepository;
pub use connection::FileConnection;
pub use fee_payment_repository::FeePaymentRepository;
pub use fee_structure_repository::FeeStructureRepository;
pub use marks_repository::MarksRepository;
pub use student_repository::StudentRepository;
pub use subject_repository::SubjectRepository;
pub use teacher_repository::TeacherRepository;
