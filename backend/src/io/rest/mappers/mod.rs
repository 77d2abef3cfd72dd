//! Conversions from domain models to the `shared` wire types.

pub mod attendance_mapper;
pub mod fee_mapper;
pub mod marks_mapper;
pub mod student_mapper;
pub mod subject_mapper;
pub mod teacher_mapper;
