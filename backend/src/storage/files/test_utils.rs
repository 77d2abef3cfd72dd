//! Test utilities shared by the storage, domain and REST tests.
//!
//! `TestEnvironment` owns a temporary data directory that is removed when the
//! environment is dropped, even if the test panics.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use shared::{AttendanceRecord, AttendanceStatus, RosterStudent, SubjectTeacher};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::connection::FileConnection;
use crate::domain::models::attendance::AttendanceSession;
use crate::domain::models::fees::{FeePayment, FeeStructure, PAYMENT_STATUS_COMPLETED};
use crate::domain::models::student::Student;
use crate::domain::models::subject::Subject;
use crate::domain::models::teacher::Teacher;
use crate::storage::Repositories;

pub struct TestEnvironment {
    /// Kept alive so the directory survives until drop
    _temp_dir: TempDir,
    pub connection: FileConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = FileConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }

    /// File-backed repositories rooted in this environment
    pub fn repositories(&self) -> Repositories {
        Repositories::from_files(self.connection.clone())
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        if std::env::var("COLLEGE_MANAGER_DEBUG_TESTS").is_ok() {
            println!("Cleaning up test environment: {:?}", self.base_path);
        }
    }
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("test date must be YYYY-MM-DD")
}

pub fn sample_student(roll_no: &str, name: &str) -> Student {
    let now = Utc::now();
    Student {
        id: Student::generate_id(),
        roll_no: roll_no.to_string(),
        name: name.to_string(),
        course: "BSc Computer Science".to_string(),
        semester: 1,
        fee_status: BTreeMap::new(),
        optional_fees: BTreeMap::new(),
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_teacher(name: &str) -> Teacher {
    Teacher {
        id: Teacher::generate_id(),
        uid: format!("uid-{}", name.to_lowercase().replace(' ', "-")),
        name: name.to_string(),
        department: "Computer Science".to_string(),
        email: format!("{}@college.test", name.to_lowercase().replace(' ', ".")),
        is_librarian: false,
        account_handler: false,
        is_admin: false,
    }
}

/// A subject whose roster is built from (roll number, name) pairs
pub fn sample_subject(code: &str, roster: &[(&str, &str)]) -> Subject {
    Subject {
        id: Subject::generate_id(),
        subject_code: code.to_string(),
        subject_name: format!("{} Subject", code),
        teachers: vec![SubjectTeacher {
            id: "teacher-1".to_string(),
            name: "Arun Menon".to_string(),
        }],
        students: roster
            .iter()
            .enumerate()
            .map(|(i, (roll_no, name))| RosterStudent {
                id: format!("student-{}", i + 1),
                roll_no: roll_no.to_string(),
                name: name.to_string(),
            })
            .collect(),
        created_at: Utc::now(),
    }
}

pub fn sample_session(subject_id: &str, on: &str, records: &[(&str, AttendanceStatus)]) -> AttendanceSession {
    let day = date(on);
    AttendanceSession {
        id: AttendanceSession::generate_id(day),
        date: day,
        subject_id: subject_id.to_string(),
        subject_name: "Test Subject".to_string(),
        records: records
            .iter()
            .map(|(roll_no, status)| AttendanceRecord {
                roll_no: roll_no.to_string(),
                name: roll_no.to_string(),
                status: *status,
            })
            .collect(),
        created_at: Utc::now(),
    }
}

pub fn sample_structure(semester: u32, fee_type: &str, amount: f64, due: &str) -> FeeStructure {
    FeeStructure {
        id: FeeStructure::generate_id(semester, fee_type),
        semester,
        fee_type: fee_type.to_string(),
        amount,
        due_date: date(due),
    }
}

pub fn sample_payment(student_id: &str, semester: u32, fee_type: &str, amount: f64) -> FeePayment {
    let now = Utc::now();
    FeePayment {
        id: FeePayment::generate_id(),
        student_id: student_id.to_string(),
        fee_type: fee_type.to_string(),
        semester,
        amount,
        payment_method: "UPI".to_string(),
        transaction_id: FeePayment::generate_transaction_id(now),
        payment_date: now,
        status: PAYMENT_STATUS_COMPLETED.to_string(),
    }
}
