//! Student records: creation, lookup, updates, deletion.
//!
//! Roll numbers are unique (case-insensitive). Deleting a student does not
//! touch subject rosters or the payment log.

use anyhow::Result;
use chrono::Utc;
use shared::{CreateStudentRequest, UpdateStudentRequest};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::domain::errors::DomainError;
use crate::domain::models::student::Student;
use crate::storage::{Repositories, StudentStorage};

const MAX_NAME_LENGTH: usize = 100;

#[derive(Clone)]
pub struct StudentService {
    students: Arc<dyn StudentStorage>,
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{} cannot be empty", field)).into());
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::Validation(format!(
            "{} cannot exceed {} characters",
            field, MAX_NAME_LENGTH
        ))
        .into());
    }
    Ok(trimmed.to_string())
}

fn valid_semester(semester: u32) -> Result<u32> {
    if semester == 0 {
        return Err(DomainError::Validation("Semester must be at least 1".to_string()).into());
    }
    Ok(semester)
}

impl StudentService {
    pub fn new(repositories: &Repositories) -> Self {
        Self {
            students: repositories.students.clone(),
        }
    }

    pub async fn create_student(&self, request: CreateStudentRequest) -> Result<Student> {
        info!("Creating student: {:?}", request);

        let roll_no = required("Roll number", &request.roll_no)?;
        let name = required("Name", &request.name)?;
        let course = required("Course", &request.course)?;
        let semester = valid_semester(request.semester)?;

        if self.students.find_student_by_roll_no(&roll_no).await?.is_some() {
            return Err(DomainError::Conflict(format!("Roll number {} is already taken", roll_no)).into());
        }

        let now = Utc::now();
        let student = Student {
            id: Student::generate_id(),
            roll_no,
            name,
            course,
            semester,
            fee_status: BTreeMap::new(),
            optional_fees: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        };
        self.students.store_student(&student).await?;

        info!("Created student {} ({})", student.roll_no, student.id);
        Ok(student)
    }

    pub async fn get_student(&self, student_id: &str) -> Result<Student> {
        self.students
            .get_student(student_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Student", student_id).into())
    }

    pub async fn list_students(&self) -> Result<Vec<Student>> {
        self.students.list_students().await
    }

    /// Roll numbers cannot change; fee data is managed by the fee service
    pub async fn update_student(&self, student_id: &str, request: UpdateStudentRequest) -> Result<Student> {
        info!("Updating student {}: {:?}", student_id, request);
        let mut student = self.get_student(student_id).await?;

        if let Some(name) = request.name {
            student.name = required("Name", &name)?;
        }
        if let Some(course) = request.course {
            student.course = required("Course", &course)?;
        }
        if let Some(semester) = request.semester {
            student.semester = valid_semester(semester)?;
        }
        student.updated_at = Utc::now();

        self.students.update_student(&student).await?;
        Ok(student)
    }

    pub async fn delete_student(&self, student_id: &str) -> Result<()> {
        info!("Deleting student {}", student_id);
        if !self.students.delete_student(student_id).await? {
            return Err(DomainError::not_found("Student", student_id).into());
        }
        Ok(())
    }
}
