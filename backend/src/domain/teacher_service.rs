use anyhow::Result;
use shared::{CreateTeacherRequest, UpdateTeacherRequest};
use std::sync::Arc;
use tracing::info;

use crate::domain::errors::DomainError;
use crate::domain::models::teacher::Teacher;
use crate::storage::{Repositories, TeacherStorage};

/// Teacher accounts. Authentication lives with the external provider; the
/// `uid` links a teacher document to it.
#[derive(Clone)]
pub struct TeacherService {
    teachers: Arc<dyn TeacherStorage>,
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{} cannot be empty", field)).into());
    }
    Ok(trimmed.to_string())
}

fn valid_email(value: &str) -> Result<String> {
    let email = required("Email", value)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(DomainError::Validation(format!("'{}' is not a valid email address", email)).into()),
    }
}

impl TeacherService {
    pub fn new(repositories: &Repositories) -> Self {
        Self {
            teachers: repositories.teachers.clone(),
        }
    }

    pub async fn create_teacher(&self, request: CreateTeacherRequest) -> Result<Teacher> {
        info!("Creating teacher: {} <{}>", request.name, request.email);

        let uid = required("Uid", &request.uid)?;
        let teacher = Teacher {
            id: Teacher::generate_id(),
            name: required("Name", &request.name)?,
            department: required("Department", &request.department)?,
            email: valid_email(&request.email)?,
            is_librarian: request.is_librarian,
            account_handler: request.account_handler,
            is_admin: request.is_admin,
            uid,
        };

        let existing = self.teachers.list_teachers().await?;
        if existing.iter().any(|t| t.uid == teacher.uid) {
            return Err(DomainError::Conflict(format!("A teacher with uid {} already exists", teacher.uid)).into());
        }

        self.teachers.store_teacher(&teacher).await?;
        Ok(teacher)
    }

    pub async fn get_teacher(&self, teacher_id: &str) -> Result<Teacher> {
        self.teachers
            .get_teacher(teacher_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Teacher", teacher_id).into())
    }

    pub async fn list_teachers(&self) -> Result<Vec<Teacher>> {
        self.teachers.list_teachers().await
    }

    pub async fn update_teacher(&self, teacher_id: &str, request: UpdateTeacherRequest) -> Result<Teacher> {
        info!("Updating teacher {}: {:?}", teacher_id, request);
        let mut teacher = self.get_teacher(teacher_id).await?;

        if let Some(name) = request.name {
            teacher.name = required("Name", &name)?;
        }
        if let Some(department) = request.department {
            teacher.department = required("Department", &department)?;
        }
        if let Some(email) = request.email {
            teacher.email = valid_email(&email)?;
        }
        if let Some(flag) = request.is_librarian {
            teacher.is_librarian = flag;
        }
        if let Some(flag) = request.account_handler {
            teacher.account_handler = flag;
        }
        if let Some(flag) = request.is_admin {
            teacher.is_admin = flag;
        }

        self.teachers.update_teacher(&teacher).await?;
        Ok(teacher)
    }

    pub async fn delete_teacher(&self, teacher_id: &str) -> Result<()> {
        info!("Deleting teacher {}", teacher_id);
        if !self.teachers.delete_teacher(teacher_id).await? {
            return Err(DomainError::not_found("Teacher", teacher_id).into());
        }
        Ok(())
    }
}
