//! Subjects and their embedded rosters.
//!
//! The roster is copied into the subject when it is created. Later changes to
//! student documents do not flow back into existing subjects.

use anyhow::Result;
use chrono::Utc;
use shared::{CreateSubjectRequest, RosterStudent, SubjectTeacher};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::errors::DomainError;
use crate::domain::models::roll_no_key;
use crate::domain::models::subject::Subject;
use crate::storage::{Repositories, StudentStorage, SubjectStorage};

#[derive(Clone)]
pub struct SubjectService {
    subjects: Arc<dyn SubjectStorage>,
    students: Arc<dyn StudentStorage>,
}

impl SubjectService {
    pub fn new(repositories: &Repositories) -> Self {
        Self {
            subjects: repositories.subjects.clone(),
            students: repositories.students.clone(),
        }
    }

    pub async fn create_subject(&self, request: CreateSubjectRequest) -> Result<Subject> {
        info!(
            "Creating subject {} with {} students",
            request.subject_code,
            request.students.len()
        );

        let subject_code = request.subject_code.trim().to_string();
        let subject_name = request.subject_name.trim().to_string();
        if subject_code.is_empty() {
            return Err(DomainError::Validation("Subject code cannot be empty".to_string()).into());
        }
        if subject_name.is_empty() {
            return Err(DomainError::Validation("Subject name cannot be empty".to_string()).into());
        }

        let mut seen = HashSet::new();
        let mut roster = Vec::with_capacity(request.students.len());
        for entry in request.students {
            let roll_no = entry.roll_no.trim().to_string();
            if roll_no.is_empty() {
                return Err(DomainError::Validation("Roster roll number cannot be empty".to_string()).into());
            }
            if !seen.insert(roll_no_key(&roll_no)) {
                return Err(DomainError::Validation(format!(
                    "Roll number {} is listed twice in the roster",
                    roll_no
                ))
                .into());
            }
            roster.push(self.resolve_roster_entry(entry, roll_no).await?);
        }

        let teachers: Vec<SubjectTeacher> = request
            .teachers
            .into_iter()
            .filter(|t| !t.id.trim().is_empty() || !t.name.trim().is_empty())
            .collect();

        let subject = Subject {
            id: Subject::generate_id(),
            subject_code,
            subject_name,
            teachers,
            students: roster,
            created_at: Utc::now(),
        };
        self.subjects.store_subject(&subject).await?;
        Ok(subject)
    }

    /// Link the entry to its student record: the roll number takes the
    /// student's spelling, and a blank id or name is filled in
    async fn resolve_roster_entry(&self, entry: RosterStudent, roll_no: String) -> Result<RosterStudent> {
        let mut resolved = RosterStudent {
            id: entry.id.trim().to_string(),
            roll_no,
            name: entry.name.trim().to_string(),
        };

        match self.students.find_student_by_roll_no(&resolved.roll_no).await? {
            Some(student) => {
                resolved.roll_no = student.roll_no.trim().to_string();
                if resolved.id.is_empty() {
                    resolved.id = student.id;
                }
                if resolved.name.is_empty() {
                    resolved.name = student.name;
                }
            }
            None => warn!("Roster roll number {} has no student record", resolved.roll_no),
        }
        Ok(resolved)
    }

    pub async fn get_subject(&self, subject_id: &str) -> Result<Subject> {
        self.subjects
            .get_subject(subject_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Subject", subject_id).into())
    }

    pub async fn list_subjects(&self) -> Result<Vec<Subject>> {
        self.subjects.list_subjects().await
    }

    /// Attendance and marks recorded for the subject stay on disk
    pub async fn delete_subject(&self, subject_id: &str) -> Result<()> {
        info!("Deleting subject {}", subject_id);
        if !self.subjects.delete_subject(subject_id).await? {
            return Err(DomainError::not_found("Subject", subject_id).into());
        }
        Ok(())
    }
}
