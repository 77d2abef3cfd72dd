use anyhow::Result;
use chrono::Utc;
use shared::{MarksRecord, MarksRow, MarksTable};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::errors::DomainError;
use crate::domain::marks::flatten_marks;
use crate::domain::models::marks::MarksExam;
use crate::domain::models::roll_no_key;
use crate::domain::models::subject::Subject;
use crate::storage::{MarksStorage, Repositories, SubjectStorage};

#[derive(Debug, Clone)]
pub struct RecordMarksCommand {
    pub subject_id: String,
    pub exam_id: String,
    pub records: Vec<MarksRecord>,
}

/// Records and looks up exam marks for a subject
#[derive(Clone)]
pub struct MarksService {
    subjects: Arc<dyn SubjectStorage>,
    marks: Arc<dyn MarksStorage>,
}

impl MarksService {
    pub fn new(repositories: &Repositories) -> Self {
        Self {
            subjects: repositories.subjects.clone(),
            marks: repositories.marks.clone(),
        }
    }

    async fn load_subject(&self, subject_id: &str) -> Result<Subject> {
        self.subjects
            .get_subject(subject_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Subject", subject_id).into())
    }

    /// Insert or replace the marks of one exam
    pub async fn record_exam_marks(&self, command: RecordMarksCommand) -> Result<MarksExam> {
        info!(
            "Recording marks for exam '{}' of subject {} ({} records)",
            command.exam_id,
            command.subject_id,
            command.records.len()
        );

        let subject = self.load_subject(&command.subject_id).await?;
        let exam_id = command.exam_id.trim();
        if exam_id.is_empty() {
            return Err(DomainError::Validation("Exam id cannot be empty".to_string()).into());
        }

        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(command.records.len());
        for record in command.records {
            let roll_no = record.roll_no.trim().to_string();
            if roll_no.is_empty() {
                return Err(DomainError::Validation("Roll number cannot be empty".to_string()).into());
            }
            if !record.marks.is_finite() || record.marks < 0.0 {
                return Err(DomainError::Validation(format!(
                    "Marks for {} must be a non-negative number",
                    roll_no
                ))
                .into());
            }
            if !seen.insert(roll_no_key(&roll_no)) {
                return Err(DomainError::Validation(format!(
                    "Roll number {} appears more than once in this exam",
                    roll_no
                ))
                .into());
            }
            let roll_no = match subject.roster_entry(&roll_no) {
                Some(entry) => entry.roll_no.clone(),
                None => {
                    warn!("Exam '{}' of subject {} has marks for unrostered roll number {}", exam_id, subject.id, roll_no);
                    roll_no
                }
            };
            records.push(MarksRecord { roll_no, marks: record.marks });
        }

        let exam = MarksExam {
            exam_id: exam_id.to_string(),
            subject_id: subject.id.clone(),
            records,
            updated_at: Utc::now(),
        };
        self.marks.upsert_exam(&exam).await?;
        Ok(exam)
    }

    pub async fn list_exams(&self, subject_id: &str) -> Result<Vec<MarksExam>> {
        self.load_subject(subject_id).await?;
        self.marks.list_exams(subject_id).await
    }

    /// Roster rows first, in roster order, then any roll numbers that only
    /// appear in exam records
    pub async fn marks_table(&self, subject_id: &str) -> Result<MarksTable> {
        info!("Building marks table for subject {}", subject_id);
        let subject = self.load_subject(subject_id).await?;
        let exams = self.marks.list_exams(subject_id).await?;

        let mut exam_ids: Vec<String> = exams.iter().map(|e| e.exam_id.clone()).collect();
        exam_ids.sort();
        exam_ids.dedup();

        let mut flattened = flatten_marks(&exams);
        let mut rows: Vec<MarksRow> = subject
            .students
            .iter()
            .map(|student| MarksRow {
                roll_no: student.roll_no.clone(),
                name: student.name.clone(),
                marks: flattened.remove(&student.roll_no).unwrap_or_default(),
            })
            .collect();
        rows.extend(flattened.into_iter().map(|(roll_no, marks)| MarksRow {
            roll_no,
            name: String::new(),
            marks,
        }));

        Ok(MarksTable {
            subject_id: subject.id,
            exam_ids,
            rows,
        })
    }
}
