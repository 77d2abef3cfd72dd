use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use super::connection::{read_yaml, read_yaml_directory, write_yaml_atomic, FileConnection};
use crate::domain::errors::DomainError;
use crate::domain::models::marks::MarksExam;
use crate::storage::traits::MarksStorage;

#[derive(Clone)]
pub struct MarksRepository {
    connection: FileConnection,
}

impl MarksRepository {
    pub fn new(connection: FileConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl MarksStorage for MarksRepository {
    async fn upsert_exam(&self, exam: &MarksExam) -> Result<()> {
        let path = self
            .connection
            .marks_directory(&exam.subject_id)
            .join(format!("{}.yaml", FileConnection::safe_file_name(&exam.exam_id)));

        if let Some(existing) = read_yaml::<MarksExam>(&path)? {
            if existing.exam_id != exam.exam_id {
                return Err(DomainError::Conflict(format!(
                    "Exam id '{}' collides with existing exam '{}' for subject {}",
                    exam.exam_id, existing.exam_id, exam.subject_id
                ))
                .into());
            }
        }

        write_yaml_atomic(&path, exam)?;
        info!("Stored marks for exam '{}' of subject {} ({} records)", exam.exam_id, exam.subject_id, exam.records.len());
        Ok(())
    }

    async fn list_exams(&self, subject_id: &str) -> Result<Vec<MarksExam>> {
        let mut exams: Vec<MarksExam> = read_yaml_directory(&self.connection.marks_directory(subject_id))?;
        exams.retain(|e| e.subject_id == subject_id);
        exams.sort_by(|a, b| a.exam_id.cmp(&b.exam_id));
        Ok(exams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::files::test_utils::TestEnvironment;
    use chrono::Utc;
    use shared::MarksRecord;

    fn exam(exam_id: &str, records: &[(&str, f64)]) -> MarksExam {
        MarksExam {
            exam_id: exam_id.to_string(),
            subject_id: "subject-1".to_string(),
            records: records
                .iter()
                .map(|(roll_no, marks)| MarksRecord { roll_no: roll_no.to_string(), marks: *marks })
                .collect(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_upsert_replaces_records() {
        let env = TestEnvironment::new().unwrap();
        let repo = MarksRepository::new(env.connection.clone());

        repo.upsert_exam(&exam("Midterm", &[("CS-01", 40.0)])).await.unwrap();
        repo.upsert_exam(&exam("Midterm", &[("CS-01", 45.0), ("CS-02", 38.0)])).await.unwrap();
        repo.upsert_exam(&exam("Final", &[("CS-01", 70.0)])).await.unwrap();

        let exams = repo.list_exams("subject-1").await.unwrap();
        assert_eq!(exams.len(), 2);
        assert_eq!(exams[0].exam_id, "Final");
        assert_eq!(exams[1].records.len(), 2);
        assert_eq!(exams[1].records[0].marks, 45.0);
    }

    #[tokio::test]
    async fn test_colliding_exam_ids_rejected() {
        let env = TestEnvironment::new().unwrap();
        let repo = MarksRepository::new(env.connection.clone());

        repo.upsert_exam(&exam("Unit Test 1", &[])).await.unwrap();
        let err = repo.upsert_exam(&exam("unit_test_1", &[])).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Conflict(_))));
    }
}
