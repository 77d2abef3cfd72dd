use anyhow::Result;
use async_trait::async_trait;
use std::fs;
use tracing::{info, warn};

use super::connection::{read_yaml, write_yaml_atomic, FileConnection};
use crate::domain::models::subject::Subject;
use crate::storage::traits::SubjectStorage;

/// Subject documents live in their own directory so attendance and marks can
/// sit beside them as sub-collections
#[derive(Clone)]
pub struct SubjectRepository {
    connection: FileConnection,
}

impl SubjectRepository {
    pub fn new(connection: FileConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl SubjectStorage for SubjectRepository {
    async fn store_subject(&self, subject: &Subject) -> Result<()> {
        write_yaml_atomic(&self.connection.subject_file(&subject.id), subject)?;
        info!("Stored subject {} ({}) with {} students", subject.subject_code, subject.id, subject.students.len());
        Ok(())
    }

    async fn get_subject(&self, subject_id: &str) -> Result<Option<Subject>> {
        let subject: Option<Subject> = read_yaml(&self.connection.subject_file(subject_id))?;
        Ok(subject.filter(|s| s.id == subject_id))
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        let subjects_dir = self.connection.subjects_directory();
        if !subjects_dir.exists() {
            return Ok(Vec::new());
        }

        let mut subjects = Vec::new();
        for entry in fs::read_dir(&subjects_dir)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }

            // Directories without subject.yaml are leftovers of deleted subjects
            match read_yaml::<Subject>(&path.join("subject.yaml")) {
                Ok(Some(subject)) => subjects.push(subject),
                Ok(None) => {}
                Err(e) => warn!("Skipping unreadable subject in {}: {:#}", path.display(), e),
            }
        }

        subjects.sort_by(|a, b| a.subject_code.cmp(&b.subject_code).then_with(|| a.id.cmp(&b.id)));
        Ok(subjects)
    }

    async fn delete_subject(&self, subject_id: &str) -> Result<bool> {
        let path = self.connection.subject_file(subject_id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        info!("Deleted subject document {} (attendance and marks left in place)", subject_id);
        Ok(true)
    }
}
