use anyhow::Result;
use async_trait::async_trait;
use std::fs;
use tracing::info;

use super::connection::{read_yaml, read_yaml_directory, write_yaml_atomic, FileConnection};
use crate::domain::models::teacher::Teacher;
use crate::storage::traits::TeacherStorage;

#[derive(Clone)]
pub struct TeacherRepository {
    connection: FileConnection,
}

impl TeacherRepository {
    pub fn new(connection: FileConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl TeacherStorage for TeacherRepository {
    async fn store_teacher(&self, teacher: &Teacher) -> Result<()> {
        write_yaml_atomic(&self.connection.teacher_file(&teacher.id), teacher)?;
        info!("Stored teacher {} ({})", teacher.name, teacher.id);
        Ok(())
    }

    async fn get_teacher(&self, teacher_id: &str) -> Result<Option<Teacher>> {
        let teacher: Option<Teacher> = read_yaml(&self.connection.teacher_file(teacher_id))?;
        Ok(teacher.filter(|t| t.id == teacher_id))
    }

    async fn list_teachers(&self) -> Result<Vec<Teacher>> {
        let mut teachers: Vec<Teacher> = read_yaml_directory(&self.connection.teachers_directory())?;
        teachers.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(teachers)
    }

    async fn update_teacher(&self, teacher: &Teacher) -> Result<()> {
        let path = self.connection.teacher_file(&teacher.id);
        if !path.exists() {
            anyhow::bail!("Teacher document not found: {}", teacher.id);
        }
        write_yaml_atomic(&path, teacher)
    }

    async fn delete_teacher(&self, teacher_id: &str) -> Result<bool> {
        let path = self.connection.teacher_file(teacher_id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        info!("Deleted teacher document: {}", path.display());
        Ok(true)
    }
}
