use anyhow::Result;
use async_trait::async_trait;
use std::fs;
use tracing::{debug, info};

use super::connection::{read_yaml, read_yaml_directory, write_yaml_atomic, FileConnection};
use crate::domain::models::student::Student;
use crate::storage::traits::StudentStorage;

/// Student documents, one YAML file per student
#[derive(Clone)]
pub struct StudentRepository {
    connection: FileConnection,
}

impl StudentRepository {
    pub fn new(connection: FileConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl StudentStorage for StudentRepository {
    async fn store_student(&self, student: &Student) -> Result<()> {
        write_yaml_atomic(&self.connection.student_file(&student.id), student)?;
        info!("Stored student {} ({})", student.roll_no, student.id);
        Ok(())
    }

    async fn get_student(&self, student_id: &str) -> Result<Option<Student>> {
        let student: Option<Student> = read_yaml(&self.connection.student_file(student_id))?;
        // The file name is derived from the id, so guard against two ids that
        // sanitize to the same name
        Ok(student.filter(|s| s.id == student_id))
    }

    async fn find_student_by_roll_no(&self, roll_no: &str) -> Result<Option<Student>> {
        let wanted = roll_no.trim();
        Ok(self
            .list_students()
            .await?
            .into_iter()
            .find(|s| s.roll_no.trim().eq_ignore_ascii_case(wanted)))
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        let mut students: Vec<Student> = read_yaml_directory(&self.connection.students_directory())?;
        students.sort_by(|a, b| a.roll_no.cmp(&b.roll_no).then_with(|| a.id.cmp(&b.id)));
        debug!("Listed {} students", students.len());
        Ok(students)
    }

    async fn update_student(&self, student: &Student) -> Result<()> {
        let path = self.connection.student_file(&student.id);
        if !path.exists() {
            anyhow::bail!("Student document not found: {}", student.id);
        }
        write_yaml_atomic(&path, student)
    }

    async fn delete_student(&self, student_id: &str) -> Result<bool> {
        let path = self.connection.student_file(student_id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        info!("Deleted student document: {}", path.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::files::test_utils::{sample_student, TestEnvironment};

    #[tokio::test]
    async fn test_store_get_and_list_ordered_by_roll_no() {
        let env = TestEnvironment::new().unwrap();
        let repo = StudentRepository::new(env.connection.clone());

        let b = sample_student("CS-02", "Bilal");
        let a = sample_student("CS-01", "Asha");
        repo.store_student(&b).await.unwrap();
        repo.store_student(&a).await.unwrap();

        let listed = repo.list_students().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].roll_no, "CS-01");
        assert_eq!(listed[1].roll_no, "CS-02");

        let fetched = repo.get_student(&a.id).await.unwrap().expect("student should exist");
        assert_eq!(fetched, a);
    }

    #[tokio::test]
    async fn test_find_by_roll_no_ignores_case_and_whitespace() {
        let env = TestEnvironment::new().unwrap();
        let repo = StudentRepository::new(env.connection.clone());
        let student = sample_student("CS-07", "Chen");
        repo.store_student(&student).await.unwrap();

        let found = repo.find_student_by_roll_no(" cs-07 ").await.unwrap();
        assert_eq!(found.map(|s| s.id), Some(student.id));
        assert!(repo.find_student_by_roll_no("CS-99").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let env = TestEnvironment::new().unwrap();
        let repo = StudentRepository::new(env.connection.clone());
        let mut student = sample_student("CS-03", "Dev");

        assert!(repo.update_student(&student).await.is_err());

        repo.store_student(&student).await.unwrap();
        student.semester = 4;
        repo.update_student(&student).await.unwrap();
        assert_eq!(repo.get_student(&student.id).await.unwrap().unwrap().semester, 4);

        assert!(repo.delete_student(&student.id).await.unwrap());
        assert!(!repo.delete_student(&student.id).await.unwrap());
        assert!(repo.get_student(&student.id).await.unwrap().is_none());
    }
}
