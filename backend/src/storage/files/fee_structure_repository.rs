use anyhow::{Context, Result};
use async_trait::async_trait;
use csv::{Reader, Writer};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use tracing::info;

use super::connection::FileConnection;
use crate::domain::errors::DomainError;
use crate::domain::models::fees::FeeStructure;
use crate::storage::traits::FeeStructureStorage;

/// Fee structures kept in a single CSV table
#[derive(Clone)]
pub struct FeeStructureRepository {
    connection: FileConnection,
}

impl FeeStructureRepository {
    pub fn new(connection: FileConnection) -> Self {
        Self { connection }
    }

    fn read_structures(&self) -> Result<Vec<FeeStructure>> {
        let file_path = self.connection.fee_structure_file();
        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut structures = Vec::new();
        for (index, result) in csv_reader.deserialize::<FeeStructure>().enumerate() {
            let structure = result.with_context(|| {
                format!("Malformed row {} in {}", index + 2, file_path.display())
            })?;
            structures.push(structure);
        }

        Ok(structures)
    }

    /// Rewrite the whole table through a temp file
    fn write_structures(&self, structures: &[FeeStructure]) -> Result<()> {
        let file_path = self.connection.fee_structure_file();
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));

            if structures.is_empty() {
                csv_writer.write_record(["id", "semester", "fee_type", "amount", "due_date"])?;
            }
            for structure in structures {
                csv_writer.serialize(structure)?;
            }
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;
        Ok(())
    }

    fn sort(structures: &mut [FeeStructure]) {
        structures.sort_by(|a, b| {
            a.semester
                .cmp(&b.semester)
                .then_with(|| a.fee_type.cmp(&b.fee_type))
                .then_with(|| a.id.cmp(&b.id))
        });
    }
}

#[async_trait]
impl FeeStructureStorage for FeeStructureRepository {
    async fn store_structure(&self, structure: &FeeStructure) -> Result<()> {
        let _guard = self.connection.fee_structure_lock().lock().await;
        let mut structures = self.read_structures()?;
        if structures
            .iter()
            .any(|s| s.semester == structure.semester && s.fee_type == structure.fee_type)
        {
            return Err(DomainError::Conflict(format!(
                "Semester {} already has a '{}' fee",
                structure.semester, structure.fee_type
            ))
            .into());
        }
        structures.push(structure.clone());
        Self::sort(&mut structures);
        self.write_structures(&structures)?;
        info!(
            "Stored fee structure {}: semester {} {} = {:.2} due {}",
            structure.id, structure.semester, structure.fee_type, structure.amount, structure.due_date
        );
        Ok(())
    }

    async fn list_structures(&self) -> Result<Vec<FeeStructure>> {
        let mut structures = self.read_structures()?;
        Self::sort(&mut structures);
        Ok(structures)
    }

    async fn list_structures_for_semester(&self, semester: u32) -> Result<Vec<FeeStructure>> {
        let mut structures = self.list_structures().await?;
        structures.retain(|s| s.semester == semester);
        Ok(structures)
    }

    async fn delete_structure(&self, structure_id: &str) -> Result<bool> {
        let _guard = self.connection.fee_structure_lock().lock().await;
        let mut structures = self.read_structures()?;
        let before = structures.len();
        structures.retain(|s| s.id != structure_id);
        if structures.len() == before {
            return Ok(false);
        }
        self.write_structures(&structures)?;
        info!("Deleted fee structure {}", structure_id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::files::test_utils::{sample_structure, TestEnvironment};

    #[tokio::test]
    async fn test_store_and_query_by_semester() {
        let env = TestEnvironment::new().unwrap();
        let repo = FeeStructureRepository::new(env.connection.clone());

        repo.store_structure(&sample_structure(2, "tuition", 6000.0, "2024-07-01")).await.unwrap();
        repo.store_structure(&sample_structure(1, "tuition", 5000.0, "2024-01-01")).await.unwrap();
        repo.store_structure(&sample_structure(1, "library", 300.0, "2024-01-15")).await.unwrap();

        let all = repo.list_structures().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!((all[0].semester, all[0].fee_type.as_str()), (1, "library"));
        assert_eq!((all[2].semester, all[2].fee_type.as_str()), (2, "tuition"));

        let first = repo.list_structures_for_semester(1).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].amount, 5000.0);
        assert_eq!(first[1].due_date.to_string(), "2024-01-01");
    }

    #[tokio::test]
    async fn test_delete_structure() {
        let env = TestEnvironment::new().unwrap();
        let repo = FeeStructureRepository::new(env.connection.clone());
        let structure = sample_structure(1, "exam", 800.0, "2024-03-01");
        repo.store_structure(&structure).await.unwrap();

        assert!(repo.delete_structure(&structure.id).await.unwrap());
        assert!(!repo.delete_structure(&structure.id).await.unwrap());
        assert!(repo.list_structures().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_stores_keep_every_row() {
        let env = TestEnvironment::new().unwrap();
        let repo = FeeStructureRepository::new(env.connection.clone());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    let structure = sample_structure(1, &format!("fee{:02}", i), 100.0, "2024-01-01");
                    repo.store_structure(&structure).await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(repo.list_structures().await.unwrap().len(), 16);
    }

    #[tokio::test]
    async fn test_duplicate_fee_type_is_conflict() {
        let env = TestEnvironment::new().unwrap();
        let repo = FeeStructureRepository::new(env.connection.clone());

        repo.store_structure(&sample_structure(1, "exam", 800.0, "2024-03-01")).await.unwrap();
        let err = repo
            .store_structure(&sample_structure(1, "exam", 900.0, "2024-03-05"))
            .await
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Conflict(_))));
        repo.store_structure(&sample_structure(2, "exam", 900.0, "2024-08-01")).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_table_reads_empty() {
        let env = TestEnvironment::new().unwrap();
        let repo = FeeStructureRepository::new(env.connection.clone());
        assert!(repo.list_structures().await.unwrap().is_empty());
    }
}
