use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// FileConnection owns the data directory layout:
///
/// ```text
/// <base>/students/<id>.yaml
/// <base>/teachers/<id>.yaml
/// <base>/subjects/<id>/subject.yaml
/// <base>/subjects/<id>/attendance/<session>.yaml
/// <base>/subjects/<id>/marks/<exam>.yaml
/// <base>/fee_structure.csv
/// <base>/fee_payments.csv
/// ```
#[derive(Clone)]
pub struct FileConnection {
    base_directory: PathBuf,
    payment_log_lock: Arc<Mutex<()>>,
    fee_structure_lock: Arc<Mutex<()>>,
}

impl FileConnection {
    /// Create a connection rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {}", base_path.display()))?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
            payment_log_lock: Arc::new(Mutex::new(())),
            fee_structure_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn students_directory(&self) -> PathBuf {
        self.base_directory.join("students")
    }

    pub fn teachers_directory(&self) -> PathBuf {
        self.base_directory.join("teachers")
    }

    pub fn subjects_directory(&self) -> PathBuf {
        self.base_directory.join("subjects")
    }

    pub fn student_file(&self, student_id: &str) -> PathBuf {
        self.students_directory().join(format!("{}.yaml", Self::safe_file_name(student_id)))
    }

    pub fn teacher_file(&self, teacher_id: &str) -> PathBuf {
        self.teachers_directory().join(format!("{}.yaml", Self::safe_file_name(teacher_id)))
    }

    pub fn subject_directory(&self, subject_id: &str) -> PathBuf {
        self.subjects_directory().join(Self::safe_file_name(subject_id))
    }

    pub fn subject_file(&self, subject_id: &str) -> PathBuf {
        self.subject_directory(subject_id).join("subject.yaml")
    }

    pub fn attendance_directory(&self, subject_id: &str) -> PathBuf {
        self.subject_directory(subject_id).join("attendance")
    }

    pub fn marks_directory(&self, subject_id: &str) -> PathBuf {
        self.subject_directory(subject_id).join("marks")
    }

    pub fn fee_structure_file(&self) -> PathBuf {
        self.base_directory.join("fee_structure.csv")
    }

    pub fn fee_payments_file(&self) -> PathBuf {
        self.base_directory.join("fee_payments.csv")
    }

    /// Serializes appends to the payment log so rows never interleave
    pub fn payment_log_lock(&self) -> &Mutex<()> {
        &self.payment_log_lock
    }

    /// Held across each read-modify-write of the fee structure table
    pub fn fee_structure_lock(&self) -> &Mutex<()> {
        &self.fee_structure_lock
    }

    /// Turn an identifier into a single safe path component.
    /// "Midterm 1" -> "midterm_1", "../etc" -> "etc", "student-ab12" unchanged.
    pub fn safe_file_name(raw: &str) -> String {
        let cleaned: String = raw
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect();

        let trimmed = cleaned.trim_matches('_');
        if trimmed.is_empty() {
            "unnamed".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// Write a YAML document atomically via a temp file and rename
pub fn write_yaml_atomic<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let yaml_content = serde_yaml::to_string(document)?;
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, yaml_content)?;
    fs::rename(&temp_path, path)?;

    debug!("Wrote document: {}", path.display());
    Ok(())
}

/// Read a YAML document, `None` when the file does not exist
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let document = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse document {}", path.display()))?;
    Ok(Some(document))
}

/// Read every `*.yaml` document in a directory. Unreadable documents are
/// skipped with a warning so one bad file does not hide the rest.
pub fn read_yaml_directory<T: DeserializeOwned>(directory: &Path) -> Result<Vec<T>> {
    if !directory.exists() {
        return Ok(Vec::new());
    }

    let mut documents = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
            continue;
        }

        match read_yaml::<T>(&path) {
            Ok(Some(document)) => documents.push(document),
            Ok(None) => {}
            Err(e) => warn!("Skipping unreadable document {}: {:#}", path.display(), e),
        }
    }

    Ok(documents)
}
