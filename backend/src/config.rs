//! # Configuration
//!
//! Settings are layered, lowest priority first:
//! 1. compiled defaults ([`AppConfig::default`])
//! 2. a YAML file: `$COLLEGE_MANAGER_CONFIG`, or `config.yaml` inside the data directory
//! 3. environment overrides (`COLLEGE_MANAGER_DATA_DIR`, `COLLEGE_MANAGER_BIND`)
//!
//! Missing keys in the file fall back to defaults field by field.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const CONFIG_PATH_VAR: &str = "COLLEGE_MANAGER_CONFIG";
pub const DATA_DIR_VAR: &str = "COLLEGE_MANAGER_DATA_DIR";
pub const BIND_VAR: &str = "COLLEGE_MANAGER_BIND";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_directory: PathBuf,
    pub bind_address: String,
    pub cors_origin: String,
    pub fees: FeeConfig,
    pub attendance: AttendanceConfig,
}

/// Where the reconciliation reads paid amounts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaidSource {
    /// Sum of the append-only payment log
    #[default]
    Ledger,
    /// Cumulative amount stored on the student record
    RunningTotal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeConfig {
    pub compulsory: Vec<String>,
    pub optional: Vec<String>,
    pub paid_source: PaidSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceConfig {
    /// Percentage below which a student is flagged
    pub low_threshold: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: Self::default_data_directory(),
            bind_address: "127.0.0.1:3000".to_string(),
            cors_origin: "http://localhost:8080".to_string(),
            fees: FeeConfig::default(),
            attendance: AttendanceConfig::default(),
        }
    }
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            compulsory: vec!["tuition".to_string(), "exam".to_string(), "library".to_string()],
            optional: vec!["hostel".to_string(), "transport".to_string()],
            paid_source: PaidSource::Ledger,
        }
    }
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self { low_threshold: 75 }
    }
}

impl AppConfig {
    /// `~/Documents/College Manager`, falling back to the home directory and
    /// finally the working directory
    pub fn default_data_directory() -> PathBuf {
        dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("College Manager")
    }

    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` for environment variables
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_PATH_VAR) {
            Some(path) => {
                info!("Loading configuration from {}", path);
                Self::from_yaml_file(Path::new(&path))?
            }
            None => {
                let data_dir = lookup(DATA_DIR_VAR)
                    .map(PathBuf::from)
                    .unwrap_or_else(Self::default_data_directory);
                let candidate = data_dir.join("config.yaml");
                if candidate.exists() {
                    info!("Loading configuration from {}", candidate.display());
                    Self::from_yaml_file(&candidate)?
                } else {
                    info!("No configuration file found, using defaults");
                    Self::default()
                }
            }
        };

        if let Some(dir) = lookup(DATA_DIR_VAR) {
            config.data_directory = PathBuf::from(dir);
        }
        if let Some(bind) = lookup(BIND_VAR) {
            config.bind_address = bind;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    fn validate(&self) -> Result<()> {
        if self.attendance.low_threshold > 100 {
            anyhow::bail!(
                "attendance.low_threshold must be between 0 and 100, got {}",
                self.attendance.low_threshold
            );
        }

        for fee_type in &self.fees.optional {
            if self.fees.compulsory.iter().any(|c| c.eq_ignore_ascii_case(fee_type)) {
                warn!("Fee type '{}' is listed as both compulsory and optional; treating it as compulsory", fee_type);
            }
        }

        Ok(())
    }
}
