use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{EtlError, Result};
use crate::types::LabelValuePolicy;

/// Resolved on-disk locations for one pipeline run.
///
/// Passed explicitly into the stages instead of living in process-wide
/// globals, so tests can point a run at a scratch directory.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub data_dir: PathBuf,
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub models_dir: PathBuf,
}

impl DataPaths {
    /// Derive the standard layout under a project root:
    /// `data/raw`, `data/processed`, and `models`.
    pub fn from_root<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        let data_dir = root.join("data");
        Self {
            raw_dir: data_dir.join("raw"),
            processed_dir: data_dir.join("processed"),
            models_dir: root.join("models"),
            data_dir,
        }
    }

    pub fn messages_csv(&self) -> PathBuf {
        self.raw_dir.join(constants::MESSAGES_FILE)
    }

    pub fn categories_csv(&self) -> PathBuf {
        self.raw_dir.join(constants::CATEGORIES_FILE)
    }

    pub fn database(&self) -> PathBuf {
        self.raw_dir.join(constants::DATABASE_FILE)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EtlConfig {
    #[serde(default)]
    pub data: DataSection,
    #[serde(default)]
    pub cleaning: CleaningSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct DataSection {
    /// Project root holding data/ and models/
    pub root: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CleaningSection {
    #[serde(default)]
    pub label_value_policy: LabelValuePolicy,
}

impl EtlConfig {
    /// Load a config file if one exists; a missing file means defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            EtlError::Config(format!("Failed to read config file '{}': {}", path, e))
        })?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the project root: explicit CLI value, then the config file,
    /// then the DISASTER_ETL_ROOT environment variable, then the current
    /// directory.
    pub fn resolve_root(&self, cli_root: Option<PathBuf>) -> PathBuf {
        cli_root
            .or_else(|| self.data.root.clone())
            .or_else(|| {
                std::env::var(constants::ROOT_ENV_VAR)
                    .ok()
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
