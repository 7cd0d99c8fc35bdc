//! Service configuration
//!
//! ```toml
//! [registry]
//! path = "datasets.toml"
//!
//! [storage]
//! backend = "file"
//! root = "tables"
//!
//! [history]
//! author_name = "dataset-sync"
//! author_email = "dataset-sync@localhost"
//!
//! [ingest]
//! extensions = ["csv", "tsv"]
//! ```
//!
//! Relative paths are resolved against the state directory.

use std::path::{Path, PathBuf};

use dsync_fs::{ConfigStore, NormalizedPath};
use dsync_git::GitHistory;
use dsync_ingest::FolderReader;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Directory name used under the platform data directory.
pub const STATE_DIR_NAME: &str = "dataset-sync";

/// Default state directory: `<data_local_dir>/dataset-sync`.
pub fn default_state_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(STATE_DIR_NAME))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub registry: RegistryConfig,
    pub storage: StorageConfig,
    pub history: HistoryConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub path: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: "datasets.toml".to_string(),
        }
    }
}

/// Where synced tables are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub root: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            root: "tables".to_string(),
        }
    }
}

/// Identity stamped on sync commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub author_name: String,
    pub author_email: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        let history = GitHistory::new();
        Self {
            author_name: history.author_name().to_string(),
            author_email: history.author_email().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub extensions: Vec<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["csv".to_string(), "tsv".to_string()],
        }
    }
}

impl SyncConfig {
    /// Load from a TOML, JSON or YAML file; a missing file yields defaults.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let config: Self = ConfigStore::new().load_or_default(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.registry.path.trim().is_empty() {
            return Err(invalid("registry.path must not be empty"));
        }
        if self.storage.backend == StorageBackend::File && self.storage.root.trim().is_empty() {
            return Err(invalid("storage.root must not be empty for the file backend"));
        }
        if self.history.author_name.trim().is_empty() || self.history.author_email.trim().is_empty()
        {
            return Err(invalid("history author name and email must not be empty"));
        }
        self.reader()?;
        Ok(())
    }

    pub fn registry_path(&self, state_dir: &Path) -> NormalizedPath {
        resolve(state_dir, &self.registry.path)
    }

    pub fn storage_root(&self, state_dir: &Path) -> NormalizedPath {
        resolve(state_dir, &self.storage.root)
    }

    pub fn history(&self) -> GitHistory {
        GitHistory::with_author(&self.history.author_name, &self.history.author_email)
    }

    pub fn reader(&self) -> Result<FolderReader> {
        Ok(FolderReader::with_extensions(&self.ingest.extensions)?)
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidConfig {
        message: message.to_string(),
    }
}

fn resolve(state_dir: &Path, configured: &str) -> NormalizedPath {
    let path = Path::new(configured);
    if path.is_absolute() {
        NormalizedPath::new(path)
    } else {
        NormalizedPath::new(state_dir.join(path))
    }
}
