//! Per-invocation service wiring

use std::path::{Path, PathBuf};

use dsync_core::{DatasetId, DatasetService, SyncConfig, default_state_dir};
use dsync_fs::NormalizedPath;

use crate::error::{CliError, Result};

const CONFIG_FILE: &str = "config.toml";

/// Loaded configuration and the service built from it.
pub struct Context {
    pub state_dir: PathBuf,
    pub config: SyncConfig,
    pub service: DatasetService,
}

impl Context {
    /// Resolve the state directory and configuration, then build the service.
    ///
    /// Without `--config` the file `<state-dir>/config.toml` is used if it
    /// exists.
    pub fn load(state_dir: Option<&Path>, config: Option<&Path>) -> Result<Self> {
        let state_dir = match state_dir {
            Some(dir) => dir.to_path_buf(),
            None => default_state_dir().ok_or_else(|| {
                CliError::user("cannot determine a data directory; pass --state-dir")
            })?,
        };
        let config_path = match config {
            Some(path) => path.to_path_buf(),
            None => state_dir.join(CONFIG_FILE),
        };

        let config = SyncConfig::load(&NormalizedPath::new(&config_path))?;
        let service = DatasetService::from_config(&config, &state_dir)?;
        tracing::debug!(
            state_dir = %state_dir.display(),
            config = %config_path.display(),
            "Loaded context"
        );

        Ok(Self {
            state_dir,
            config,
            service,
        })
    }
}

/// Parse a dataset id argument.
pub fn parse_id(raw: &str) -> Result<DatasetId> {
    Ok(raw.parse::<DatasetId>()?)
}
