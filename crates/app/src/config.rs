use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use study_core::model::{ProgressSettings, ProgressSettingsDraft, SettingsError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid settings: {0}")]
    Invalid(#[from] SettingsError),
}

/// On-disk layout:
///
/// ```toml
/// [progress]
/// xp_per_level = 500
/// practice_batch_size = 5
/// default_confidence = 3
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    progress: ProgressSettingsDraft,
}

/// Load settings from `path`, or defaults when no path is given.
pub fn load_settings(path: Option<&Path>) -> Result<ProgressSettings, ConfigError> {
    let Some(path) = path else {
        return Ok(ProgressSettings::default());
    };

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: ConfigFile = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(file.progress.validate()?)
}
