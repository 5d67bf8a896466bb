use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::experience::DEFAULT_XP_PER_LEVEL;

/// Tunables for the progress tracker and practice sessions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProgressSettings {
    xp_per_level: u32,
    practice_batch_size: u32,
    default_confidence: u8,
}

/// Unvalidated settings, as read from a config file.
///
/// Missing keys fall back to [`ProgressSettings::default`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProgressSettingsDraft {
    pub xp_per_level: u32,
    pub practice_batch_size: u32,
    pub default_confidence: u8,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("xp per level must be > 0")]
    InvalidXpPerLevel,
    #[error("practice batch size must be > 0")]
    InvalidPracticeBatchSize,
    #[error("default confidence must be between 1 and 5, got {0}")]
    InvalidDefaultConfidence(u8),
}

impl Default for ProgressSettingsDraft {
    fn default() -> Self {
        let defaults = ProgressSettings::default();
        Self {
            xp_per_level: defaults.xp_per_level,
            practice_batch_size: defaults.practice_batch_size,
            default_confidence: defaults.default_confidence,
        }
    }
}

impl ProgressSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the draft into usable settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` for a zero level size or batch size, or a
    /// default confidence outside 1..=5.
    pub fn validate(self) -> Result<ProgressSettings, SettingsError> {
        if self.xp_per_level == 0 {
            return Err(SettingsError::InvalidXpPerLevel);
        }
        if self.practice_batch_size == 0 {
            return Err(SettingsError::InvalidPracticeBatchSize);
        }
        if !(1..=5).contains(&self.default_confidence) {
            return Err(SettingsError::InvalidDefaultConfidence(
                self.default_confidence,
            ));
        }

        Ok(ProgressSettings {
            xp_per_level: self.xp_per_level,
            practice_batch_size: self.practice_batch_size,
            default_confidence: self.default_confidence,
        })
    }
}

impl ProgressSettings {
    #[must_use]
    pub fn xp_per_level(&self) -> u32 {
        self.xp_per_level
    }

    /// How many due exercises a quick practice run picks.
    #[must_use]
    pub fn practice_batch_size(&self) -> u32 {
        self.practice_batch_size
    }

    #[must_use]
    pub fn default_confidence(&self) -> u8 {
        self.default_confidence
    }
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            xp_per_level: DEFAULT_XP_PER_LEVEL,
            practice_batch_size: 5,
            default_confidence: 3,
        }
    }
}
