use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use study_core::model::{Achievement, Exercise, Goal};
use thiserror::Error;

const SAMPLE_DATA: &str = include_str!("../data/sample.json");

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read data file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse data file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("built-in sample data is malformed: {0}")]
    Sample(#[source] serde_json::Error),
}

/// Everything the binary works on, loaded once at startup.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StudyData {
    pub goals: Vec<Goal>,
    pub achievements: Vec<Achievement>,
    pub exercises: Vec<Exercise>,
}

impl StudyData {
    /// Read a JSON data file, or the built-in sample set when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, DataError> {
        let Some(path) = path else {
            return Self::sample();
        };

        let content = fs::read_to_string(path).map_err(|source| DataError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| DataError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn sample() -> Result<Self, DataError> {
        serde_json::from_str(SAMPLE_DATA).map_err(DataError::Sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::{Experience, GoalId};

    #[test]
    fn sample_data_loads() {
        let data = StudyData::sample().unwrap();
        assert_eq!(data.goals.len(), 3);
        assert_eq!(data.achievements.len(), 4);
        assert_eq!(data.exercises.len(), 3);

        let linear_algebra = &data.goals[0];
        assert_eq!(linear_algebra.id(), GoalId::new(1));
        let completed: Vec<bool> = linear_algebra
            .milestones()
            .iter()
            .map(|m| m.completed)
            .collect();
        assert_eq!(completed, vec![true, true, false, false]);
        assert!(data.goals[2].is_completed());
    }

    #[test]
    fn sample_xp_matches_completed_and_unlocked_rewards() {
        let data = StudyData::sample().unwrap();
        let xp = Experience::from_progress(&data.goals, &data.achievements, 500);
        assert_eq!(xp.total_xp(), 400 + 100 + 150);
        assert_eq!(xp.level(), 2);
    }

    #[test]
    fn invalid_record_fails_the_whole_file() {
        let json = r#"{ "goals": [{ "id": 1, "title": " ", "type": "reading",
            "target": 10, "unit": "pages", "deadline": "2027-01-01" }] }"#;
        assert!(serde_json::from_str::<StudyData>(json).is_err());
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let data: StudyData = serde_json::from_str("{}").unwrap();
        assert!(data.goals.is_empty());
        assert!(data.exercises.is_empty());
    }
}
