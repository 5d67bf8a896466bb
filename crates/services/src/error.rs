//! Shared error types for the services crate.

use thiserror::Error;

use study_core::model::{AchievementId, GoalError, GoalId};

use crate::practice::SessionState;

/// Coarse classification callers can branch on without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input: negative numbers, empty pools, blank strings, bad milestones.
    Validation,
    /// Reference to an unknown goal or achievement.
    NotFound,
    /// Operation not allowed in the current session state.
    InvalidState,
}

/// Errors emitted by `GoalTracker`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TrackerError {
    #[error(transparent)]
    Goal(#[from] GoalError),
    #[error("goal {0} not found")]
    GoalNotFound(GoalId),
    #[error("achievement {0} not found")]
    AchievementNotFound(AchievementId),
    #[error("no goal ids left to assign")]
    GoalIdsExhausted,
}

impl TrackerError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Goal(_) => ErrorKind::Validation,
            Self::GoalNotFound(_) | Self::AchievementNotFound(_) => ErrorKind::NotFound,
            Self::GoalIdsExhausted => ErrorKind::InvalidState,
        }
    }
}

/// Errors emitted by `PracticeSession`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PracticeError {
    #[error("no exercises available for practice")]
    EmptyPool,
    #[error("practice limit must be > 0")]
    InvalidLimit,
    #[error("none of the {pool_size} exercises are due")]
    NoDueExercises { pool_size: usize },
    #[error("answer cannot be empty")]
    EmptyAnswer,
    #[error("confidence must be between 1 and 5, got {0}")]
    InvalidConfidence(u8),
    #[error("cannot {action} while session is {state}")]
    InvalidState {
        action: &'static str,
        state: SessionState,
    },
}

impl PracticeError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            _ => ErrorKind::Validation,
        }
    }
}
