mod achievement;
mod exercise;
mod experience;
mod goal;
mod ids;
mod settings;

pub use achievement::{Achievement, AchievementError, AchievementRecord, Rarity};
pub use exercise::{
    Difficulty, DifficultyBand, Exercise, ExerciseError, ExerciseKind, ExerciseRecord,
};
pub use experience::{DEFAULT_XP_PER_LEVEL, Experience};
pub use goal::{
    DeadlineStatus, Goal, GoalDraft, GoalError, GoalKind, GoalPriority, GoalRecord, GoalStatus,
    Milestone, ProgressUpdate, ValidatedGoal,
};
pub use ids::{AchievementId, ExerciseId, GoalId, ParseIdError};
pub use settings::{ProgressSettings, ProgressSettingsDraft, SettingsError};
