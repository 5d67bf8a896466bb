use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::GoalId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum GoalError {
    #[error("goal title cannot be empty")]
    EmptyTitle,

    #[error("goal unit cannot be empty")]
    EmptyUnit,

    #[error("goal target must be a positive number, got {provided}")]
    InvalidTarget { provided: f64 },

    #[error("progress must be a finite, non-negative number, got {provided}")]
    InvalidProgress { provided: f64 },

    #[error("milestone threshold must be a positive number, got {threshold}")]
    InvalidMilestone { threshold: f64 },

    #[error("milestone {threshold} exceeds goal target {target}")]
    MilestoneExceedsTarget { threshold: f64, target: f64 },

    #[error("milestones must be strictly ascending ({previous} then {next})")]
    MilestonesNotAscending { previous: f64, next: f64 },
}

//
// ─── ENUMS ─────────────────────────────────────────────────────────────────────
//

/// What a goal measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    StudyTime,
    Reading,
    TopicCompletion,
    #[serde(alias = "session_count")]
    Sessions,
    Habit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    High,
    #[default]
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Overdue,
}

/// Countdown to a goal's deadline, in whole calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineStatus {
    Overdue,
    DueToday,
    DueTomorrow,
    DaysLeft(u32),
}

impl DeadlineStatus {
    #[must_use]
    pub fn between(today: NaiveDate, deadline: NaiveDate) -> Self {
        match (deadline - today).num_days() {
            days if days < 0 => Self::Overdue,
            0 => Self::DueToday,
            1 => Self::DueTomorrow,
            days => Self::DaysLeft(u32::try_from(days).unwrap_or(u32::MAX)),
        }
    }
}

impl fmt::Display for DeadlineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overdue => f.write_str("Overdue"),
            Self::DueToday => f.write_str("Due today"),
            Self::DueTomorrow => f.write_str("Due tomorrow"),
            Self::DaysLeft(days) => write!(f, "{days} days left"),
        }
    }
}

//
// ─── MILESTONE ─────────────────────────────────────────────────────────────────
//

/// Progress checkpoint inside a goal. Once completed it stays completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub threshold: f64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, rename = "date", skip_serializing_if = "Option::is_none")]
    pub completed_on: Option<NaiveDate>,
}

impl Milestone {
    #[must_use]
    pub fn pending(threshold: f64) -> Self {
        Self {
            threshold,
            completed: false,
            completed_on: None,
        }
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// User input for a new goal, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalDraft {
    pub title: String,
    pub description: String,
    pub kind: GoalKind,
    pub target: f64,
    pub unit: String,
    pub deadline: NaiveDate,
    pub priority: GoalPriority,
    pub milestones: Vec<f64>,
    pub xp_reward: u32,
}

impl GoalDraft {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        kind: GoalKind,
        target: f64,
        unit: impl Into<String>,
        deadline: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            kind,
            target,
            unit: unit.into(),
            deadline,
            priority: GoalPriority::default(),
            milestones: Vec::new(),
            xp_reward: 0,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: GoalPriority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_xp_reward(mut self, xp_reward: u32) -> Self {
        self.xp_reward = xp_reward;
        self
    }

    #[must_use]
    pub fn with_milestones(mut self, thresholds: impl IntoIterator<Item = f64>) -> Self {
        self.milestones = thresholds.into_iter().collect();
        self
    }

    /// Splits the target into `count` equal checkpoints, the last one at the target.
    ///
    /// Intermediate thresholds are floored (450 pages in quarters gives
    /// 112, 225, 337, 450). Thresholds that floor to zero or repeat are dropped.
    #[must_use]
    pub fn with_even_milestones(mut self, count: u32) -> Self {
        let mut thresholds: Vec<f64> = (1..count)
            .map(|k| (self.target * f64::from(k) / f64::from(count)).floor())
            .filter(|t| *t > 0.0)
            .collect();
        if count > 0 {
            thresholds.push(self.target);
        }
        thresholds.dedup();
        self.milestones = thresholds;
        self
    }

    /// Validate the draft into a goal with no progress.
    ///
    /// # Errors
    ///
    /// Returns `GoalError` for an empty title or unit, a non-positive target,
    /// or milestones that are non-positive, above the target, or not strictly ascending.
    pub fn validate(self) -> Result<ValidatedGoal, GoalError> {
        let title = self.title.trim().to_string();
        let unit = self.unit.trim().to_string();
        check_shape(&title, &unit, self.target, &self.milestones)?;

        Ok(ValidatedGoal {
            title,
            description: self.description.trim().to_string(),
            kind: self.kind,
            target: self.target,
            unit,
            deadline: self.deadline,
            priority: self.priority,
            milestones: self.milestones.into_iter().map(Milestone::pending).collect(),
            xp_reward: self.xp_reward,
        })
    }
}

/// A goal that passed validation but has not been given an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedGoal {
    title: String,
    description: String,
    kind: GoalKind,
    target: f64,
    unit: String,
    deadline: NaiveDate,
    priority: GoalPriority,
    milestones: Vec<Milestone>,
    xp_reward: u32,
}

impl ValidatedGoal {
    #[must_use]
    pub fn assign_id(self, id: GoalId) -> Goal {
        Goal {
            id,
            title: self.title,
            description: self.description,
            kind: self.kind,
            target: self.target,
            current: 0.0,
            unit: self.unit,
            deadline: self.deadline,
            priority: self.priority,
            status: GoalStatus::Active,
            milestones: self.milestones,
            xp_reward: self.xp_reward,
        }
    }
}

fn check_shape(title: &str, unit: &str, target: f64, milestones: &[f64]) -> Result<(), GoalError> {
    if title.is_empty() {
        return Err(GoalError::EmptyTitle);
    }
    if unit.is_empty() {
        return Err(GoalError::EmptyUnit);
    }
    if !target.is_finite() || target <= 0.0 {
        return Err(GoalError::InvalidTarget { provided: target });
    }

    let mut previous: Option<f64> = None;
    for &threshold in milestones {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(GoalError::InvalidMilestone { threshold });
        }
        if threshold > target {
            return Err(GoalError::MilestoneExceedsTarget { threshold, target });
        }
        if let Some(prev) = previous {
            if threshold <= prev {
                return Err(GoalError::MilestonesNotAscending {
                    previous: prev,
                    next: threshold,
                });
            }
        }
        previous = Some(threshold);
    }
    Ok(())
}

fn check_progress(value: f64) -> Result<(), GoalError> {
    if !value.is_finite() || value < 0.0 {
        return Err(GoalError::InvalidProgress { provided: value });
    }
    Ok(())
}

//
// ─── GOAL ──────────────────────────────────────────────────────────────────────
//

/// Largest percentage an unfinished goal can report.
const OPEN_GOAL_PERCENT_CAP: f64 = 99.99;

/// What a single progress update changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    pub previous: f64,
    pub current: f64,
    pub milestones_reached: usize,
    pub goal_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GoalRecord", into = "GoalRecord")]
pub struct Goal {
    id: GoalId,
    title: String,
    description: String,
    kind: GoalKind,
    target: f64,
    current: f64,
    unit: String,
    deadline: NaiveDate,
    priority: GoalPriority,
    status: GoalStatus,
    milestones: Vec<Milestone>,
    xp_reward: u32,
}

impl Goal {
    /// Rehydrate a goal carrying existing progress.
    ///
    /// Milestones at or below `current` are marked completed, and a goal whose
    /// `current` already reaches the target is stored as completed.
    ///
    /// # Errors
    ///
    /// Returns `GoalError` when the record breaks any draft rule or `current` is negative.
    pub fn from_record(record: GoalRecord) -> Result<Self, GoalError> {
        let title = record.title.trim().to_string();
        let unit = record.unit.trim().to_string();
        let thresholds: Vec<f64> = record.milestones.iter().map(|m| m.threshold).collect();
        check_shape(&title, &unit, record.target, &thresholds)?;
        check_progress(record.current)?;

        let current = record.current;
        let milestones = record
            .milestones
            .into_iter()
            .map(|mut m| {
                m.completed = m.completed || m.completed_on.is_some() || m.threshold <= current;
                m
            })
            .collect();
        // Overdue is derived from the deadline on read, never stored.
        let status = if current >= record.target || record.status == GoalStatus::Completed {
            GoalStatus::Completed
        } else {
            GoalStatus::Active
        };

        Ok(Self {
            id: record.id,
            title,
            description: record.description.trim().to_string(),
            kind: record.kind,
            target: record.target,
            current,
            unit,
            deadline: record.deadline,
            priority: record.priority,
            status,
            milestones,
            xp_reward: record.xp_reward,
        })
    }

    #[must_use]
    pub fn id(&self) -> GoalId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn kind(&self) -> GoalKind {
        self.kind
    }

    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[must_use]
    pub fn current(&self) -> f64 {
        self.current
    }

    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    #[must_use]
    pub fn deadline(&self) -> NaiveDate {
        self.deadline
    }

    #[must_use]
    pub fn priority(&self) -> GoalPriority {
        self.priority
    }

    /// Stored status. Use [`Goal::status_on`] for the overdue-aware view.
    #[must_use]
    pub fn status(&self) -> GoalStatus {
        self.status
    }

    #[must_use]
    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    #[must_use]
    pub fn xp_reward(&self) -> u32 {
        self.xp_reward
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == GoalStatus::Completed
    }

    /// Completion in percent, clamped to `[0, 100]`.
    ///
    /// Exactly 100 only when `current >= target`.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        if self.current >= self.target {
            return 100.0;
        }
        (self.current / self.target * 100.0).min(OPEN_GOAL_PERCENT_CAP)
    }

    /// Status as seen on `today`: unfinished goals past their deadline read as overdue.
    #[must_use]
    pub fn status_on(&self, today: NaiveDate) -> GoalStatus {
        match self.status {
            GoalStatus::Active if today > self.deadline => GoalStatus::Overdue,
            status => status,
        }
    }

    #[must_use]
    pub fn deadline_status(&self, today: NaiveDate) -> DeadlineStatus {
        DeadlineStatus::between(today, self.deadline)
    }

    /// Set the current progress value.
    ///
    /// Pending milestones at or below the new value complete on `today`.
    /// Reaching the target completes the goal; neither milestones nor
    /// completion revert when progress is later lowered.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::InvalidProgress` for negative or non-finite values;
    /// the goal is left untouched.
    pub fn record_progress(
        &mut self,
        new_current: f64,
        today: NaiveDate,
    ) -> Result<ProgressUpdate, GoalError> {
        check_progress(new_current)?;

        let previous = self.current;
        self.current = new_current;

        let mut milestones_reached = 0;
        for milestone in &mut self.milestones {
            if !milestone.completed && milestone.threshold <= new_current {
                milestone.completed = true;
                milestone.completed_on = Some(today);
                milestones_reached += 1;
            }
        }

        let goal_completed = new_current >= self.target && !self.is_completed();
        if goal_completed {
            self.status = GoalStatus::Completed;
        }

        Ok(ProgressUpdate {
            previous,
            current: new_current,
            milestones_reached,
            goal_completed,
        })
    }
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// Serialized shape of a goal, as supplied by seed data or a caller's store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRecord {
    pub id: GoalId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: GoalKind,
    pub target: f64,
    #[serde(default)]
    pub current: f64,
    pub unit: String,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub priority: GoalPriority,
    #[serde(default)]
    pub status: GoalStatus,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub xp_reward: u32,
}

impl TryFrom<GoalRecord> for Goal {
    type Error = GoalError;

    fn try_from(record: GoalRecord) -> Result<Self, Self::Error> {
        Goal::from_record(record)
    }
}

impl From<Goal> for GoalRecord {
    fn from(goal: Goal) -> Self {
        Self {
            id: goal.id,
            title: goal.title,
            description: goal.description,
            kind: goal.kind,
            target: goal.target,
            current: goal.current,
            unit: goal.unit,
            deadline: goal.deadline,
            priority: goal.priority,
            status: goal.status,
            milestones: goal.milestones,
            xp_reward: goal.xp_reward,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn chapters_draft() -> GoalDraft {
        GoalDraft::new(
            "Complete Linear Algebra Course",
            GoalKind::TopicCompletion,
            12.0,
            "chapters",
            date(2024, 2, 15),
        )
        .with_milestones([3.0, 6.0, 9.0, 12.0])
        .with_xp_reward(500)
    }

    fn chapters_goal() -> Goal {
        chapters_draft().validate().unwrap().assign_id(GoalId::new(1))
    }

    #[test]
    fn draft_validates_into_fresh_goal() {
        let goal = chapters_goal();
        assert_eq!(goal.current(), 0.0);
        assert_eq!(goal.status(), GoalStatus::Active);
        assert_eq!(goal.milestones().len(), 4);
        assert!(goal.milestones().iter().all(|m| !m.completed));
    }

    #[test]
    fn draft_rejects_bad_shapes() {
        let bad_target = GoalDraft { target: 0.0, ..chapters_draft() }.validate();
        assert!(matches!(bad_target, Err(GoalError::InvalidTarget { .. })));

        let bad_unit = GoalDraft { unit: "  ".into(), ..chapters_draft() }.validate();
        assert_eq!(bad_unit.unwrap_err(), GoalError::EmptyUnit);

        let bad_title = GoalDraft { title: String::new(), ..chapters_draft() }.validate();
        assert_eq!(bad_title.unwrap_err(), GoalError::EmptyTitle);

        let above = chapters_draft().with_milestones([3.0, 13.0]).validate();
        assert!(matches!(above, Err(GoalError::MilestoneExceedsTarget { .. })));

        let unordered = chapters_draft().with_milestones([6.0, 3.0]).validate();
        assert!(matches!(unordered, Err(GoalError::MilestonesNotAscending { .. })));

        let repeated = chapters_draft().with_milestones([3.0, 3.0]).validate();
        assert!(matches!(repeated, Err(GoalError::MilestonesNotAscending { .. })));
    }

    #[test]
    fn even_milestones_floor_intermediate_points() {
        let draft = GoalDraft::new("Read", GoalKind::Reading, 450.0, "pages", date(2024, 1, 15))
            .with_even_milestones(4);
        assert_eq!(draft.milestones, vec![112.0, 225.0, 337.0, 450.0]);
        assert!(draft.validate().is_ok());

        let tiny = GoalDraft::new("Tiny", GoalKind::Habit, 2.0, "days", date(2024, 1, 15))
            .with_even_milestones(4);
        assert_eq!(tiny.milestones, vec![1.0, 2.0]);

        let none = chapters_draft().with_even_milestones(0);
        assert!(none.milestones.is_empty());
    }

    #[test]
    fn progress_completes_milestones_on_date() {
        let mut goal = chapters_goal();
        let update = goal.record_progress(7.0, date(2024, 1, 12)).unwrap();

        assert_eq!(update.milestones_reached, 2);
        assert!(!update.goal_completed);
        assert!(goal.milestones()[0].completed);
        assert_eq!(goal.milestones()[1].completed_on, Some(date(2024, 1, 12)));
        assert!(!goal.milestones()[2].completed);
    }

    #[test]
    fn milestones_stay_completed_after_correction() {
        let mut goal = chapters_goal();
        goal.record_progress(9.0, date(2024, 1, 12)).unwrap();
        goal.record_progress(2.0, date(2024, 1, 13)).unwrap();

        let completed: Vec<bool> = goal.milestones().iter().map(|m| m.completed).collect();
        assert_eq!(completed, vec![true, true, true, false]);
        assert_eq!(goal.milestones()[2].completed_on, Some(date(2024, 1, 12)));
    }

    #[test]
    fn reaching_target_completes_goal_and_final_milestone() {
        let mut goal = chapters_goal();
        let update = goal.record_progress(12.0, date(2024, 2, 1)).unwrap();
        assert!(update.goal_completed);
        assert!(goal.milestones().iter().all(|m| m.completed));
        assert_eq!(goal.status(), GoalStatus::Completed);

        let again = goal.record_progress(14.0, date(2024, 2, 2)).unwrap();
        assert!(!again.goal_completed);
        assert_eq!(goal.progress_percent(), 100.0);
    }

    #[test]
    fn negative_progress_is_rejected_without_change() {
        let mut goal = chapters_goal();
        goal.record_progress(4.0, date(2024, 1, 5)).unwrap();
        let before = goal.clone();

        let err = goal.record_progress(-1.0, date(2024, 1, 6)).unwrap_err();
        assert!(matches!(err, GoalError::InvalidProgress { .. }));
        assert!(goal.record_progress(f64::NAN, date(2024, 1, 6)).is_err());
        assert_eq!(goal, before);
    }

    #[test]
    fn progress_percent_clamps() {
        let mut goal = chapters_goal();
        goal.record_progress(3.0, date(2024, 1, 5)).unwrap();
        assert_eq!(goal.progress_percent(), 25.0);
        goal.record_progress(11.9999, date(2024, 1, 5)).unwrap();
        assert!(goal.progress_percent() < 100.0);
    }

    #[test]
    fn overdue_is_read_lazily_from_deadline() {
        let mut goal = chapters_goal();
        assert_eq!(goal.status_on(date(2024, 2, 15)), GoalStatus::Active);
        assert_eq!(goal.status_on(date(2024, 2, 16)), GoalStatus::Overdue);
        assert_eq!(goal.status(), GoalStatus::Active);

        goal.record_progress(12.0, date(2024, 2, 20)).unwrap();
        assert_eq!(goal.status_on(date(2024, 2, 20)), GoalStatus::Completed);
    }

    #[test]
    fn deadline_countdown() {
        let goal = chapters_goal();
        assert_eq!(goal.deadline_status(date(2024, 2, 16)), DeadlineStatus::Overdue);
        assert_eq!(goal.deadline_status(date(2024, 2, 15)), DeadlineStatus::DueToday);
        assert_eq!(goal.deadline_status(date(2024, 2, 14)), DeadlineStatus::DueTomorrow);
        let far = goal.deadline_status(date(2024, 2, 5));
        assert_eq!(far, DeadlineStatus::DaysLeft(10));
        assert_eq!(far.to_string(), "10 days left");
    }

    #[test]
    fn record_rehydration_normalizes_state() {
        let json = r#"{
            "id": 3,
            "title": "Read Quantum Physics Textbook",
            "type": "reading",
            "target": 450,
            "current": 450,
            "unit": "pages",
            "deadline": "2024-01-15",
            "status": "active",
            "milestones": [
                { "threshold": 112, "completed": true, "date": "2024-01-05" },
                { "threshold": 450 }
            ],
            "xp_reward": 400
        }"#;
        let goal: Goal = serde_json::from_str(json).unwrap();
        assert_eq!(goal.status(), GoalStatus::Completed);
        assert!(goal.milestones().iter().all(|m| m.completed));
        assert_eq!(goal.milestones()[1].completed_on, None);
    }

    #[test]
    fn stored_overdue_status_is_recomputed_from_deadline() {
        let mut record = GoalRecord::from(chapters_goal());
        record.status = GoalStatus::Overdue;
        let deadline = record.deadline;

        let mut goal = Goal::from_record(record).unwrap();
        assert_eq!(goal.status(), GoalStatus::Active);
        let before = deadline.pred_opt().unwrap();
        assert_eq!(goal.status_on(before), GoalStatus::Active);
        assert_eq!(goal.status_on(deadline.succ_opt().unwrap()), GoalStatus::Overdue);

        goal.record_progress(goal.target() / 2.0, before).unwrap();
        assert_eq!(goal.status_on(before), GoalStatus::Active);
    }

    #[test]
    fn record_rejects_negative_current() {
        let mut record = GoalRecord::from(chapters_goal());
        record.current = -2.0;
        assert!(matches!(
            Goal::from_record(record),
            Err(GoalError::InvalidProgress { .. })
        ));
    }
}
