use std::collections::HashSet;
use std::fmt;

use study_core::Clock;
use study_core::model::{
    Achievement, AchievementId, DeadlineStatus, Experience, Goal, GoalDraft, GoalId, GoalStatus,
    Milestone, ProgressSettings, ProgressUpdate,
};
use tracing::{debug, info, warn};

use super::stats::{GoalFilter, GoalStats};
use crate::error::TrackerError;

//
// ─── TRACKER ───────────────────────────────────────────────────────────────────
//

/// Owns a caller's goals and achievements and answers progress queries.
///
/// Every query is computed from the current collections; nothing is cached.
/// Overdue status is evaluated against the clock at read time.
pub struct GoalTracker {
    clock: Clock,
    settings: ProgressSettings,
    goals: Vec<Goal>,
    achievements: Vec<Achievement>,
    /// `None` once the id space is used up.
    next_goal_id: Option<u64>,
}

impl GoalTracker {
    /// Build a tracker over existing goals and achievements.
    ///
    /// Records repeating an id already seen are dropped, keeping the first.
    #[must_use]
    pub fn new(
        goals: impl IntoIterator<Item = Goal>,
        achievements: impl IntoIterator<Item = Achievement>,
    ) -> Self {
        let mut seen_goals = HashSet::new();
        let goals: Vec<Goal> = goals
            .into_iter()
            .filter(|goal| {
                let fresh = seen_goals.insert(goal.id());
                if !fresh {
                    warn!(goal_id = %goal.id(), "dropping goal with duplicate id");
                }
                fresh
            })
            .collect();

        let mut seen_achievements = HashSet::new();
        let achievements: Vec<Achievement> = achievements
            .into_iter()
            .filter(|achievement| {
                let fresh = seen_achievements.insert(achievement.id());
                if !fresh {
                    warn!(achievement_id = %achievement.id(), "dropping achievement with duplicate id");
                }
                fresh
            })
            .collect();

        let next_goal_id = goals
            .iter()
            .map(|g| g.id().value())
            .max()
            .map_or(Some(1), |max| max.checked_add(1));
        debug!(
            goals = goals.len(),
            achievements = achievements.len(),
            "goal tracker created"
        );

        Self {
            clock: Clock::default_clock(),
            settings: ProgressSettings::default(),
            goals,
            achievements,
            next_goal_id,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ProgressSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    #[must_use]
    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    /// Validate and insert a new goal with no progress.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Goal` if the draft is invalid and
    /// `TrackerError::GoalIdsExhausted` when no id is left; nothing is inserted.
    pub fn add_goal(&mut self, draft: GoalDraft) -> Result<GoalId, TrackerError> {
        let validated = draft.validate().inspect_err(|err| {
            warn!(error = %err, "rejected goal draft");
        })?;
        let Some(next) = self.next_goal_id else {
            warn!("no goal ids left");
            return Err(TrackerError::GoalIdsExhausted);
        };
        let id = GoalId::new(next);
        self.next_goal_id = next.checked_add(1);

        let goal = validated.assign_id(id);
        info!(goal_id = %id, title = goal.title(), target = goal.target(), "goal added");
        self.goals.push(goal);
        Ok(id)
    }

    /// Set a goal's current progress.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::GoalNotFound` for an unknown id and
    /// `TrackerError::Goal` for a negative or non-finite value. Either way the
    /// goal is unchanged.
    pub fn update_progress(
        &mut self,
        goal_id: GoalId,
        new_current: f64,
    ) -> Result<ProgressUpdate, TrackerError> {
        let today = self.clock.today();
        let goal = self
            .goals
            .iter_mut()
            .find(|goal| goal.id() == goal_id)
            .ok_or(TrackerError::GoalNotFound(goal_id))?;

        let update = goal.record_progress(new_current, today).inspect_err(|err| {
            warn!(goal_id = %goal_id, error = %err, "rejected progress update");
        })?;

        debug!(
            goal_id = %goal_id,
            previous = update.previous,
            current = update.current,
            milestones_reached = update.milestones_reached,
            "progress updated"
        );
        if update.goal_completed {
            info!(goal_id = %goal_id, xp_reward = goal.xp_reward(), "goal completed");
        }
        Ok(update)
    }

    /// Unlock an achievement now. Returns `false` if it was already unlocked.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::AchievementNotFound` for an unknown id.
    pub fn unlock_achievement(
        &mut self,
        achievement_id: AchievementId,
    ) -> Result<bool, TrackerError> {
        let now = self.clock.now();
        let achievement = self
            .achievements
            .iter_mut()
            .find(|achievement| achievement.id() == achievement_id)
            .ok_or(TrackerError::AchievementNotFound(achievement_id))?;

        let unlocked = achievement.unlock(now);
        if unlocked {
            info!(
                achievement_id = %achievement_id,
                xp_reward = achievement.xp_reward(),
                "achievement unlocked"
            );
        }
        Ok(unlocked)
    }

    /// Counts, XP and level as of now.
    #[must_use]
    pub fn stats(&self) -> GoalStats {
        let today = self.clock.today();
        let mut stats = GoalStats {
            total_goals: self.goals.len(),
            active_count: 0,
            completed_count: 0,
            overdue_count: 0,
            total_xp: 0,
            level: 0,
            average_progress: average_progress(&self.goals),
        };

        for goal in &self.goals {
            match goal.status_on(today) {
                GoalStatus::Active => stats.active_count += 1,
                GoalStatus::Completed => stats.completed_count += 1,
                GoalStatus::Overdue => stats.overdue_count += 1,
            }
        }

        let experience = self.experience();
        stats.total_xp = experience.total_xp();
        stats.level = experience.level();
        stats
    }

    #[must_use]
    pub fn experience(&self) -> Experience {
        Experience::from_progress(
            &self.goals,
            &self.achievements,
            self.settings.xp_per_level(),
        )
    }

    /// # Errors
    ///
    /// Returns `TrackerError::GoalNotFound` for an unknown id.
    pub fn goal(&self, goal_id: GoalId) -> Result<&Goal, TrackerError> {
        self.goals
            .iter()
            .find(|goal| goal.id() == goal_id)
            .ok_or(TrackerError::GoalNotFound(goal_id))
    }

    /// # Errors
    ///
    /// Returns `TrackerError::GoalNotFound` for an unknown id.
    pub fn progress_percent(&self, goal_id: GoalId) -> Result<f64, TrackerError> {
        self.goal(goal_id).map(Goal::progress_percent)
    }

    /// # Errors
    ///
    /// Returns `TrackerError::GoalNotFound` for an unknown id.
    pub fn milestone_states(&self, goal_id: GoalId) -> Result<&[Milestone], TrackerError> {
        self.goal(goal_id).map(Goal::milestones)
    }

    /// Overdue-aware status of a single goal.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::GoalNotFound` for an unknown id.
    pub fn status(&self, goal_id: GoalId) -> Result<GoalStatus, TrackerError> {
        let today = self.clock.today();
        self.goal(goal_id).map(|goal| goal.status_on(today))
    }

    /// # Errors
    ///
    /// Returns `TrackerError::GoalNotFound` for an unknown id.
    pub fn deadline_status(&self, goal_id: GoalId) -> Result<DeadlineStatus, TrackerError> {
        let today = self.clock.today();
        self.goal(goal_id).map(|goal| goal.deadline_status(today))
    }

    /// Goals matching `filter`, in insertion order.
    #[must_use]
    pub fn filtered_goals(&self, filter: GoalFilter) -> Vec<&Goal> {
        let today = self.clock.today();
        self.goals
            .iter()
            .filter(|goal| filter.matches(goal.status_on(today)))
            .collect()
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn average_progress(goals: &[Goal]) -> u32 {
    if goals.is_empty() {
        return 0;
    }
    let sum: f64 = goals.iter().map(Goal::progress_percent).sum();
    (sum / goals.len() as f64).round() as u32
}

impl fmt::Debug for GoalTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoalTracker")
            .field("clock", &self.clock)
            .field("goals_len", &self.goals.len())
            .field("achievements_len", &self.achievements.len())
            .field("next_goal_id", &self.next_goal_id)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
