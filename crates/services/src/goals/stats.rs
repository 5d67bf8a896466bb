use study_core::model::GoalStatus;

/// Aggregate view of the tracker, recomputed on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalStats {
    pub total_goals: usize,
    pub active_count: usize,
    pub completed_count: usize,
    pub overdue_count: usize,
    pub total_xp: u64,
    pub level: u64,
    /// Mean progress percent across all goals, rounded; 0 without goals.
    pub average_progress: u32,
}

/// Which goals a list view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GoalFilter {
    #[default]
    All,
    Active,
    Completed,
    Overdue,
}

impl GoalFilter {
    #[must_use]
    pub fn matches(self, status: GoalStatus) -> bool {
        match self {
            Self::All => true,
            Self::Active => status == GoalStatus::Active,
            Self::Completed => status == GoalStatus::Completed,
            Self::Overdue => status == GoalStatus::Overdue,
        }
    }
}
