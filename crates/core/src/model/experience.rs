use crate::model::{Achievement, Goal};

/// XP needed per level unless configured otherwise.
pub const DEFAULT_XP_PER_LEVEL: u32 = 500;

/// Aggregate XP and level, derived from completed goals and unlocked achievements.
///
/// Always computed from the current collections; nothing is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Experience {
    total_xp: u64,
    xp_per_level: u32,
}

impl Experience {
    /// Sum rewards of completed goals and unlocked achievements.
    ///
    /// `xp_per_level` of zero is treated as one so the level stays defined.
    #[must_use]
    pub fn from_progress<'a>(
        goals: impl IntoIterator<Item = &'a Goal>,
        achievements: impl IntoIterator<Item = &'a Achievement>,
        xp_per_level: u32,
    ) -> Self {
        let goal_xp: u64 = goals
            .into_iter()
            .filter(|goal| goal.is_completed())
            .map(|goal| u64::from(goal.xp_reward()))
            .sum();
        let achievement_xp: u64 = achievements
            .into_iter()
            .filter(|achievement| achievement.is_unlocked())
            .map(|achievement| u64::from(achievement.xp_reward()))
            .sum();

        Self::from_total(goal_xp + achievement_xp, xp_per_level)
    }

    #[must_use]
    pub fn from_total(total_xp: u64, xp_per_level: u32) -> Self {
        Self {
            total_xp,
            xp_per_level: xp_per_level.max(1),
        }
    }

    #[must_use]
    pub fn total_xp(&self) -> u64 {
        self.total_xp
    }

    /// `floor(total_xp / xp_per_level) + 1`
    #[must_use]
    pub fn level(&self) -> u64 {
        self.total_xp / u64::from(self.xp_per_level) + 1
    }

    /// XP earned inside the current level.
    #[must_use]
    pub fn xp_into_level(&self) -> u64 {
        self.total_xp % u64::from(self.xp_per_level)
    }

    #[must_use]
    pub fn xp_to_next_level(&self) -> u64 {
        u64::from(self.xp_per_level) - self.xp_into_level()
    }
}
