use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::AchievementId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AchievementError {
    #[error("achievement title cannot be empty")]
    EmptyTitle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

/// One-time reward. Once unlocked it never locks again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AchievementRecord", into = "AchievementRecord")]
pub struct Achievement {
    id: AchievementId,
    title: String,
    description: String,
    xp_reward: u32,
    rarity: Rarity,
    unlocked_at: Option<DateTime<Utc>>,
}

impl Achievement {
    /// Create a locked achievement.
    ///
    /// # Errors
    ///
    /// Returns `AchievementError::EmptyTitle` if the title is blank.
    pub fn new(
        id: AchievementId,
        title: impl Into<String>,
        description: impl Into<String>,
        xp_reward: u32,
        rarity: Rarity,
    ) -> Result<Self, AchievementError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(AchievementError::EmptyTitle);
        }
        Ok(Self {
            id,
            title,
            description: description.into().trim().to_string(),
            xp_reward,
            rarity,
            unlocked_at: None,
        })
    }

    /// Builder-style helper for rehydrating an already unlocked achievement.
    #[must_use]
    pub fn unlocked_since(mut self, at: DateTime<Utc>) -> Self {
        self.unlocked_at = Some(at);
        self
    }

    #[must_use]
    pub fn id(&self) -> AchievementId {
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
    pub fn xp_reward(&self) -> u32 {
        self.xp_reward
    }

    #[must_use]
    pub fn rarity(&self) -> Rarity {
        self.rarity
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }

    #[must_use]
    pub fn unlocked_at(&self) -> Option<DateTime<Utc>> {
        self.unlocked_at
    }

    /// Unlock at `now`. Returns `false` if it was already unlocked, in which
    /// case the original unlock time is kept.
    pub fn unlock(&mut self, now: DateTime<Utc>) -> bool {
        if self.unlocked_at.is_some() {
            return false;
        }
        self.unlocked_at = Some(now);
        true
    }
}

/// Serialized shape of an achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementRecord {
    pub id: AchievementId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub xp_reward: u32,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl TryFrom<AchievementRecord> for Achievement {
    type Error = AchievementError;

    fn try_from(record: AchievementRecord) -> Result<Self, Self::Error> {
        let achievement = Achievement::new(
            record.id,
            record.title,
            record.description,
            record.xp_reward,
            record.rarity,
        )?;
        Ok(match record.unlocked_at {
            Some(at) => achievement.unlocked_since(at),
            None => achievement,
        })
    }
}

impl From<Achievement> for AchievementRecord {
    fn from(achievement: Achievement) -> Self {
        Self {
            id: achievement.id,
            title: achievement.title,
            description: achievement.description,
            xp_reward: achievement.xp_reward,
            rarity: achievement.rarity,
            unlocked_at: achievement.unlocked_at,
        }
    }
}
