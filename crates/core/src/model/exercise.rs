use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::ExerciseId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExerciseError {
    #[error("exercise title cannot be empty")]
    EmptyTitle,

    #[error("exercise question cannot be empty")]
    EmptyQuestion,

    #[error("exercise answer cannot be empty")]
    EmptyAnswer,

    #[error("difficulty must be between 1 and 5, got {0}")]
    InvalidDifficulty(u8),

    #[error("success rate must be between 0 and 100, got {0}")]
    InvalidSuccessRate(u8),
}

//
// ─── KIND & DIFFICULTY ────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseKind {
    MultipleChoice,
    ShortAnswer,
    Calculation,
    Proof,
}

/// Difficulty rating from 1 (easiest) to 5 (hardest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    /// # Errors
    ///
    /// Returns `ExerciseError::InvalidDifficulty` outside 1..=5.
    pub fn new(value: u8) -> Result<Self, ExerciseError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ExerciseError::InvalidDifficulty(value))
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn band(self) -> DifficultyBand {
        match self.0 {
            0..=2 => DifficultyBand::Easy,
            3 => DifficultyBand::Medium,
            _ => DifficultyBand::Hard,
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = ExerciseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.0
    }
}

/// Coarse label shown next to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DifficultyBand {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for DifficultyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        })
    }
}

//
// ─── EXERCISE ──────────────────────────────────────────────────────────────────
//

/// A practice question. Immutable while a session runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ExerciseRecord", into = "ExerciseRecord")]
pub struct Exercise {
    id: ExerciseId,
    title: String,
    question: String,
    answer: String,
    explanation: String,
    topic: String,
    kind: ExerciseKind,
    difficulty: Difficulty,
    estimated_minutes: u32,
    success_rate: u8,
    is_due: bool,
}

impl Exercise {
    /// Create an exercise with no explanation, due now.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError` when title, question or answer is blank.
    pub fn new(
        id: ExerciseId,
        title: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
        kind: ExerciseKind,
        difficulty: Difficulty,
    ) -> Result<Self, ExerciseError> {
        let title = title.into();
        let question = question.into();
        let answer = answer.into();
        if title.trim().is_empty() {
            return Err(ExerciseError::EmptyTitle);
        }
        if question.trim().is_empty() {
            return Err(ExerciseError::EmptyQuestion);
        }
        if answer.trim().is_empty() {
            return Err(ExerciseError::EmptyAnswer);
        }

        Ok(Self {
            id,
            title: title.trim().to_string(),
            question,
            answer,
            explanation: String::new(),
            topic: String::new(),
            kind,
            difficulty,
            estimated_minutes: 0,
            success_rate: 0,
            is_due: true,
        })
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into().trim().to_string();
        self
    }

    #[must_use]
    pub fn with_estimated_minutes(mut self, minutes: u32) -> Self {
        self.estimated_minutes = minutes;
        self
    }

    /// # Errors
    ///
    /// Returns `ExerciseError::InvalidSuccessRate` above 100.
    pub fn with_success_rate(mut self, rate: u8) -> Result<Self, ExerciseError> {
        if rate > 100 {
            return Err(ExerciseError::InvalidSuccessRate(rate));
        }
        self.success_rate = rate;
        Ok(self)
    }

    #[must_use]
    pub fn with_due(mut self, is_due: bool) -> Self {
        self.is_due = is_due;
        self
    }

    #[must_use]
    pub fn id(&self) -> ExerciseId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn kind(&self) -> ExerciseKind {
        self.kind
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn estimated_minutes(&self) -> u32 {
        self.estimated_minutes
    }

    /// Historical success rate in percent.
    #[must_use]
    pub fn success_rate(&self) -> u8 {
        self.success_rate
    }

    #[must_use]
    pub fn is_due(&self) -> bool {
        self.is_due
    }

    /// Exact match after trimming and lowercasing both sides.
    #[must_use]
    pub fn accepts(&self, submitted: &str) -> bool {
        normalize_answer(submitted) == normalize_answer(&self.answer)
    }
}

fn normalize_answer(raw: &str) -> String {
    raw.trim().to_lowercase()
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// Serialized shape of an exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub id: ExerciseId,
    pub title: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub topic: String,
    #[serde(rename = "type")]
    pub kind: ExerciseKind,
    pub difficulty: u8,
    #[serde(default)]
    pub estimated_minutes: u32,
    #[serde(default)]
    pub success_rate: u8,
    #[serde(default)]
    pub is_due: bool,
}

impl TryFrom<ExerciseRecord> for Exercise {
    type Error = ExerciseError;

    fn try_from(record: ExerciseRecord) -> Result<Self, Self::Error> {
        let exercise = Exercise::new(
            record.id,
            record.title,
            record.question,
            record.answer,
            record.kind,
            Difficulty::new(record.difficulty)?,
        )?;
        Ok(exercise
            .with_explanation(record.explanation)
            .with_topic(record.topic)
            .with_estimated_minutes(record.estimated_minutes)
            .with_success_rate(record.success_rate)?
            .with_due(record.is_due))
    }
}

impl From<Exercise> for ExerciseRecord {
    fn from(exercise: Exercise) -> Self {
        Self {
            id: exercise.id,
            title: exercise.title,
            question: exercise.question,
            answer: exercise.answer,
            explanation: exercise.explanation,
            topic: exercise.topic,
            kind: exercise.kind,
            difficulty: exercise.difficulty.value(),
            estimated_minutes: exercise.estimated_minutes,
            success_rate: exercise.success_rate,
            is_due: exercise.is_due,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn eigenvalues() -> Exercise {
        Exercise::new(
            ExerciseId::new(1),
            "Matrix Eigenvalues",
            "Find the eigenvalues of A = [3 -2; 1 0]",
            "2, 1",
            ExerciseKind::Calculation,
            Difficulty::new(3).unwrap(),
        )
        .unwrap()
        .with_topic("Linear Algebra")
    }

    #[test]
    fn answers_match_trimmed_and_case_insensitive() {
        let exercise = eigenvalues();
        assert!(exercise.accepts("2, 1"));
        assert!(exercise.accepts("  2, 1 \n"));
        assert!(!exercise.accepts("2,1"));
        assert!(!exercise.accepts("1, 2"));

        let choice = Exercise::new(
            ExerciseId::new(3),
            "Vector Space Properties",
            "Which is NOT required?",
            "C",
            ExerciseKind::MultipleChoice,
            Difficulty::new(2).unwrap(),
        )
        .unwrap();
        assert!(choice.accepts("c"));
    }

    #[test]
    fn unicode_answers_compare_case_insensitively() {
        let exercise = Exercise::new(
            ExerciseId::new(2),
            "Derivative Chain Rule",
            "f(x) = sin(2x³ + 1)",
            "6x²cos(2x³ + 1)",
            ExerciseKind::Calculation,
            Difficulty::new(2).unwrap(),
        )
        .unwrap();
        assert!(exercise.accepts("6X²COS(2X³ + 1)"));
        assert!(!exercise.accepts("wrong"));
    }

    #[test]
    fn difficulty_bounds_and_bands() {
        assert!(matches!(Difficulty::new(0), Err(ExerciseError::InvalidDifficulty(0))));
        assert!(Difficulty::new(6).is_err());
        assert_eq!(Difficulty::new(2).unwrap().band(), DifficultyBand::Easy);
        assert_eq!(Difficulty::new(3).unwrap().band(), DifficultyBand::Medium);
        assert_eq!(Difficulty::new(5).unwrap().band().to_string(), "Hard");
    }

    #[test]
    fn blank_fields_rejected() {
        let err = Exercise::new(
            ExerciseId::new(9),
            "Title",
            "Question",
            "   ",
            ExerciseKind::ShortAnswer,
            Difficulty::new(1).unwrap(),
        )
        .unwrap_err();
        assert_eq!(err, ExerciseError::EmptyAnswer);

        let rate = eigenvalues().with_success_rate(101).unwrap_err();
        assert_eq!(rate, ExerciseError::InvalidSuccessRate(101));
    }

    #[test]
    fn record_rejects_out_of_range_difficulty() {
        let json = r#"{
            "id": 4, "title": "Proof", "question": "Show it", "answer": "qed",
            "type": "proof", "difficulty": 9
        }"#;
        assert!(serde_json::from_str::<Exercise>(json).is_err());
    }
}
