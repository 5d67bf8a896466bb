use chrono::{DateTime, Utc};
use std::fmt;
use study_core::model::{Exercise, ExerciseId};
use study_core::time::elapsed_whole_seconds;
use tracing::{debug, info, warn};

use super::plan::PracticePlan;
use super::progress::{PracticeResults, SessionProgress};
use crate::error::PracticeError;

/// Confidence recorded when the caller does not supply one.
pub const DEFAULT_CONFIDENCE: u8 = 3;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Where a practice session stands.
///
/// Each exercise goes through `InProgress` (waiting for an answer) and then
/// `AwaitingAdvance` (answer judged, explanation visible) before the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress(usize),
    AwaitingAdvance(usize),
    Complete,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => f.write_str("not started"),
            Self::InProgress(index) => write!(f, "waiting for an answer to exercise {}", index + 1),
            Self::AwaitingAdvance(index) => write!(f, "showing the result of exercise {}", index + 1),
            Self::Complete => f.write_str("complete"),
        }
    }
}

//
// ─── RECORDED ANSWER ───────────────────────────────────────────────────────────
//

/// One submitted answer, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAnswer {
    pub exercise_id: ExerciseId,
    /// Text exactly as submitted.
    pub answer: String,
    pub correct: bool,
    pub elapsed_secs: u64,
    pub confidence: u8,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory practice run over a fixed snapshot of due exercises.
///
/// Timestamps are passed in by the caller so timing stays deterministic;
/// `PracticeLoopService` supplies them from a `Clock`.
pub struct PracticeSession {
    state: SessionState,
    exercises: Vec<Exercise>,
    answers: Vec<RecordedAnswer>,
    started_at: Option<DateTime<Utc>>,
    exercise_started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl Default for PracticeSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PracticeSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SessionState::NotStarted,
            exercises: Vec::new(),
            answers: Vec::new(),
            started_at: None,
            exercise_started_at: None,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    /// Index of the active exercise: 0 before start, `len` once complete.
    #[must_use]
    pub fn current_index(&self) -> usize {
        match self.state {
            SessionState::NotStarted => 0,
            SessionState::InProgress(index) | SessionState::AwaitingAdvance(index) => index,
            SessionState::Complete => self.exercises.len(),
        }
    }

    /// Pick up to `limit` due exercises from `pool` and show the first one.
    ///
    /// Returns how many exercises the session will walk through.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::InvalidState` if the session was already started,
    /// and the validation errors of [`PracticePlan::from_pool`].
    pub fn start(
        &mut self,
        pool: impl IntoIterator<Item = Exercise>,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<usize, PracticeError> {
        if self.state != SessionState::NotStarted {
            return Err(self.reject("start"));
        }
        let plan = PracticePlan::from_pool(pool, limit).inspect_err(|err| {
            warn!(error = %err, "practice session not started");
        })?;

        self.exercises = plan.exercises;
        self.started_at = Some(now);
        self.exercise_started_at = Some(now);
        self.state = SessionState::InProgress(0);
        debug!(
            exercises = self.exercises.len(),
            due_total = plan.due_total,
            "practice session started"
        );
        Ok(self.exercises.len())
    }

    /// # Errors
    ///
    /// Returns `PracticeError::InvalidState` before start and after completion.
    pub fn current_exercise(&self) -> Result<&Exercise, PracticeError> {
        match self.state {
            SessionState::InProgress(index) | SessionState::AwaitingAdvance(index) => {
                Ok(&self.exercises[index])
            }
            state => Err(PracticeError::InvalidState {
                action: "show the current exercise",
                state,
            }),
        }
    }

    /// Judge an answer for the current exercise with the default confidence.
    ///
    /// # Errors
    ///
    /// See [`PracticeSession::submit_answer_with_confidence`].
    pub fn submit_answer(
        &mut self,
        raw: &str,
        now: DateTime<Utc>,
    ) -> Result<&RecordedAnswer, PracticeError> {
        self.submit_answer_with_confidence(raw, DEFAULT_CONFIDENCE, now)
    }

    /// Judge an answer for the current exercise and reveal the result.
    ///
    /// Correct means equal to the canonical answer after trimming and
    /// lowercasing both sides. Elapsed time counts whole seconds since the
    /// exercise was shown.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::InvalidState` unless an answer is expected,
    /// `PracticeError::EmptyAnswer` for blank input and
    /// `PracticeError::InvalidConfidence` outside 1..=5.
    pub fn submit_answer_with_confidence(
        &mut self,
        raw: &str,
        confidence: u8,
        now: DateTime<Utc>,
    ) -> Result<&RecordedAnswer, PracticeError> {
        let SessionState::InProgress(index) = self.state else {
            return Err(self.reject("submit an answer"));
        };
        if raw.trim().is_empty() {
            return Err(PracticeError::EmptyAnswer);
        }
        if !(1..=5).contains(&confidence) {
            return Err(PracticeError::InvalidConfidence(confidence));
        }

        let exercise = &self.exercises[index];
        let shown_at = self.exercise_started_at.unwrap_or(now);
        let recorded = RecordedAnswer {
            exercise_id: exercise.id(),
            answer: raw.to_string(),
            correct: exercise.accepts(raw),
            elapsed_secs: elapsed_whole_seconds(shown_at, now),
            confidence,
        };
        debug!(
            exercise_id = %recorded.exercise_id,
            correct = recorded.correct,
            elapsed_secs = recorded.elapsed_secs,
            "answer recorded"
        );

        let slot = self.answers.len();
        self.answers.push(recorded);
        self.state = SessionState::AwaitingAdvance(index);
        Ok(&self.answers[slot])
    }

    /// Move past the answered exercise.
    ///
    /// Returns the next exercise, or `None` once the session is complete.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::InvalidState` unless an answer was just submitted.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Option<&Exercise>, PracticeError> {
        let SessionState::AwaitingAdvance(index) = self.state else {
            return Err(self.reject("advance"));
        };

        let next = index + 1;
        if next == self.exercises.len() {
            self.state = SessionState::Complete;
            self.completed_at = Some(now);
            self.exercise_started_at = None;
            let results = self.results();
            info!(
                correct = results.correct_count,
                answered = results.total_answered,
                average_secs = results.average_time_seconds,
                "practice session complete"
            );
            return Ok(None);
        }

        self.state = SessionState::InProgress(next);
        self.exercise_started_at = Some(now);
        debug!(index = next, "advanced to next exercise");
        Ok(Some(&self.exercises[next]))
    }

    /// Answers recorded so far and their statistics. Valid in every state.
    #[must_use]
    pub fn results(&self) -> PracticeResults<'_> {
        PracticeResults::from_answers(&self.answers)
    }

    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.exercises.len();
        let position = match self.state {
            SessionState::NotStarted => 0,
            SessionState::InProgress(index) | SessionState::AwaitingAdvance(index) => index + 1,
            SessionState::Complete => total,
        };
        let percent_complete = if total == 0 {
            0.0
        } else {
            position as f64 / total as f64 * 100.0
        };

        SessionProgress {
            total,
            answered: self.answers.len(),
            position,
            percent_complete,
            is_complete: self.is_complete(),
        }
    }

    fn reject(&self, action: &'static str) -> PracticeError {
        warn!(action, state = %self.state, "practice operation rejected");
        PracticeError::InvalidState {
            action,
            state: self.state,
        }
    }
}

impl fmt::Debug for PracticeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticeSession")
            .field("state", &self.state)
            .field("exercises_len", &self.exercises.len())
            .field("answers_len", &self.answers.len())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
