use study_core::Clock;
use study_core::model::{Exercise, ProgressSettings};

use super::session::{PracticeSession, RecordedAnswer};
use crate::error::PracticeError;

/// Result of answering a single exercise in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeAnswerResult {
    pub answer: RecordedAnswer,
    pub canonical_answer: String,
    pub explanation: String,
    /// True when advancing will complete the session.
    pub is_last: bool,
}

/// Drives practice sessions with clock-supplied timestamps and configured limits.
#[derive(Debug, Clone)]
pub struct PracticeLoopService {
    clock: Clock,
    settings: ProgressSettings,
}

impl PracticeLoopService {
    #[must_use]
    pub fn new(clock: Clock, settings: ProgressSettings) -> Self {
        Self { clock, settings }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &ProgressSettings {
        &self.settings
    }

    /// Start a quick practice run over the configured batch size.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError` when the pool has nothing to practice.
    pub fn start(
        &self,
        pool: impl IntoIterator<Item = Exercise>,
    ) -> Result<PracticeSession, PracticeError> {
        let limit = usize::try_from(self.settings.practice_batch_size()).unwrap_or(usize::MAX);
        self.start_with_limit(pool, limit)
    }

    /// # Errors
    ///
    /// Returns `PracticeError` for an empty pool, a zero limit or nothing due.
    pub fn start_with_limit(
        &self,
        pool: impl IntoIterator<Item = Exercise>,
        limit: usize,
    ) -> Result<PracticeSession, PracticeError> {
        let mut session = PracticeSession::new();
        session.start(pool, limit, self.clock.now())?;
        Ok(session)
    }

    /// Submit an answer with the configured default confidence.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError` when the session is not waiting for an answer
    /// or the answer is blank.
    pub fn submit(
        &self,
        session: &mut PracticeSession,
        raw: &str,
    ) -> Result<PracticeAnswerResult, PracticeError> {
        self.submit_with_confidence(session, raw, self.settings.default_confidence())
    }

    /// # Errors
    ///
    /// Returns `PracticeError` when the session is not waiting for an answer,
    /// the answer is blank or the confidence is outside 1..=5.
    pub fn submit_with_confidence(
        &self,
        session: &mut PracticeSession,
        raw: &str,
        confidence: u8,
    ) -> Result<PracticeAnswerResult, PracticeError> {
        let answer = session
            .submit_answer_with_confidence(raw, confidence, self.clock.now())?
            .clone();
        let exercise = session.current_exercise()?;

        Ok(PracticeAnswerResult {
            answer,
            canonical_answer: exercise.answer().to_string(),
            explanation: exercise.explanation().to_string(),
            is_last: session.current_index() + 1 == session.exercises().len(),
        })
    }

    /// Move on; returns true once the session is complete.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::InvalidState` unless an answer was just submitted.
    pub fn advance(&self, session: &mut PracticeSession) -> Result<bool, PracticeError> {
        let next = session.advance(self.clock.now())?;
        Ok(next.is_none())
    }
}
