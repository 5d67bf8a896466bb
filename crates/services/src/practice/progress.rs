use super::session::RecordedAnswer;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    /// 1-based position of the active exercise; 0 before start, `total` once complete.
    pub position: usize,
    pub percent_complete: f64,
    pub is_complete: bool,
}

/// Answers recorded so far plus derived statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct PracticeResults<'a> {
    pub answers: &'a [RecordedAnswer],
    pub correct_count: usize,
    pub total_answered: usize,
    /// Mean elapsed seconds per answer; 0 when nothing was answered.
    pub average_time_seconds: f64,
}

impl<'a> PracticeResults<'a> {
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn from_answers(answers: &'a [RecordedAnswer]) -> Self {
        let correct_count = answers.iter().filter(|a| a.correct).count();
        let total_answered = answers.len();
        let average_time_seconds = if total_answered == 0 {
            0.0
        } else {
            let total: u64 = answers.iter().map(|a| a.elapsed_secs).sum();
            total as f64 / total_answered as f64
        };

        Self {
            answers,
            correct_count,
            total_answered,
            average_time_seconds,
        }
    }

    /// Share of correct answers in percent, rounded; 0 when nothing was answered.
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        if self.total_answered == 0 {
            return 0;
        }
        let scaled = self.correct_count * 100 + self.total_answered / 2;
        u32::try_from(scaled / self.total_answered).unwrap_or(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::ExerciseId;

    fn answer(id: u64, correct: bool, secs: u64) -> RecordedAnswer {
        RecordedAnswer {
            exercise_id: ExerciseId::new(id),
            answer: "x".into(),
            correct,
            elapsed_secs: secs,
            confidence: 3,
        }
    }

    #[test]
    fn empty_results_are_zeroed() {
        let results = PracticeResults::from_answers(&[]);
        assert_eq!(results.total_answered, 0);
        assert_eq!(results.average_time_seconds, 0.0);
        assert_eq!(results.accuracy_percent(), 0);
    }

    #[test]
    fn results_average_and_accuracy() {
        let answers = [answer(1, true, 10), answer(2, false, 25), answer(3, true, 40)];
        let results = PracticeResults::from_answers(&answers);
        assert_eq!(results.correct_count, 2);
        assert_eq!(results.total_answered, 3);
        assert_eq!(results.average_time_seconds, 25.0);
        assert_eq!(results.accuracy_percent(), 67);
    }
}
