use std::io::{self, BufRead, Write};

use services::{PracticeError, PracticeLoopService};
use study_core::model::Exercise;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PracticeRunError {
    #[error(transparent)]
    Practice(#[from] PracticeError),

    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

/// What the terminal run ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PracticeOutcome {
    pub correct: usize,
    pub answered: usize,
    pub finished: bool,
}

fn read_answer(input: &mut impl BufRead, out: &mut impl Write) -> io::Result<Option<String>> {
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let answer = line.trim_end_matches(['\r', '\n']);
        if answer.trim().is_empty() {
            writeln!(out, "Please enter an answer.")?;
            continue;
        }
        return Ok(Some(answer.to_string()));
    }
}

/// Run one practice session, reading answers line by line from `input`.
///
/// End of input stops the run early; results so far are still reported.
pub fn run_practice(
    service: &PracticeLoopService,
    pool: Vec<Exercise>,
    limit: Option<usize>,
    mut input: impl BufRead,
    mut out: impl Write,
) -> Result<PracticeOutcome, PracticeRunError> {
    let mut session = match limit {
        Some(limit) => service.start_with_limit(pool, limit)?,
        None => service.start(pool)?,
    };
    let total = session.exercises().len();

    let mut finished = false;
    while !finished {
        {
            let exercise = session.current_exercise()?;
            writeln!(out)?;
            write!(out, "Question {}/{total}", session.current_index() + 1)?;
            if !exercise.topic().is_empty() {
                write!(out, " · {}", exercise.topic())?;
            }
            writeln!(out, " · {}", exercise.difficulty().band())?;
            writeln!(out, "{}", exercise.title())?;
            writeln!(out, "{}", exercise.question())?;
        }

        let Some(answer) = read_answer(&mut input, &mut out)? else {
            debug!(answered = session.results().total_answered, "input closed mid-session");
            writeln!(out)?;
            writeln!(out, "Session ended early.")?;
            break;
        };

        let result = service.submit(&mut session, &answer)?;
        if result.answer.correct {
            writeln!(out, "Correct!")?;
        } else {
            writeln!(out, "Incorrect. Answer: {}", result.canonical_answer)?;
        }
        if !result.explanation.is_empty() {
            writeln!(out, "{}", result.explanation)?;
        }

        finished = service.advance(&mut session)?;
    }

    let results = session.results();
    writeln!(out)?;
    writeln!(
        out,
        "Score: {}/{} ({}%), average {:.0}s per question",
        results.correct_count,
        results.total_answered,
        results.accuracy_percent(),
        results.average_time_seconds
    )?;

    Ok(PracticeOutcome {
        correct: results.correct_count,
        answered: results.total_answered,
        finished,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StudyData;
    use services::ErrorKind;
    use std::io::Cursor;
    use study_core::model::ProgressSettings;
    use study_core::time::fixed_clock;

    fn service() -> PracticeLoopService {
        PracticeLoopService::new(fixed_clock(), ProgressSettings::default())
    }

    fn sample_pool() -> Vec<Exercise> {
        StudyData::sample().unwrap().exercises
    }

    #[test]
    fn scripted_session_scores_answers() {
        let input = Cursor::new(" 2, 1 \n\nwrong\n");
        let mut out = Vec::new();

        let outcome = run_practice(&service(), sample_pool(), None, input, &mut out).unwrap();
        assert_eq!(
            outcome,
            PracticeOutcome {
                correct: 1,
                answered: 2,
                finished: true
            }
        );

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Question 1/2 · Linear Algebra · Medium"));
        assert!(text.contains("Please enter an answer."));
        assert!(text.contains("Incorrect. Answer: 6x²cos(2x³ + 1)"));
        assert!(text.contains("Score: 1/2 (50%)"));
    }

    #[test]
    fn closed_input_ends_early() {
        let mut out = Vec::new();
        let outcome =
            run_practice(&service(), sample_pool(), Some(5), Cursor::new("C\n"), &mut out).unwrap();
        assert_eq!(outcome.answered, 1);
        assert!(!outcome.finished);
    }

    #[test]
    fn empty_pool_is_reported() {
        let err = run_practice(&service(), Vec::new(), None, Cursor::new(""), Vec::new())
            .unwrap_err();
        match err {
            PracticeRunError::Practice(err) => assert_eq!(err.kind(), ErrorKind::Validation),
            PracticeRunError::Io(err) => panic!("unexpected i/o error: {err}"),
        }
    }
}
