#![forbid(unsafe_code)]

pub mod error;
pub mod goals;
pub mod practice;

pub use study_core::Clock;

pub use error::{ErrorKind, PracticeError, TrackerError};
pub use goals::{GoalFilter, GoalStats, GoalTracker};
pub use practice::{
    PracticeAnswerResult, PracticeLoopService, PracticePlan, PracticeResults, PracticeSession,
    RecordedAnswer, SessionProgress, SessionState, TopicDue, due_by_topic,
};
