mod plan;
mod progress;
mod session;
mod workflow;

// Public API of the practice subsystem.
pub use crate::error::PracticeError;
pub use plan::{PracticePlan, TopicDue, due_by_topic};
pub use progress::{PracticeResults, SessionProgress};
pub use session::{DEFAULT_CONFIDENCE, PracticeSession, RecordedAnswer, SessionState};
pub use workflow::{PracticeAnswerResult, PracticeLoopService};
