mod feedback;
mod mode;
mod progress;
mod service;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use feedback::{ENCOURAGEMENT_LINES, MOTIVATION_LINES};
pub use mode::QuizMode;
pub use progress::{ChapterReport, MockStatus, SessionProgress};
pub use service::{AnswerOutcome, QuizSession};
