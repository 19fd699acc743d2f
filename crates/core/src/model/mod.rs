mod bank;
mod ids;
mod question;
mod settings;
mod stats;

pub use bank::{ALL_CHAPTERS, DEFAULT_CHAPTER, QuestionBank};
pub use ids::{IdSequence, ParseIdError, QuestionId};
pub use question::{
    AnswerKey, AnswerResolution, OPTION_COUNT, OPTION_LETTERS, Question, QuestionDraft,
    QuestionError, ValidatedQuestion, collapse_whitespace, letter_index,
};
pub use settings::{DeliveryPolicy, QuizSettings, SettingsError};
pub use stats::{ChapterStats, StatsBook};
