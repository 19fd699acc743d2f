use std::fmt;

use quiz_core::model::ALL_CHAPTERS;

/// What the learner is doing right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum QuizMode {
    #[default]
    Home,
    /// Drill one named chapter.
    ChapterQuiz(String),
    /// Scored run over every question.
    MegaMock,
    /// Scored run over every question, with a countdown.
    TimedMock,
    Bookmarks,
    /// Per-chapter accuracy report.
    Review,
}

impl QuizMode {
    /// Chapter pool this mode draws from, if it asks questions at all.
    #[must_use]
    pub fn pool(&self) -> Option<&str> {
        match self {
            QuizMode::ChapterQuiz(chapter) => Some(chapter),
            QuizMode::MegaMock | QuizMode::TimedMock => Some(ALL_CHAPTERS),
            QuizMode::Home | QuizMode::Bookmarks | QuizMode::Review => None,
        }
    }

    #[must_use]
    pub fn is_mock(&self) -> bool {
        matches!(self, QuizMode::MegaMock | QuizMode::TimedMock)
    }

    #[must_use]
    pub fn is_timed(&self) -> bool {
        matches!(self, QuizMode::TimedMock)
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizMode::Home => write!(f, "Home"),
            QuizMode::ChapterQuiz(chapter) => write!(f, "Chapter Quiz ({chapter})"),
            QuizMode::MegaMock => write!(f, "Mega Mock"),
            QuizMode::TimedMock => write!(f, "Timed Mock"),
            QuizMode::Bookmarks => write!(f, "Bookmarks"),
            QuizMode::Review => write!(f, "Review"),
        }
    }
}
