use quiz_core::model::ChapterStats;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub answered: u32,
    pub correct: u32,
    pub wrong: u32,
    /// Missed questions waiting to come back.
    pub pending_retries: usize,
    pub bookmarks: usize,
}

/// One row of the review report.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterReport {
    pub chapter: String,
    pub stats: ChapterStats,
    pub accuracy: f64,
}

/// Snapshot of a mock exam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockStatus {
    pub timed: bool,
    /// Questions left in the budget.
    pub remaining: u32,
    /// Ticks left on the countdown; `None` for untimed mocks.
    pub countdown: Option<u32>,
    pub score: f64,
    pub attempts: u32,
    pub finished: bool,
}
