use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use quiz_core::Clock;
use quiz_core::model::{Question, QuestionBank, QuestionId, QuizSettings, StatsBook};
use quiz_core::scheduler::Scheduler;

use super::feedback::{ENCOURAGEMENT_LINES, MOTIVATION_LINES};
use super::mode::QuizMode;
use super::progress::{ChapterReport, MockStatus, SessionProgress};
use crate::error::SessionError;

//
// ─── ANSWER OUTCOME ────────────────────────────────────────────────────────────
//

/// What happened when an answer was submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub question_id: QuestionId,
    pub correct: bool,
    pub correct_answer: String,
    /// Explanation to show after a miss, if the source had one.
    pub explanation: Option<String>,
    /// Ticks until a missed question comes back.
    pub retry_in: Option<u32>,
    pub feedback: &'static str,
    /// Mock state after this answer, when it counted towards a mock.
    pub mock: Option<MockStatus>,
}

//
// ─── MOCK STATE ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq)]
struct MockState {
    timed: bool,
    remaining: u32,
    countdown: Option<u32>,
    /// Set by the first request after the countdown reached zero.
    time_up: bool,
    score: f64,
    attempts: u32,
}

impl MockState {
    fn start(settings: &QuizSettings, timed: bool) -> Self {
        Self {
            timed,
            remaining: settings.mock_budget(),
            countdown: timed.then(|| settings.mock_countdown_ticks()),
            time_up: false,
            score: 0.0,
            attempts: 0,
        }
    }

    fn is_finished(&self) -> bool {
        self.remaining == 0 || self.time_up
    }

    fn status(&self) -> MockStatus {
        MockStatus {
            timed: self.timed,
            remaining: self.remaining,
            countdown: self.countdown,
            score: self.score,
            attempts: self.attempts,
            finished: self.is_finished(),
        }
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One learner's study session over a loaded bank.
///
/// Owns everything that changes while studying: the mode, the scheduler with
/// its retry queue and cursors, per-chapter stats, bookmarks and the running
/// mock exam, if any.
pub struct QuizSession {
    settings: QuizSettings,
    clock: Clock,
    mode: QuizMode,
    bank: QuestionBank,
    scheduler: Scheduler,
    stats: StatsBook,
    bookmarks: HashSet<QuestionId>,
    negative_marking: bool,
    mock: Option<MockState>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    #[must_use]
    pub fn new(bank: QuestionBank, settings: QuizSettings) -> Self {
        Self::with_clock(bank, settings, Clock::default())
    }

    #[must_use]
    pub fn with_clock(bank: QuestionBank, settings: QuizSettings, clock: Clock) -> Self {
        Self {
            scheduler: Scheduler::new(&settings),
            settings,
            started_at: clock.now(),
            clock,
            mode: QuizMode::Home,
            bank,
            stats: StatsBook::new(),
            bookmarks: HashSet::new(),
            negative_marking: false,
            mock: None,
            completed_at: None,
        }
    }

    /// Replace the bank.
    ///
    /// Pending retries, cursors, bookmarks and any mock refer to the old bank
    /// and are dropped; chapter stats are kept. Returns to `Home` if the
    /// current chapter no longer exists.
    pub fn load_bank(&mut self, bank: QuestionBank) {
        self.bank = bank;
        self.scheduler.reset();
        self.bookmarks.clear();
        self.mock = None;
        self.completed_at = None;
        if let QuizMode::ChapterQuiz(chapter) = &self.mode {
            if !self.bank.has_chapter(chapter) {
                self.mode = QuizMode::Home;
            }
        }
        info!(questions = self.bank.len(), chapters = self.bank.chapter_count(), "bank loaded");
    }

    /// Switch mode. Entering a mock mode starts a fresh mock unless one of the
    /// same kind is still running.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownChapter` for a chapter quiz on a chapter
    /// the bank does not have.
    pub fn set_mode(&mut self, mode: QuizMode) -> Result<(), SessionError> {
        if let QuizMode::ChapterQuiz(chapter) = &mode {
            if !self.bank.has_chapter(chapter) {
                return Err(SessionError::UnknownChapter(chapter.clone()));
            }
        }
        if mode.is_mock() {
            let running = self
                .mock
                .is_some_and(|m| m.timed == mode.is_timed() && !m.is_finished());
            if !running {
                self.start_mock(mode.is_timed());
            }
        }
        debug!(%mode, "mode changed");
        self.mode = mode;
        Ok(())
    }

    /// Start a new mock exam with a full budget and score 0.
    pub fn start_mock(&mut self, timed: bool) {
        self.mock = Some(MockState::start(&self.settings, timed));
        self.completed_at = None;
        info!(timed, budget = self.settings.mock_budget(), "mock started");
    }

    /// Next question for the current mode, or `None` when the mode asks no
    /// questions, the pool is empty or the mock is over.
    ///
    /// In a timed mock every delivered question spends one countdown tick;
    /// the question that spends the last tick can still be answered.
    pub fn next_question(&mut self) -> Option<Question> {
        let chapter = self.mode.pool()?.to_owned();

        if self.mode.is_mock() {
            let mock = self.mock.as_mut()?;
            if mock.is_finished() {
                return None;
            }
            if let Some(ticks) = mock.countdown.as_mut() {
                if *ticks == 0 {
                    mock.time_up = true;
                    self.completed_at = Some(self.clock.now());
                    info!(score = mock.score, attempts = mock.attempts, "mock time is up");
                    return None;
                }
                *ticks -= 1;
            }
        }

        self.scheduler.next(&self.bank, &chapter)
    }

    /// Record an answer to `question`.
    ///
    /// A miss goes back into the retry queue; in a running mock the answer
    /// also moves the score and spends one question from the budget.
    ///
    /// # Errors
    ///
    /// - `NoSelection` if `chosen` is missing or blank
    /// - `UnknownQuestion` if `question` is not from the loaded bank
    /// - `MockFinished` if the current mock has no budget or time left
    ///
    /// Nothing is recorded when an error is returned.
    pub fn submit_answer(
        &mut self,
        question: &Question,
        chosen: Option<&str>,
    ) -> Result<AnswerOutcome, SessionError> {
        let chosen = chosen
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(SessionError::NoSelection)?;
        if self.bank.get(question.id()) != Some(question) {
            return Err(SessionError::UnknownQuestion(question.id()));
        }
        let scoring = self.mode.is_mock();
        if scoring && self.mock.is_none_or(|m| m.is_finished()) {
            return Err(SessionError::MockFinished);
        }

        let correct = question.is_correct(chosen);
        self.stats.record(question.chapter(), correct);

        let mock = if scoring {
            self.score_mock(correct)
        } else {
            None
        };

        let retry_in = (!correct).then(|| self.scheduler.requeue(question.clone()));
        let lines: &[&'static str] = if correct {
            &MOTIVATION_LINES
        } else {
            &ENCOURAGEMENT_LINES
        };
        let feedback = self.scheduler.pick(lines).copied().unwrap_or_default();

        debug!(id = %question.id(), correct, ?retry_in, "answer recorded");
        Ok(AnswerOutcome {
            question_id: question.id(),
            correct,
            correct_answer: question.answer().to_owned(),
            explanation: (!correct && !question.explanation().is_empty())
                .then(|| question.explanation().to_owned()),
            retry_in,
            feedback,
            mock,
        })
    }

    fn score_mock(&mut self, correct: bool) -> Option<MockStatus> {
        let penalty = self.settings.negative_penalty();
        let negative = self.negative_marking;
        let mock = self.mock.as_mut()?;

        mock.attempts += 1;
        mock.remaining -= 1;
        if correct {
            mock.score += 1.0;
        } else if negative {
            mock.score -= penalty;
        }

        if mock.is_finished() {
            self.completed_at = Some(self.clock.now());
            info!(score = mock.score, attempts = mock.attempts, "mock finished");
        }
        Some(mock.status())
    }

    /// Flip the bookmark on a question; returns whether it is now bookmarked.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownQuestion` if the id is not in the bank.
    pub fn toggle_bookmark(&mut self, id: QuestionId) -> Result<bool, SessionError> {
        if !self.bank.contains(id) {
            return Err(SessionError::UnknownQuestion(id));
        }
        if self.bookmarks.remove(&id) {
            Ok(false)
        } else {
            self.bookmarks.insert(id);
            Ok(true)
        }
    }

    #[must_use]
    pub fn is_bookmarked(&self, id: QuestionId) -> bool {
        self.bookmarks.contains(&id)
    }

    /// Bookmarked questions in bank order.
    #[must_use]
    pub fn bookmarked_questions(&self) -> Vec<&Question> {
        self.bank
            .all()
            .iter()
            .filter(|q| self.bookmarks.contains(&q.id()))
            .collect()
    }

    /// Accuracy per chapter, in the order chapters were first answered.
    #[must_use]
    pub fn chapter_report(&self) -> Vec<ChapterReport> {
        self.stats
            .iter()
            .map(|(chapter, stats)| ChapterReport {
                chapter: chapter.to_owned(),
                stats: *stats,
                accuracy: stats.accuracy(),
            })
            .collect()
    }

    #[must_use]
    pub fn mock_status(&self) -> Option<MockStatus> {
        self.mock.as_ref().map(MockState::status)
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let totals = self.stats.totals();
        SessionProgress {
            answered: totals.seen(),
            correct: totals.correct(),
            wrong: totals.wrong(),
            pending_retries: self.scheduler.retry_queue().len(),
            bookmarks: self.bookmarks.len(),
        }
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    pub fn set_negative_marking(&mut self, enabled: bool) {
        self.negative_marking = enabled;
    }

    #[must_use]
    pub fn negative_marking(&self) -> bool {
        self.negative_marking
    }

    #[must_use]
    pub fn mode(&self) -> &QuizMode {
        &self.mode
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn stats(&self) -> &StatsBook {
        &self.stats
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the last mock ran out of budget or time.
    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("mode", &self.mode)
            .field("questions", &self.bank.len())
            .field("retry_len", &self.scheduler.retry_queue().len())
            .field("bookmarks", &self.bookmarks.len())
            .field("negative_marking", &self.negative_marking)
            .field("mock", &self.mock)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
