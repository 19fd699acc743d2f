//! Turning loosely formatted study material into a `QuestionBank`.
//!
//! Two front ends share one normalization path:
//! - [`parse_text`] scans extracted PDF text line by line
//! - [`parse_csv`] reads one question per CSV row
//!
//! Both hand `QuestionDraft`s to a `BankBuilder`, which validates them, assigns
//! ids in input order and keeps a `ParseReport` of everything that had to be
//! guessed or dropped. Parsing never fails on bad content; only an unreadable
//! CSV stream is an error.

mod csv_rows;
mod lines;
mod text;

pub use csv_rows::{CSV_COLUMNS, parse_csv};
pub use lines::{Line, chapter_label, classify};
pub use text::parse_text;

use tracing::{debug, warn};

use crate::model::{AnswerResolution, IdSequence, QuestionBank, QuestionDraft, QuizSettings};

/// Parse extracted text with default settings.
///
/// Deterministic: the same input always yields the same bank, ids included.
#[must_use]
pub fn parse(raw_text: &str) -> QuestionBank {
    parse_with_report(raw_text).bank
}

/// Like [`parse`], keeping the counters for display.
#[must_use]
pub fn parse_with_report(raw_text: &str) -> Parsed {
    parse_text(raw_text, &QuizSettings::default())
}

/// Counters describing how much of the input turned into questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub questions: usize,
    pub chapters: usize,
    /// Question fragments without text or options.
    pub dropped_fragments: usize,
    /// Lines that matched nothing while no question was open.
    pub ignored_lines: usize,
    /// CSV rows that could not be read as a question.
    pub skipped_rows: usize,
    /// Options past the fourth that were discarded.
    pub discarded_options: usize,
    pub defaulted_answers: usize,
    pub clamped_answers: usize,
    pub unmatched_answers: usize,
}

impl ParseReport {
    /// Questions whose stored answer is a fallback rather than the source's key.
    #[must_use]
    pub fn guessed_answers(&self) -> usize {
        self.defaulted_answers + self.clamped_answers + self.unmatched_answers
    }
}

/// A parsed bank together with its report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub bank: QuestionBank,
    pub report: ParseReport,
}

pub(crate) struct BankBuilder {
    bank: QuestionBank,
    ids: IdSequence,
    report: ParseReport,
    max_chars: usize,
}

impl BankBuilder {
    pub(crate) fn new(settings: &QuizSettings) -> Self {
        Self {
            bank: QuestionBank::new(),
            ids: IdSequence::new(),
            report: ParseReport::default(),
            max_chars: settings.max_question_chars(),
        }
    }

    /// Validate a draft and add it to the bank; fragments are counted and dropped.
    pub(crate) fn add(&mut self, draft: QuestionDraft) {
        let validated = match draft.validate(self.max_chars) {
            Ok(v) => v,
            Err(err) => {
                debug!(%err, "dropping question fragment");
                self.report.dropped_fragments += 1;
                return;
            }
        };

        self.report.discarded_options += validated.overflow;
        match validated.resolution {
            AnswerResolution::Exact => {}
            AnswerResolution::Defaulted => {
                self.report.defaulted_answers += 1;
                warn!(question = %validated.text, "no answer key; assuming first option");
            }
            AnswerResolution::Clamped { letter } => {
                self.report.clamped_answers += 1;
                warn!(question = %validated.text, %letter, "answer letter past last option; using last option");
            }
            AnswerResolution::Unmatched => {
                self.report.unmatched_answers += 1;
                warn!(question = %validated.text, "answer matches no option; assuming first option");
            }
        }

        let question = validated.assign_id(self.ids.next_id());
        self.bank.push(question);
        self.report.questions += 1;
    }

    pub(crate) fn report_mut(&mut self) -> &mut ParseReport {
        &mut self.report
    }

    pub(crate) fn finish(mut self) -> Parsed {
        self.report.chapters = self.bank.chapter_count();
        Parsed {
            bank: self.bank,
            report: self.report,
        }
    }
}
