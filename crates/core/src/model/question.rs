use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Every delivered question carries exactly this many options.
pub const OPTION_COUNT: usize = 4;

/// Display letters for the option slots, in order.
pub const OPTION_LETTERS: [char; OPTION_COUNT] = ['A', 'B', 'C', 'D'];

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text is empty")]
    EmptyText,

    #[error("question has no options")]
    NoOptions,
}

//
// ─── ANSWER KEY ────────────────────────────────────────────────────────────────
//

/// How the source document identified the correct option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerKey {
    /// Option letter such as `B` (case-insensitive).
    Letter(char),
    /// Literal option text, as CSV rows provide it.
    Text(String),
    /// The source gave no answer at all.
    Missing,
}

/// How the stored answer was derived from the `AnswerKey`.
///
/// Anything other than `Exact` means the ground truth is a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerResolution {
    Exact,
    /// Letter pointed past the last option and was pulled back to it.
    Clamped { letter: char },
    /// No answer was given; the first option was assumed.
    Defaulted,
    /// Answer text matched no option; the first option was assumed.
    Unmatched,
}

impl AnswerResolution {
    #[must_use]
    pub fn is_guess(self) -> bool {
        !matches!(self, AnswerResolution::Exact)
    }
}

//
// ─── DRAFT → VALIDATED → QUESTION ──────────────────────────────────────────────
//

/// Raw fields collected by a parser before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub chapter: String,
    pub text: String,
    pub options: Vec<String>,
    pub answer: AnswerKey,
    pub explanation: String,
}

impl QuestionDraft {
    /// Normalize text and options and resolve the answer.
    ///
    /// - text is whitespace-collapsed, cut to `max_chars` and ends with `?`
    /// - only the first four non-empty options count; duplicates are dropped
    ///   and missing slots are padded with placeholders
    /// - the answer always ends up as one of the options
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` or `QuestionError::NoOptions` when
    /// the draft is a fragment rather than a question.
    pub fn validate(self, max_chars: usize) -> Result<ValidatedQuestion, QuestionError> {
        let text = normalize_prompt(&self.text, max_chars).ok_or(QuestionError::EmptyText)?;

        let raw: Vec<String> = self
            .options
            .iter()
            .map(|o| collapse_whitespace(o))
            .filter(|o| !o.is_empty())
            .collect();
        if raw.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        let overflow = raw.len().saturating_sub(OPTION_COUNT);
        let effective = &raw[..raw.len().min(OPTION_COUNT)];

        let (answer_index, resolution) = resolve_answer(&self.answer, effective);
        let answer = effective[answer_index].clone();
        let options = pad_options(effective);

        Ok(ValidatedQuestion {
            chapter: collapse_whitespace(&self.chapter),
            text,
            options,
            answer,
            explanation: collapse_whitespace(&self.explanation),
            resolution,
            overflow,
        })
    }
}

/// A normalized question that has not been given an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuestion {
    pub chapter: String,
    pub text: String,
    pub options: Vec<String>,
    pub answer: String,
    pub explanation: String,
    pub resolution: AnswerResolution,
    /// Options beyond the fourth that were discarded.
    pub overflow: usize,
}

impl ValidatedQuestion {
    #[must_use]
    pub fn assign_id(self, id: QuestionId) -> Question {
        Question {
            id,
            chapter: self.chapter,
            text: self.text,
            options: self.options,
            answer: self.answer,
            explanation: self.explanation,
        }
    }
}

/// Immutable multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    chapter: String,
    text: String,
    options: Vec<String>,
    answer: String,
    explanation: String,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn chapter(&self) -> &str {
        &self.chapter
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Structural identity: chapter plus normalized text.
    #[must_use]
    pub fn key(&self) -> (&str, &str) {
        (&self.chapter, &self.text)
    }

    /// Option text for a display letter (`a`/`A` → first option).
    #[must_use]
    pub fn option_for_letter(&self, letter: char) -> Option<&str> {
        let index = letter_index(letter)?;
        self.options.get(index).map(String::as_str)
    }

    /// Letter shown next to the correct answer.
    #[must_use]
    pub fn answer_letter(&self) -> char {
        self.options
            .iter()
            .position(|o| o == &self.answer)
            .map_or(OPTION_LETTERS[0], |i| OPTION_LETTERS[i])
    }

    /// Compares a chosen option against the answer, ignoring outer whitespace.
    #[must_use]
    pub fn is_correct(&self, chosen: &str) -> bool {
        chosen.trim() == self.answer.trim()
    }
}

//
// ─── NORMALIZATION ─────────────────────────────────────────────────────────────
//

/// Collapse every run of whitespace to a single space and trim the ends.
#[must_use]
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 0-based option index for `A`..`D` in either case.
#[must_use]
pub fn letter_index(letter: char) -> Option<usize> {
    let upper = letter.to_ascii_uppercase();
    OPTION_LETTERS.iter().position(|l| *l == upper)
}

fn normalize_prompt(raw: &str, max_chars: usize) -> Option<String> {
    let collapsed = collapse_whitespace(raw);
    let stem = collapsed.trim_end_matches(|c: char| c == '?' || c.is_whitespace());
    if stem.is_empty() {
        return None;
    }
    let budget = max_chars.saturating_sub(1).max(1);
    let mut text: String = stem.chars().take(budget).collect();
    text.truncate(text.trim_end().len());
    text.push('?');
    Some(text)
}

fn resolve_answer(key: &AnswerKey, options: &[String]) -> (usize, AnswerResolution) {
    let last = options.len() - 1;
    match key {
        AnswerKey::Missing => (0, AnswerResolution::Defaulted),
        AnswerKey::Letter(letter) => resolve_letter(*letter, last),
        AnswerKey::Text(text) => {
            let wanted = collapse_whitespace(text);
            if let Some(i) = options.iter().position(|o| *o == wanted) {
                return (i, AnswerResolution::Exact);
            }
            let mut chars = wanted.chars();
            match (chars.next(), chars.next()) {
                (Some(letter), None) if letter_index(letter).is_some() => {
                    resolve_letter(letter, last)
                }
                _ => (0, AnswerResolution::Unmatched),
            }
        }
    }
}

fn resolve_letter(letter: char, last: usize) -> (usize, AnswerResolution) {
    let upper = letter.to_ascii_uppercase();
    let Some(index) = letter_index(upper) else {
        return (0, AnswerResolution::Defaulted);
    };
    if index > last {
        (last, AnswerResolution::Clamped { letter: upper })
    } else {
        (index, AnswerResolution::Exact)
    }
}

fn pad_options(effective: &[String]) -> Vec<String> {
    let mut options: Vec<String> = Vec::with_capacity(OPTION_COUNT);
    for option in effective {
        if !options.contains(option) {
            options.push(option.clone());
        }
    }
    while options.len() < OPTION_COUNT {
        let mut placeholder = format!("(no option {})", OPTION_LETTERS[options.len()]);
        while options.contains(&placeholder) {
            placeholder.push('*');
        }
        options.push(placeholder);
    }
    options
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(text: &str, options: &[&str], answer: AnswerKey) -> QuestionDraft {
        QuestionDraft {
            chapter: "Chapter 1".into(),
            text: text.into(),
            options: options.iter().map(|o| (*o).to_string()).collect(),
            answer,
            explanation: String::new(),
        }
    }

    #[test]
    fn text_is_collapsed_and_ends_with_question_mark() {
        let v = draft("  What   is\tT+1  ", &["a", "b"], AnswerKey::Missing)
            .validate(500)
            .unwrap();
        assert_eq!(v.text, "What is T+1?");

        let v = draft("Why??", &["a"], AnswerKey::Missing).validate(500).unwrap();
        assert_eq!(v.text, "Why?");
    }

    #[test]
    fn long_text_is_truncated_within_budget() {
        let long = "word ".repeat(100);
        let v = draft(&long, &["a"], AnswerKey::Missing).validate(20).unwrap();
        assert!(v.text.chars().count() <= 20);
        assert!(v.text.ends_with('?'));
        assert!(!v.text.contains(" ?"));
    }

    #[test]
    fn letter_maps_to_option() {
        let v = draft("Q", &["w", "x", "y", "z"], AnswerKey::Letter('c'))
            .validate(500)
            .unwrap();
        assert_eq!(v.answer, "y");
        assert_eq!(v.resolution, AnswerResolution::Exact);
    }

    #[test]
    fn letter_past_last_option_is_clamped() {
        let v = draft("Q", &["w", "x"], AnswerKey::Letter('D'))
            .validate(500)
            .unwrap();
        assert_eq!(v.answer, "x");
        assert_eq!(v.resolution, AnswerResolution::Clamped { letter: 'D' });
        assert_eq!(v.options.len(), OPTION_COUNT);
        assert!(v.options.contains(&v.answer));
    }

    #[test]
    fn missing_answer_defaults_to_first_option() {
        let v = draft("Q", &["w", "x", "y", "z"], AnswerKey::Missing)
            .validate(500)
            .unwrap();
        assert_eq!(v.answer, "w");
        assert!(v.resolution.is_guess());
    }

    #[test]
    fn extra_options_are_trimmed_and_counted() {
        let v = draft("Q", &["a", "b", "c", "d", "e", "f"], AnswerKey::Letter('B'))
            .validate(500)
            .unwrap();
        assert_eq!(v.options, vec!["a", "b", "c", "d"]);
        assert_eq!(v.overflow, 2);
    }

    #[test]
    fn short_option_lists_are_padded_with_distinct_placeholders() {
        let v = draft("Q", &["yes", "yes", "no"], AnswerKey::Text("no".into()))
            .validate(500)
            .unwrap();
        assert_eq!(v.options.len(), OPTION_COUNT);
        assert_eq!(v.options[0], "yes");
        assert_eq!(v.options[1], "no");
        let mut unique = v.options.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), OPTION_COUNT);
        assert_eq!(v.answer, "no");
    }

    #[test]
    fn text_answer_falls_back_to_letter_then_first_option() {
        let v = draft("Q", &["a", "b", "c"], AnswerKey::Text("b".into()))
            .validate(500)
            .unwrap();
        assert_eq!(v.answer, "b");

        let v = draft("Q", &["RBI", "SEBI"], AnswerKey::Text("B".into()))
            .validate(500)
            .unwrap();
        assert_eq!(v.answer, "SEBI");

        let v = draft("Q", &["RBI", "SEBI"], AnswerKey::Text("NSE".into()))
            .validate(500)
            .unwrap();
        assert_eq!(v.answer, "RBI");
        assert_eq!(v.resolution, AnswerResolution::Unmatched);
    }

    #[test]
    fn fragments_are_rejected() {
        assert_eq!(
            draft("   ", &["a"], AnswerKey::Missing).validate(500),
            Err(QuestionError::EmptyText)
        );
        assert_eq!(
            draft("Q", &[" ", ""], AnswerKey::Missing).validate(500),
            Err(QuestionError::NoOptions)
        );
    }

    #[test]
    fn question_helpers_use_display_letters() {
        let q = draft("Q", &["w", "x", "y", "z"], AnswerKey::Letter('B'))
            .validate(500)
            .unwrap()
            .assign_id(QuestionId::new(3));
        assert_eq!(q.id(), QuestionId::new(3));
        assert_eq!(q.option_for_letter('d'), Some("z"));
        assert_eq!(q.option_for_letter('E'), None);
        assert_eq!(q.answer_letter(), 'B');
        assert!(q.is_correct(" x "));
        assert!(!q.is_correct("w"));
        assert_eq!(q.key(), ("Chapter 1", "Q?"));
    }
}
