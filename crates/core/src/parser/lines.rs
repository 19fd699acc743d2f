//! Line classification for study-material text.
//!
//! Patterns are tried in a fixed order and the first match wins, so a line
//! such as `12. ... Ans: C` is read as an answer-key row before it is ever
//! considered as a question.

use regex::Regex;
use std::sync::LazyLock;

static CHAPTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:chapter|unit|module)\s*(\d+)[.:\-\s]*(.*)$")
        .expect("chapter regex")
});

static KEY_ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:\d+\.|Q\d+)[).]?.*?(?:Ans|Answer|Correct\s*Option)\s*[:\-]\s*([A-D])\b",
    )
    .expect("key row regex")
});

static QUESTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:(?:Question|Q\.?)\s*\d+|Question\b|Q[.:)]|\d+)?[):.\-\s]*(.+?)\?\s*$",
    )
    .expect("question regex")
});

static OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Da-d])[).\-:]+\s*(.+)$").expect("option regex"));

static ANSWER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:Ans|Answer|Correct\s*Option)\s*[:\-]\s*([A-D])\b")
        .expect("answer regex")
});

static EXPLANATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:Explanation|Reason)\s*[:\-]\s*(.+)$").expect("explanation regex")
});

/// What a single trimmed line of input means to the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Chapter { number: &'a str, title: &'a str },
    /// Numbered answer-key row such as `12. Ans: C`.
    KeyRow { letter: char },
    Question { text: &'a str },
    Option { letter: char, text: &'a str },
    Answer { letter: char },
    Explanation { text: &'a str },
    /// Matches nothing; continuation text or noise.
    Other(&'a str),
}

impl Line<'_> {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Line::Chapter { .. } => "chapter",
            Line::KeyRow { .. } => "key_row",
            Line::Question { .. } => "question",
            Line::Option { .. } => "option",
            Line::Answer { .. } => "answer",
            Line::Explanation { .. } => "explanation",
            Line::Other(_) => "other",
        }
    }
}

/// Classify one line against the ordered pattern set.
#[must_use]
pub fn classify(line: &str) -> Line<'_> {
    if let Some(c) = CHAPTER_RE.captures(line) {
        return Line::Chapter {
            number: group(&c, 1),
            title: group(&c, 2).trim(),
        };
    }
    if let Some(c) = KEY_ROW_RE.captures(line) {
        return Line::KeyRow {
            letter: first_upper(group(&c, 1)),
        };
    }
    if let Some(c) = QUESTION_RE.captures(line) {
        return Line::Question {
            text: group(&c, 1).trim(),
        };
    }
    if let Some(c) = OPTION_RE.captures(line) {
        return Line::Option {
            letter: first_upper(group(&c, 1)),
            text: group(&c, 2).trim(),
        };
    }
    if let Some(c) = ANSWER_RE.captures(line) {
        return Line::Answer {
            letter: first_upper(group(&c, 1)),
        };
    }
    if let Some(c) = EXPLANATION_RE.captures(line) {
        return Line::Explanation {
            text: group(&c, 1).trim(),
        };
    }
    Line::Other(line)
}

/// Display label for a chapter header: `Chapter N: Title` or `Chapter N`.
#[must_use]
pub fn chapter_label(number: &str, title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        format!("Chapter {number}")
    } else {
        format!("Chapter {number}: {title}")
    }
}

fn group<'a>(captures: &regex::Captures<'a>, index: usize) -> &'a str {
    captures.get(index).map_or("", |m| m.as_str())
}

fn first_upper(raw: &str) -> char {
    raw.chars().next().map_or('A', |c| c.to_ascii_uppercase())
}
