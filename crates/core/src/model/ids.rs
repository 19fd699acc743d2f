use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier for a parsed question.
///
/// Assigned sequentially in parse order, so re-parsing the same input yields
/// the same ids. Two questions with identical text in different chapters
/// still get distinct ids.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(u64);

impl QuestionId {
    /// Creates a new `QuestionId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    raw: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse QuestionId from {:?}", self.raw)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for QuestionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .trim_start_matches('#')
            .parse::<u64>()
            .map(QuestionId::new)
            .map_err(|_| ParseIdError { raw: s.to_string() })
    }
}

/// Hands out consecutive ids starting at 1.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> QuestionId {
        let id = QuestionId::new(self.next);
        self.next += 1;
        id
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_id_display() {
        let id = QuestionId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(format!("{id:?}"), "QuestionId(42)");
    }

    #[test]
    fn test_question_id_from_str_accepts_hash_prefix() {
        let id: QuestionId = "#17".parse().unwrap();
        assert_eq!(id, QuestionId::new(17));
        let id: QuestionId = " 8 ".parse().unwrap();
        assert_eq!(id, QuestionId::new(8));
    }

    #[test]
    fn test_question_id_from_str_invalid() {
        let result = "not-a-number".parse::<QuestionId>();
        assert!(result.is_err());
    }

    #[test]
    fn sequence_starts_at_one_and_increments() {
        let mut seq = IdSequence::new();
        assert_eq!(seq.next_id(), QuestionId::new(1));
        assert_eq!(seq.next_id(), QuestionId::new(2));
        assert_eq!(seq.next_id(), QuestionId::new(3));
    }
}
