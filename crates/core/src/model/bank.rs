use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::ids::QuestionId;
use crate::model::question::Question;

/// Synthetic chapter key that aggregates every question in parse order.
pub const ALL_CHAPTERS: &str = "All";

/// Chapter label used for questions that appear before any chapter header.
pub const DEFAULT_CHAPTER: &str = "General";

/// Ordered mapping from chapter label to its questions.
///
/// Chapters keep the order in which they first appeared in the source. The
/// aggregate `ALL_CHAPTERS` pool grows with every insert and is not listed
/// by `chapters()`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionBank {
    chapters: Vec<(String, Vec<Question>)>,
    all: Vec<Question>,
    #[serde(skip)]
    index: HashMap<QuestionId, usize>,
}

impl QuestionBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a question to its chapter, creating the chapter if needed.
    pub fn push(&mut self, question: Question) {
        let chapter = question.chapter().to_owned();
        match self.chapters.iter_mut().find(|(name, _)| name.as_str() == chapter.as_str()) {
            Some((_, questions)) => questions.push(question.clone()),
            None => self.chapters.push((chapter, vec![question.clone()])),
        }
        self.index.insert(question.id(), self.all.len());
        self.all.push(question);
    }

    /// Named chapters in first-appearance order (aggregate excluded).
    pub fn chapters(&self) -> impl Iterator<Item = &str> {
        self.chapters.iter().map(|(name, _)| name.as_str())
    }

    /// Questions for a chapter key; `ALL_CHAPTERS` yields the aggregate pool.
    #[must_use]
    pub fn questions(&self, chapter: &str) -> Option<&[Question]> {
        if chapter == ALL_CHAPTERS {
            return Some(&self.all);
        }
        self.chapters
            .iter()
            .find(|(name, _)| name.as_str() == chapter)
            .map(|(_, questions)| questions.as_slice())
    }

    #[must_use]
    pub fn has_chapter(&self, chapter: &str) -> bool {
        self.questions(chapter).is_some()
    }

    /// All questions in parse order.
    #[must_use]
    pub fn all(&self) -> &[Question] {
        &self.all
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        match self.index.get(&id) {
            Some(&i) => self.all.get(i),
            None => self.all.iter().find(|q| q.id() == id),
        }
    }

    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    #[must_use]
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }
}

// The id index is derived data; `get` falls back to a scan when it is empty.
impl PartialEq for QuestionBank {
    fn eq(&self, other: &Self) -> bool {
        self.chapters == other.chapters && self.all == other.all
    }
}

impl Eq for QuestionBank {}

impl FromIterator<Question> for QuestionBank {
    fn from_iter<I: IntoIterator<Item = Question>>(iter: I) -> Self {
        let mut bank = QuestionBank::new();
        for question in iter {
            bank.push(question);
        }
        bank
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerKey, QuestionDraft};

    fn question(id: u64, chapter: &str, text: &str) -> Question {
        QuestionDraft {
            chapter: chapter.into(),
            text: text.into(),
            options: vec!["a".into(), "b".into()],
            answer: AnswerKey::Letter('A'),
            explanation: String::new(),
        }
        .validate(500)
        .unwrap()
        .assign_id(QuestionId::new(id))
    }

    #[test]
    fn chapters_keep_first_appearance_order() {
        let bank: QuestionBank = vec![
            question(1, "Chapter 2", "x"),
            question(2, "Chapter 1", "y"),
            question(3, "Chapter 2", "z"),
        ]
        .into_iter()
        .collect();

        let chapters: Vec<_> = bank.chapters().collect();
        assert_eq!(chapters, vec!["Chapter 2", "Chapter 1"]);
        assert_eq!(bank.questions("Chapter 2").unwrap().len(), 2);
        assert_eq!(bank.chapter_count(), 2);
    }

    #[test]
    fn aggregate_holds_everything_in_parse_order() {
        let bank: QuestionBank = vec![
            question(1, "Chapter 1", "x"),
            question(2, "Chapter 2", "y"),
        ]
        .into_iter()
        .collect();

        let all = bank.questions(ALL_CHAPTERS).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id(), QuestionId::new(1));
        assert!(bank.chapters().all(|c| c != ALL_CHAPTERS));
    }

    #[test]
    fn lookup_by_id() {
        let bank: QuestionBank = vec![question(7, "Chapter 1", "x")].into_iter().collect();
        assert!(bank.contains(QuestionId::new(7)));
        assert!(!bank.contains(QuestionId::new(8)));
        assert_eq!(bank.get(QuestionId::new(7)).unwrap().text(), "x?");
    }

    #[test]
    fn empty_bank_has_empty_aggregate() {
        let bank = QuestionBank::new();
        assert!(bank.is_empty());
        assert_eq!(bank.questions(ALL_CHAPTERS).map(<[Question]>::len), Some(0));
        assert!(bank.questions("Chapter 1").is_none());
    }
}
