use serde::{Deserialize, Serialize};

/// Answer counters for one chapter.
///
/// Counters only grow; `StatsBook::reset` is the single way back to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterStats {
    seen: u32,
    correct: u32,
    wrong: u32,
}

impl ChapterStats {
    pub fn record(&mut self, correct: bool) {
        self.seen = self.seen.saturating_add(1);
        if correct {
            self.correct = self.correct.saturating_add(1);
        } else {
            self.wrong = self.wrong.saturating_add(1);
        }
    }

    #[must_use]
    pub fn seen(&self) -> u32 {
        self.seen
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn wrong(&self) -> u32 {
        self.wrong
    }

    /// Percentage of correct answers; 0 when nothing was seen.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        f64::from(self.correct) / f64::from(self.seen.max(1)) * 100.0
    }
}

/// Per-chapter counters in the order chapters were first answered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsBook {
    chapters: Vec<(String, ChapterStats)>,
}

impl StatsBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, chapter: &str, correct: bool) {
        match self.chapters.iter_mut().find(|(name, _)| name.as_str() == chapter) {
            Some((_, stats)) => stats.record(correct),
            None => {
                let mut stats = ChapterStats::default();
                stats.record(correct);
                self.chapters.push((chapter.to_owned(), stats));
            }
        }
    }

    #[must_use]
    pub fn get(&self, chapter: &str) -> Option<&ChapterStats> {
        self.chapters
            .iter()
            .find(|(name, _)| name.as_str() == chapter)
            .map(|(_, stats)| stats)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChapterStats)> {
        self.chapters.iter().map(|(name, stats)| (name.as_str(), stats))
    }

    /// Counters summed over every chapter.
    #[must_use]
    pub fn totals(&self) -> ChapterStats {
        self.chapters
            .iter()
            .fold(ChapterStats::default(), |acc, (_, s)| ChapterStats {
                seen: acc.seen.saturating_add(s.seen),
                correct: acc.correct.saturating_add(s.correct),
                wrong: acc.wrong.saturating_add(s.wrong),
            })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn reset(&mut self) {
        self.chapters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_counts_seen_correct_and_wrong() {
        let mut book = StatsBook::new();
        book.record("Chapter 1", true);
        book.record("Chapter 1", false);
        book.record("Chapter 2", true);

        let ch1 = book.get("Chapter 1").unwrap();
        assert_eq!((ch1.seen(), ch1.correct(), ch1.wrong()), (2, 1, 1));
        assert!((ch1.accuracy() - 50.0).abs() < f64::EPSILON);

        let totals = book.totals();
        assert_eq!((totals.seen(), totals.correct(), totals.wrong()), (3, 2, 1));

        let order: Vec<_> = book.iter().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["Chapter 1", "Chapter 2"]);
    }

    #[test]
    fn accuracy_of_unseen_chapter_is_zero() {
        assert_eq!(ChapterStats::default().accuracy(), 0.0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut book = StatsBook::new();
        book.record("Chapter 1", true);
        book.reset();
        assert!(book.is_empty());
        assert!(book.get("Chapter 1").is_none());
    }
}
