use std::collections::HashMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::model::{DeliveryPolicy, Question, QuestionBank, QuizSettings};

//
// ─── RETRY QUEUE ───────────────────────────────────────────────────────────────
//

/// A missed question waiting to be asked again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryEntry {
    remaining: u32,
    question: Question,
}

impl RetryEntry {
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn question(&self) -> &Question {
        &self.question
    }
}

/// Missed questions in insertion order, each with its own countdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryQueue {
    entries: Vec<RetryEntry>,
}

impl RetryQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, question: Question, delay: u32) {
        self.entries.push(RetryEntry {
            remaining: delay,
            question,
        });
    }

    /// Advance every countdown by one tick and pop the first entry that is due.
    ///
    /// At most one entry leaves per tick; others that are also due stay at zero
    /// and come out on later ticks in insertion order.
    pub fn tick(&mut self) -> Option<Question> {
        for entry in &mut self.entries {
            entry.remaining = entry.remaining.saturating_sub(1);
        }
        let due = self.entries.iter().position(|e| e.remaining == 0)?;
        Some(self.entries.remove(due).question)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RetryEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn contains(&self, question: &Question) -> bool {
        self.entries.iter().any(|e| e.question.id() == question.id())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

//
// ─── SCHEDULER ─────────────────────────────────────────────────────────────────
//

/// Decides which question comes next.
///
/// Each call to [`Scheduler::next`] is one tick. A due retry always wins over
/// a fresh question; otherwise the chapter pool is read according to the
/// configured `DeliveryPolicy`.
pub struct Scheduler {
    delivery: DeliveryPolicy,
    delay_min: u32,
    delay_max: u32,
    retry: RetryQueue,
    cursors: HashMap<String, usize>,
    rng: StdRng,
}

impl Scheduler {
    #[must_use]
    pub fn new(settings: &QuizSettings) -> Self {
        let rng = match settings.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            delivery: settings.delivery(),
            delay_min: settings.retry_delay_min(),
            delay_max: settings.retry_delay_max(),
            retry: RetryQueue::new(),
            cursors: HashMap::new(),
            rng,
        }
    }

    /// Next question for `chapter`, or `None` when the pool is empty or
    /// unknown and no retry is due.
    pub fn next(&mut self, bank: &QuestionBank, chapter: &str) -> Option<Question> {
        if let Some(question) = self.retry.tick() {
            debug!(id = %question.id(), "re-asking missed question");
            return Some(question);
        }

        let pool = bank.questions(chapter)?;
        if pool.is_empty() {
            return None;
        }

        let question = match self.delivery {
            DeliveryPolicy::Sequential => {
                let cursor = self.cursors.entry(chapter.to_owned()).or_insert(0);
                if *cursor >= pool.len() {
                    *cursor = 0;
                }
                let question = pool[*cursor].clone();
                *cursor += 1;
                if *cursor == pool.len() {
                    *cursor = 0;
                }
                question
            }
            DeliveryPolicy::Shuffle => pool.choose(&mut self.rng)?.clone(),
        };
        trace!(id = %question.id(), chapter, "fresh question");
        Some(question)
    }

    /// Put a missed question back with a random delay; returns the delay.
    pub fn requeue(&mut self, question: Question) -> u32 {
        let delay = self.rng.random_range(self.delay_min..=self.delay_max);
        debug!(id = %question.id(), delay, "queued for retry");
        self.retry.push(question, delay);
        delay
    }

    #[must_use]
    pub fn retry_queue(&self) -> &RetryQueue {
        &self.retry
    }

    /// Position of the sequential cursor for `chapter` (0 if never read).
    #[must_use]
    pub fn cursor(&self, chapter: &str) -> usize {
        self.cursors.get(chapter).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn delivery(&self) -> DeliveryPolicy {
        self.delivery
    }

    /// Uniform pick from `items` using the scheduler's RNG.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// Drop pending retries and rewind every cursor. The RNG keeps its state.
    pub fn reset(&mut self) {
        self.retry.clear();
        self.cursors.clear();
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("delivery", &self.delivery)
            .field("delay", &(self.delay_min..=self.delay_max))
            .field("retry", &self.retry.len())
            .field("cursors", &self.cursors)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ALL_CHAPTERS, AnswerKey, QuestionDraft, QuestionId};

    fn question(id: u64, chapter: &str) -> Question {
        QuestionDraft {
            chapter: chapter.into(),
            text: format!("Question {id}"),
            options: vec!["a".into(), "b".into()],
            answer: AnswerKey::Letter('A'),
            explanation: String::new(),
        }
        .validate(500)
        .unwrap()
        .assign_id(QuestionId::new(id))
    }

    fn bank() -> QuestionBank {
        vec![
            question(1, "Chapter 1"),
            question(2, "Chapter 1"),
            question(3, "Chapter 1"),
            question(4, "Chapter 2"),
        ]
        .into_iter()
        .collect()
    }

    fn seeded(delivery: DeliveryPolicy) -> Scheduler {
        Scheduler::new(
            &QuizSettings::default()
                .with_delivery(delivery)
                .with_seed(Some(42)),
        )
    }

    fn ids(s: &mut Scheduler, bank: &QuestionBank, chapter: &str, n: usize) -> Vec<u64> {
        (0..n)
            .map(|_| s.next(bank, chapter).unwrap().id().value())
            .collect()
    }

    #[test]
    fn sequential_wraps_around() {
        let bank = bank();
        let mut s = seeded(DeliveryPolicy::Sequential);
        assert_eq!(ids(&mut s, &bank, "Chapter 1", 7), vec![1, 2, 3, 1, 2, 3, 1]);
        assert_eq!(s.cursor("Chapter 1"), 1);
    }

    #[test]
    fn cursors_are_per_chapter() {
        let bank = bank();
        let mut s = seeded(DeliveryPolicy::Sequential);
        assert_eq!(ids(&mut s, &bank, "Chapter 1", 2), vec![1, 2]);
        assert_eq!(ids(&mut s, &bank, "Chapter 2", 2), vec![4, 4]);
        assert_eq!(ids(&mut s, &bank, ALL_CHAPTERS, 2), vec![1, 2]);
        assert_eq!(ids(&mut s, &bank, "Chapter 1", 1), vec![3]);
    }

    #[test]
    fn shuffle_stays_inside_pool() {
        let bank = bank();
        let mut s = seeded(DeliveryPolicy::Shuffle);
        for id in ids(&mut s, &bank, "Chapter 1", 50) {
            assert!((1..=3).contains(&id));
        }
    }

    #[test]
    fn empty_or_unknown_pool_yields_none() {
        let mut s = seeded(DeliveryPolicy::Sequential);
        assert!(s.next(&QuestionBank::new(), ALL_CHAPTERS).is_none());
        assert!(s.next(&bank(), "Chapter 9").is_none());
    }

    #[test]
    fn requeue_delay_is_within_window() {
        let mut s = seeded(DeliveryPolicy::Sequential);
        for _ in 0..200 {
            let d = s.requeue(question(1, "Chapter 1"));
            assert!((2..=6).contains(&d));
        }
        assert_eq!(s.retry_queue().len(), 200);
    }

    #[test]
    fn retry_is_not_eligible_before_its_delay() {
        let mut queue = RetryQueue::new();
        queue.push(question(9, "Chapter 1"), 3);
        assert!(queue.tick().is_none());
        assert!(queue.tick().is_none());
        assert_eq!(queue.tick().map(|q| q.id().value()), Some(9));
        assert!(queue.is_empty());
    }

    #[test]
    fn at_most_one_retry_per_tick() {
        let mut queue = RetryQueue::new();
        queue.push(question(1, "Chapter 1"), 1);
        queue.push(question(2, "Chapter 1"), 1);
        queue.push(question(3, "Chapter 1"), 2);

        assert_eq!(queue.tick().map(|q| q.id().value()), Some(1));
        assert_eq!(queue.tick().map(|q| q.id().value()), Some(2));
        assert_eq!(queue.tick().map(|q| q.id().value()), Some(3));
        assert!(queue.tick().is_none());
    }

    #[test]
    fn due_retry_beats_fresh_question_and_consumes_the_tick() {
        let bank = bank();
        let mut s = seeded(DeliveryPolicy::Sequential);
        let missed = s.next(&bank, "Chapter 1").unwrap();
        let delay = s.requeue(missed.clone());

        for _ in 1..delay {
            s.next(&bank, "Chapter 1").unwrap();
            assert_eq!(s.retry_queue().len(), 1);
        }
        let cursor = s.cursor("Chapter 1");
        assert_eq!(s.next(&bank, "Chapter 1"), Some(missed));
        assert!(s.retry_queue().is_empty());
        assert_eq!(s.cursor("Chapter 1"), cursor);
    }

    #[test]
    fn reset_clears_retries_and_cursors() {
        let bank = bank();
        let mut s = seeded(DeliveryPolicy::Sequential);
        let q = s.next(&bank, "Chapter 1").unwrap();
        s.requeue(q);
        s.reset();
        assert!(s.retry_queue().is_empty());
        assert_eq!(s.cursor("Chapter 1"), 0);
    }

    #[test]
    fn same_seed_same_delays() {
        let mut a = seeded(DeliveryPolicy::Shuffle);
        let mut b = seeded(DeliveryPolicy::Shuffle);
        let da: Vec<_> = (0..10).map(|_| a.requeue(question(1, "x"))).collect();
        let db: Vec<_> = (0..10).map(|_| b.requeue(question(1, "x"))).collect();
        assert_eq!(da, db);
    }
}
