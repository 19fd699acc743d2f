use quiz_core::model::{ALL_CHAPTERS, DeliveryPolicy, QuizSettings};
use quiz_core::time::fixed_now;
use services::{Clock, QuizLoader, QuizMode, QuizSession};

const BANK: &str = "\
Chapter 1: Securities Markets
Q1) Which body regulates Indian securities markets?
A) RBI
B) SEBI
C) IRDAI
D) PFRDA
Ans: B
Q2) What does IPO stand for?
A) Initial public offering
B) Indian price order
Ans: A
Chapter 2: Market Participants
Q1) What does FPI stand for?
A) X
B) Foreign Portfolio Investor
C) Y
D) Z
Ans: B
Explanation: Foreign portfolio investors buy listed securities.
Q2) Who holds securities in demat form?
A) Depository
B) Registrar
Ans: A
";

fn session(seed: u64) -> QuizSession {
    let settings = QuizSettings::default().with_seed(Some(seed));
    let parsed = QuizLoader::new(settings.clone()).load_text(BANK);
    assert_eq!(parsed.report.questions, 4);
    QuizSession::with_clock(parsed.bank, settings, Clock::fixed(fixed_now()))
}

#[test]
fn wrong_answer_comes_back_within_two_to_six_ticks() {
    for seed in 0..20 {
        let mut s = session(seed);
        s.set_mode(QuizMode::ChapterQuiz("Chapter 2: Market Participants".into()))
            .unwrap();

        let missed = s.next_question().unwrap();
        assert_eq!(missed.answer(), "Foreign Portfolio Investor");
        let out = s.submit_answer(&missed, Some("X")).unwrap();
        let delay = out.retry_in.unwrap();
        assert!((2..=6).contains(&delay));
        assert_eq!(
            out.explanation.as_deref(),
            Some("Foreign portfolio investors buy listed securities.")
        );

        // Answer every fresh question correctly until the retry surfaces.
        let mut ticks = 0;
        let came_back_at = loop {
            ticks += 1;
            let q = s.next_question().unwrap();
            if q.id() == missed.id() && s.scheduler().retry_queue().is_empty() {
                break ticks;
            }
            s.submit_answer(&q, Some(q.answer())).unwrap();
            assert!(ticks <= 6, "retry never surfaced");
        };
        assert_eq!(came_back_at, delay, "seed {seed}");
    }
}

#[test]
fn mock_score_never_drops_without_negative_marking() {
    let mut s = session(7);
    s.set_mode(QuizMode::MegaMock).unwrap();
    assert!(!s.negative_marking());

    let mut last = 0.0;
    for i in 0..40 {
        let Some(q) = s.next_question() else { break };
        let chosen = if i % 3 == 0 { "definitely wrong" } else { q.answer() };
        let status = s.submit_answer(&q, Some(chosen)).unwrap().mock.unwrap();
        assert!(status.score >= last);
        assert!(status.score.abs() <= f64::from(status.attempts));
        last = status.score;
    }
}

#[test]
fn negative_marking_bounds_score_by_attempts() {
    let mut s = session(3);
    s.set_negative_marking(true);
    s.set_mode(QuizMode::MegaMock).unwrap();

    for _ in 0..30 {
        let q = s.next_question().unwrap();
        let status = s.submit_answer(&q, Some("nope")).unwrap().mock.unwrap();
        assert!(status.score <= 0.0);
        assert!(status.score.abs() <= f64::from(status.attempts));
    }
    let status = s.mock_status().unwrap();
    assert_eq!(status.remaining, 70);
    assert!((status.score + 7.5).abs() < 1e-9);
}

#[test]
fn mega_mock_runs_through_the_whole_budget() {
    let settings = QuizSettings::new(2, 6, 500, 10, 100, 0.25, DeliveryPolicy::Shuffle, Some(1))
        .unwrap();
    let parsed = QuizLoader::new(settings.clone()).load_text(BANK);
    let mut s = QuizSession::new(parsed.bank, settings);
    s.set_mode(QuizMode::MegaMock).unwrap();

    let mut answered = 0;
    while let Some(q) = s.next_question() {
        assert!(s.bank().questions(ALL_CHAPTERS).unwrap().contains(&q));
        s.submit_answer(&q, Some(q.answer())).unwrap();
        answered += 1;
    }
    assert_eq!(answered, 10);
    let status = s.mock_status().unwrap();
    assert!(status.finished);
    assert!((status.score - 10.0).abs() < f64::EPSILON);
    assert!(s.completed_at().is_some());
}

#[test]
fn review_reports_per_chapter_accuracy() {
    let mut s = session(11);
    let bank = s.bank().clone();
    for q in bank.all() {
        s.submit_answer(q, Some(q.answer())).unwrap();
    }
    let first = &bank.all()[0];
    s.submit_answer(first, Some("RBI")).unwrap();

    let report = s.chapter_report();
    assert_eq!(report.len(), 2);
    assert_eq!(report[0].chapter, "Chapter 1: Securities Markets");
    assert_eq!(report[0].stats.seen(), 3);
    assert!((report[0].accuracy - 200.0 / 3.0).abs() < 1e-9);
    assert!((report[1].accuracy - 100.0).abs() < f64::EPSILON);
    assert_eq!(s.progress().answered, 5);
}
