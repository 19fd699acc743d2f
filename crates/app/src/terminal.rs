//! Line-oriented drill loop.
//!
//! Reads from any `BufRead` and writes to any `Write`, so tests can script a
//! whole session. Lines starting with `:` are commands; anything else answers
//! the open question.

use std::io::{self, BufRead, Write};

use tracing::debug;

use quiz_core::model::{OPTION_LETTERS, Question, letter_index};
use services::{AnswerOutcome, QuizMode, QuizSession, SessionError};

const HELP: &str = "\
Commands:
  :chapters        list chapters
  :chapter <N>     drill chapter N (number or name)
  :mega            mega mock over every question
  :timed           timed mock over every question
  :bookmarks       show bookmarked questions
  :review          accuracy per chapter
  :negative        toggle negative marking
  :reset           clear stats
  :home            stop asking questions
  :help            this text
  :quit            leave
While a question is open: answer with A-D or 1-4, `*` toggles its bookmark.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Chapters,
    Chapter(String),
    Mega,
    Timed,
    Bookmarks,
    Review,
    Negative,
    Reset,
    Home,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Command(Command),
    /// Option index; `None` when the line was blank.
    Select(Option<usize>),
    Bookmark,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix(':') {
        let (name, arg) = rest.split_once(' ').unwrap_or((rest, ""));
        let arg = arg.trim();
        let command = match name.to_ascii_lowercase().as_str() {
            "chapters" | "ls" => Command::Chapters,
            "chapter" | "c" if !arg.is_empty() => Command::Chapter(arg.to_owned()),
            "mega" | "m" => Command::Mega,
            "timed" | "t" => Command::Timed,
            "bookmarks" | "b" => Command::Bookmarks,
            "review" | "r" => Command::Review,
            "negative" | "n" => Command::Negative,
            "reset" => Command::Reset,
            "home" => Command::Home,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            _ => return Input::Unknown(line.to_owned()),
        };
        return Input::Command(command);
    }
    if line.is_empty() {
        return Input::Select(None);
    }
    if line == "*" {
        return Input::Bookmark;
    }

    let mut chars = line.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            let index = c
                .to_digit(10)
                .and_then(|d| usize::try_from(d).ok())
                .and_then(|d| d.checked_sub(1))
                .or_else(|| letter_index(c));
            match index {
                Some(i) if i < OPTION_LETTERS.len() => Input::Select(Some(i)),
                _ => Input::Unknown(line.to_owned()),
            }
        }
        _ => Input::Unknown(line.to_owned()),
    }
}

pub struct Terminal<R, W> {
    input: R,
    out: W,
    session: QuizSession,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, out: W, session: QuizSession) -> Self {
        Self {
            input,
            out,
            session,
        }
    }

    /// Run until `:quit` or end of input, then print the review.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from reading input or writing output.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.out, "{HELP}")?;
        let mut current: Option<Question> = None;

        loop {
            if current.is_none() && self.session.mode().pool().is_some() {
                current = self.session.next_question();
                match &current {
                    Some(question) => self.show_question(question)?,
                    None => self.show_exhausted()?,
                }
            }

            write!(self.out, "> ")?;
            self.out.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }

            match parse_input(&line) {
                Input::Command(Command::Quit) => break,
                Input::Command(command) => {
                    // A delivered question is only dropped when the mode
                    // changes; asking again would pop a retry or spend a tick.
                    let before = self.session.mode().clone();
                    self.apply(command)?;
                    if *self.session.mode() != before {
                        current = None;
                    } else if let Some(question) = &current {
                        self.show_question(question)?;
                    }
                }
                Input::Bookmark => match &current {
                    Some(question) => self.toggle_bookmark(question)?,
                    None => writeln!(self.out, "No question open.")?,
                },
                Input::Select(choice) => {
                    let Some(question) = current.take() else {
                        writeln!(self.out, "No question open. Type :help for commands.")?;
                        continue;
                    };
                    let chosen = choice
                        .and_then(|i| question.options().get(i))
                        .map(String::as_str);
                    match self.session.submit_answer(&question, chosen) {
                        Ok(outcome) => self.show_outcome(&outcome)?,
                        Err(SessionError::NoSelection) => {
                            writeln!(self.out, "Select an option.")?;
                            current = Some(question);
                        }
                        Err(err) => writeln!(self.out, "{err}")?,
                    }
                }
                Input::Unknown(raw) => {
                    debug!(%raw, "unrecognized input");
                    writeln!(self.out, "Pick A-D or 1-4, or type :help.")?;
                }
            }
        }

        self.show_review()
    }

    fn apply(&mut self, command: Command) -> io::Result<()> {
        match command {
            Command::Chapters => self.show_chapters(),
            Command::Chapter(which) => {
                let chapter = self.resolve_chapter(&which);
                self.switch(QuizMode::ChapterQuiz(chapter))
            }
            Command::Mega => self.switch(QuizMode::MegaMock),
            Command::Timed => self.switch(QuizMode::TimedMock),
            Command::Bookmarks => {
                self.switch(QuizMode::Bookmarks)?;
                self.show_bookmarks()
            }
            Command::Review => {
                self.switch(QuizMode::Review)?;
                self.show_review()
            }
            Command::Negative => {
                let enabled = !self.session.negative_marking();
                self.session.set_negative_marking(enabled);
                let state = if enabled { "on" } else { "off" };
                writeln!(self.out, "Negative marking {state}.")
            }
            Command::Reset => {
                self.session.reset_stats();
                writeln!(self.out, "Stats cleared.")
            }
            Command::Home => self.switch(QuizMode::Home),
            Command::Help => writeln!(self.out, "{HELP}"),
            Command::Quit => Ok(()),
        }
    }

    /// Change mode, printing the error instead of failing the loop.
    pub fn switch(&mut self, mode: QuizMode) -> io::Result<()> {
        match self.session.set_mode(mode) {
            Ok(()) => writeln!(self.out, "Mode: {}", self.session.mode()),
            Err(err) => writeln!(self.out, "{err}"),
        }
    }

    /// A 1-based chapter number, or the name as typed.
    fn resolve_chapter(&self, which: &str) -> String {
        which
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.session.bank().chapters().nth(i))
            .unwrap_or(which)
            .to_owned()
    }

    fn show_chapters(&mut self) -> io::Result<()> {
        let bank = self.session.bank();
        if bank.chapter_count() == 0 {
            return writeln!(self.out, "No chapters loaded.");
        }
        for (i, chapter) in bank.chapters().enumerate() {
            let count = bank.questions(chapter).map_or(0, <[Question]>::len);
            writeln!(self.out, "{:>3}. {chapter} ({count})", i + 1)?;
        }
        Ok(())
    }

    fn show_question(&mut self, question: &Question) -> io::Result<()> {
        writeln!(self.out)?;
        if let Some(mock) = self.session.mock_status().filter(|_| self.session.mode().is_mock()) {
            match mock.countdown {
                Some(ticks) => writeln!(
                    self.out,
                    "Time left: {ticks} | Left: {} | Score {:.2}",
                    mock.remaining, mock.score
                )?,
                None => writeln!(self.out, "Left: {} | Score {:.2}", mock.remaining, mock.score)?,
            }
        }
        let mark = if self.session.is_bookmarked(question.id()) {
            " 🔖"
        } else {
            ""
        };
        writeln!(self.out, "[{}] #{}{mark}", question.chapter(), question.id())?;
        writeln!(self.out, "{}", question.text())?;
        for (letter, option) in OPTION_LETTERS.iter().zip(question.options()) {
            writeln!(self.out, "  {letter}) {option}")?;
        }
        Ok(())
    }

    fn show_outcome(&mut self, outcome: &AnswerOutcome) -> io::Result<()> {
        if outcome.correct {
            writeln!(self.out, "✅ Correct. {}", outcome.feedback)?;
        } else {
            writeln!(self.out, "❌ Not quite. Answer: {}", outcome.correct_answer)?;
            if let Some(explanation) = &outcome.explanation {
                writeln!(self.out, "   {explanation}")?;
            }
            writeln!(self.out, "{}", outcome.feedback)?;
        }
        if let Some(mock) = outcome.mock {
            writeln!(
                self.out,
                "Score {:.2} after {} ({} left)",
                mock.score, mock.attempts, mock.remaining
            )?;
        }
        Ok(())
    }

    fn show_exhausted(&mut self) -> io::Result<()> {
        match self.session.mock_status().filter(|m| m.finished) {
            Some(mock) if self.session.mode().is_mock() => writeln!(
                self.out,
                "Mock over. Score {:.2} from {} answers.",
                mock.score, mock.attempts
            )?,
            _ => writeln!(self.out, "No questions available.")?,
        }
        self.switch(QuizMode::Home)
    }

    fn toggle_bookmark(&mut self, question: &Question) -> io::Result<()> {
        match self.session.toggle_bookmark(question.id()) {
            Ok(true) => writeln!(self.out, "Bookmarked."),
            Ok(false) => writeln!(self.out, "Bookmark removed."),
            Err(err) => writeln!(self.out, "{err}"),
        }
    }

    fn show_bookmarks(&mut self) -> io::Result<()> {
        let bookmarked = self.session.bookmarked_questions();
        if bookmarked.is_empty() {
            return writeln!(self.out, "No bookmarks yet.");
        }
        for question in bookmarked {
            writeln!(self.out, "{}", question.text())?;
            writeln!(self.out, "  Answer: {}", question.answer())?;
            if !question.explanation().is_empty() {
                writeln!(self.out, "  {}", question.explanation())?;
            }
        }
        Ok(())
    }

    fn show_review(&mut self) -> io::Result<()> {
        let report = self.session.chapter_report();
        if report.is_empty() {
            return writeln!(self.out, "No data yet.");
        }
        for row in report {
            writeln!(
                self.out,
                "{}: {:.1}% ({}/{})",
                row.chapter,
                row.accuracy,
                row.stats.correct(),
                row.stats.seen()
            )?;
        }
        Ok(())
    }
}
