mod cli;
mod logging;
mod terminal;

use std::io;
use std::path::Path;

use clap::Parser;
use tracing::info;

use quiz_core::model::{ALL_CHAPTERS, QuizSettings};
use services::{QuizLoader, QuizMode, QuizSession};

use crate::cli::{Cli, Command, ModeArg};
use crate::terminal::Terminal;

fn print_summary(path: &Path, parsed: &quiz_core::Parsed) {
    let report = &parsed.report;
    println!("{}", path.display());
    println!(
        "  {} questions in {} chapters",
        report.questions, report.chapters
    );
    for chapter in parsed.bank.chapters() {
        let count = parsed.bank.questions(chapter).map_or(0, <[_]>::len);
        println!("    {chapter}: {count}");
    }
    if report.guessed_answers() > 0 {
        println!(
            "  {} answers guessed (missing {}, out of range {}, unmatched {})",
            report.guessed_answers(),
            report.defaulted_answers,
            report.clamped_answers,
            report.unmatched_answers
        );
    }
    if report.dropped_fragments + report.skipped_rows > 0 {
        println!(
            "  {} fragments dropped, {} rows skipped",
            report.dropped_fragments, report.skipped_rows
        );
    }
}

fn initial_mode(
    session: &QuizSession,
    mode: Option<ModeArg>,
    chapter: Option<&str>,
) -> QuizMode {
    match mode {
        None => QuizMode::Home,
        Some(ModeArg::Mega) => QuizMode::MegaMock,
        Some(ModeArg::Timed) => QuizMode::TimedMock,
        Some(ModeArg::Bookmarks) => QuizMode::Bookmarks,
        Some(ModeArg::Review) => QuizMode::Review,
        Some(ModeArg::Chapter) => {
            let bank = session.bank();
            let name = match chapter {
                Some(raw) => raw
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| bank.chapters().nth(i))
                    .unwrap_or(raw),
                None => bank.chapters().next().unwrap_or(ALL_CHAPTERS),
            };
            QuizMode::ChapterQuiz(name.to_owned())
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;
    let settings: QuizSettings = cli.settings()?;
    let loader = QuizLoader::new(settings.clone());

    match cli.command {
        Command::Parse { file, json } => {
            let parsed = loader.load_path(&file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&parsed.bank)?);
            } else {
                print_summary(&file, &parsed);
            }
            Ok(())
        }
        Command::Quiz {
            file,
            mode,
            chapter,
        } => {
            let parsed = loader.load_path(&file)?;
            if parsed.bank.is_empty() {
                return Err(format!("no questions found in {}", file.display()).into());
            }
            let mut session = QuizSession::new(parsed.bank, settings);
            session.set_negative_marking(cli.negative_marking);
            let mode = initial_mode(&session, mode, chapter.as_deref());
            info!(%mode, "starting drill");

            let stdin = io::stdin();
            let stdout = io::stdout();
            let mut terminal = Terminal::new(stdin.lock(), stdout.lock(), session);
            terminal.switch(mode)?;
            terminal.run()?;
            Ok(())
        }
    }
}

fn main() {
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
