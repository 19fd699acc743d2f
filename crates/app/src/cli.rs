//! Command-line arguments for `mcq-drill`.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use quiz_core::model::{DeliveryPolicy, QuizSettings, SettingsError};

#[derive(Debug, Parser)]
#[command(
    name = "mcq-drill",
    version,
    about = "Drill multiple-choice questions extracted from study material",
    long_about = "Turn a PDF, text or CSV question bank into a terminal drill.\n\n\
                  Missed questions come back a few questions later; mock exams\n\
                  are scored with optional negative marking."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// More log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Seed for retry delays and shuffling; omit for a random run.
    #[arg(long, env = "MCQ_SEED", global = true)]
    pub seed: Option<u64>,

    /// How fresh questions are drawn from a chapter.
    #[arg(long, value_enum, env = "MCQ_DELIVERY", global = true)]
    pub delivery: Option<DeliveryArg>,

    /// Subtract the penalty for each wrong answer in a mock.
    #[arg(long, env = "MCQ_NEGATIVE_MARKING", global = true)]
    pub negative_marking: bool,

    /// Points lost per wrong mock answer when negative marking is on.
    #[arg(long, value_name = "POINTS", global = true)]
    pub penalty: Option<f64>,

    /// Fewest questions before a missed one comes back.
    #[arg(long, value_name = "TICKS", global = true)]
    pub retry_min: Option<u32>,

    /// Most questions before a missed one comes back.
    #[arg(long, value_name = "TICKS", global = true)]
    pub retry_max: Option<u32>,

    /// Questions per mock exam.
    #[arg(long, value_name = "N", global = true)]
    pub mock_budget: Option<u32>,

    /// Questions a timed mock may show before time is up.
    #[arg(long, value_name = "TICKS", global = true)]
    pub mock_countdown: Option<u32>,

    /// Longest question text kept, in characters.
    #[arg(long, value_name = "CHARS", global = true)]
    pub max_question_chars: Option<usize>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a question source and print what was found.
    Parse {
        /// PDF, text or CSV file.
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the whole bank as JSON on stdout.
        #[arg(long)]
        json: bool,
    },

    /// Start an interactive drill.
    Quiz {
        /// PDF, text or CSV file.
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Mode to open with; defaults to the home menu.
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Chapter for `--mode chapter` (name or 1-based number).
        #[arg(long, value_name = "CHAPTER")]
        chapter: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeliveryArg {
    #[value(alias = "seq")]
    Sequential,
    #[value(alias = "random")]
    Shuffle,
}

impl From<DeliveryArg> for DeliveryPolicy {
    fn from(arg: DeliveryArg) -> Self {
        match arg {
            DeliveryArg::Sequential => DeliveryPolicy::Sequential,
            DeliveryArg::Shuffle => DeliveryPolicy::Shuffle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Chapter,
    Mega,
    Timed,
    Bookmarks,
    Review,
}

impl Cli {
    /// Build settings from the flags, falling back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the combination is invalid.
    pub fn settings(&self) -> Result<QuizSettings, SettingsError> {
        let d = QuizSettings::default();
        QuizSettings::new(
            self.retry_min.unwrap_or(d.retry_delay_min()),
            self.retry_max.unwrap_or(d.retry_delay_max()),
            self.max_question_chars.unwrap_or(d.max_question_chars()),
            self.mock_budget.unwrap_or(d.mock_budget()),
            self.mock_countdown.unwrap_or(d.mock_countdown_ticks()),
            self.penalty.unwrap_or(d.negative_penalty()),
            self.delivery.map_or(d.delivery(), DeliveryPolicy::from),
            self.seed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_produce_default_settings() {
        let cli = Cli::try_parse_from(["mcq-drill", "parse", "bank.pdf"]).unwrap();
        let settings = cli.settings().unwrap();
        assert_eq!(settings.retry_delay_min(), 2);
        assert_eq!(settings.retry_delay_max(), 6);
        assert_eq!(settings.mock_budget(), 100);
        assert!(matches!(cli.command, Command::Parse { json: false, .. }));
    }

    #[test]
    fn flags_override_settings() {
        let cli = Cli::try_parse_from([
            "mcq-drill",
            "quiz",
            "bank.csv",
            "--mode",
            "timed",
            "--seed",
            "42",
            "--delivery",
            "random",
            "--mock-budget",
            "20",
            "-vv",
        ])
        .unwrap();
        let settings = cli.settings().unwrap();
        assert_eq!(settings.seed(), Some(42));
        assert_eq!(settings.delivery(), DeliveryPolicy::Shuffle);
        assert_eq!(settings.mock_budget(), 20);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Command::Quiz {
                mode: Some(ModeArg::Timed),
                ..
            }
        ));
    }

    #[test]
    fn inverted_retry_window_is_rejected() {
        let cli = Cli::try_parse_from([
            "mcq-drill",
            "parse",
            "bank.txt",
            "--retry-min",
            "5",
            "--retry-max",
            "3",
        ])
        .unwrap();
        assert!(cli.settings().is_err());
    }
}
