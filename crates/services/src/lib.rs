#![forbid(unsafe_code)]

pub mod error;
pub mod ingest;
pub mod sessions;

pub use quiz_core::Clock;

pub use error::{ExtractError, IngestError, SessionError};
pub use ingest::{QuizLoader, SourceKind, TextExtractor, UnavailableExtractor, default_extractor};
#[cfg(feature = "pdf")]
pub use ingest::PdfTextExtractor;

pub use sessions::{
    AnswerOutcome, ChapterReport, MockStatus, QuizMode, QuizSession, SessionProgress,
};
