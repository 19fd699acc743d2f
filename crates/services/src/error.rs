//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use quiz_core::ParseError;
use quiz_core::model::QuestionId;

/// Errors emitted by `QuizSession`.
///
/// A session never changes state when it returns one of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no option selected")]
    NoSelection,
    #[error("question {0} is not in the loaded bank")]
    UnknownQuestion(QuestionId),
    #[error("unknown chapter: {0}")]
    UnknownChapter(String),
    #[error("mock exam already finished")]
    MockFinished,
}

/// Errors from a `TextExtractor`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractError {
    #[error("text extraction is not available in this build")]
    Unavailable,
    #[error("text extraction failed: {0}")]
    Failed(String),
}

/// Errors emitted by `QuizLoader`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not extract text from document: {0}")]
    Extraction(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("unsupported source: {0}")]
    UnsupportedSource(PathBuf),
}
