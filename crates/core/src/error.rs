use thiserror::Error;

/// Failure to read a question source at all.
///
/// Bad content never ends up here; it is skipped and counted instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("csv input could not be read: {0}")]
    Csv(#[from] csv::Error),
}
