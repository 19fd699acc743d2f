//! Loading question banks from raw text, CSV and PDF sources.

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use quiz_core::model::QuizSettings;
use quiz_core::{Parsed, parse_csv, parse_text};

use crate::error::{ExtractError, IngestError};

//
// ─── TEXT EXTRACTION ───────────────────────────────────────────────────────────
//

/// Turns document bytes into plain text, one visual line per `\n`.
pub trait TextExtractor {
    /// # Errors
    ///
    /// `ExtractError::Unavailable` when the extractor cannot run at all,
    /// `ExtractError::Failed` when the document could not be read.
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// Extractor for builds without PDF support.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableExtractor;

impl TextExtractor for UnavailableExtractor {
    fn extract_text(&self, _bytes: &[u8]) -> Result<String, ExtractError> {
        Err(ExtractError::Unavailable)
    }
}

/// PDF extraction through `pdf-extract`.
#[cfg(feature = "pdf")]
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

#[cfg(feature = "pdf")]
impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Failed(e.to_string()))
    }
}

/// The best extractor this build has.
#[must_use]
pub fn default_extractor() -> Box<dyn TextExtractor> {
    #[cfg(feature = "pdf")]
    {
        Box::new(PdfTextExtractor)
    }
    #[cfg(not(feature = "pdf"))]
    {
        Box::new(UnavailableExtractor)
    }
}

//
// ─── LOADER ────────────────────────────────────────────────────────────────────
//

/// Which parser a source goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Text,
    Csv,
    Pdf,
}

impl SourceKind {
    /// Guess the kind from a file extension (`txt`, `csv`, `pdf`).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" | "text" => Some(Self::Text),
            "csv" => Some(Self::Csv),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

pub struct QuizLoader {
    settings: QuizSettings,
    extractor: Box<dyn TextExtractor>,
}

impl QuizLoader {
    #[must_use]
    pub fn new(settings: QuizSettings) -> Self {
        Self {
            settings,
            extractor: default_extractor(),
        }
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn load_text(&self, raw_text: &str) -> Parsed {
        parse_text(raw_text, &self.settings)
    }

    /// # Errors
    ///
    /// Returns `IngestError::Parse` if the CSV stream cannot be read.
    pub fn load_csv<R: std::io::Read>(&self, reader: R) -> Result<Parsed, IngestError> {
        Ok(parse_csv(reader, &self.settings)?)
    }

    /// Extract text from a PDF and parse it.
    ///
    /// Without an extractor the result is an empty bank, not an error.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::Extraction` if the extractor fails on the document.
    pub fn load_pdf_bytes(&self, bytes: &[u8]) -> Result<Parsed, IngestError> {
        match self.extractor.extract_text(bytes) {
            Ok(text) => Ok(self.load_text(&text)),
            Err(ExtractError::Unavailable) => {
                warn!("pdf text extraction unavailable; loaded nothing");
                Ok(self.load_text(""))
            }
            Err(err) => Err(IngestError::Extraction(err.to_string())),
        }
    }

    /// Load a file, choosing the parser by extension.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::UnsupportedSource` for unknown extensions,
    /// `IngestError::Io` if the file cannot be read, and the errors of the
    /// chosen loader otherwise.
    pub fn load_path(&self, path: &Path) -> Result<Parsed, IngestError> {
        let kind = SourceKind::from_path(path)
            .ok_or_else(|| IngestError::UnsupportedSource(path.to_path_buf()))?;
        let io_err = |source: std::io::Error| IngestError::Io {
            path: path.to_path_buf(),
            source,
        };

        let parsed = match kind {
            SourceKind::Text => self.load_text(&fs::read_to_string(path).map_err(io_err)?),
            SourceKind::Csv => self.load_csv(fs::File::open(path).map_err(io_err)?)?,
            SourceKind::Pdf => self.load_pdf_bytes(&fs::read(path).map_err(io_err)?)?,
        };
        info!(
            path = %path.display(),
            ?kind,
            questions = parsed.report.questions,
            "loaded question bank"
        );
        Ok(parsed)
    }
}

impl fmt::Debug for QuizLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizLoader")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
