/// Centralized error types for pdf2rag using thiserror
///
/// Provides domain-specific error types mapping onto the recovery policy:
/// configuration errors abort the run, document errors skip one book, phase
/// errors empty one extraction phase, image errors drop one image.
use thiserror::Error;

/// Main error type for the batch processor
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Output error: failed to write '{file}': {reason}")]
    OutputFailed { file: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors related to configuration and input resolution
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Books folder not found. Tried:{}", format_tried(.tried))]
    BooksDirNotFound { tried: Vec<String> },
}

/// Errors raised while reading a single PDF document
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to open PDF '{book}': {reason}")]
    OpenFailed { book: String, reason: String },

    #[error("Failed to extract {phase} from '{book}': {reason}")]
    PhaseFailed {
        book: String,
        phase: Phase,
        reason: String,
    },

    #[error("Failed to decode image {index} on page {page} of '{book}': {reason}")]
    ImageDecodeFailed {
        book: String,
        page: u32,
        index: usize,
        reason: String,
    },
}

/// Extraction phase of the per-book pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Metadata,
    Text,
    Images,
    Code,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Metadata => "metadata",
            Phase::Text => "text",
            Phase::Images => "images",
            Phase::Code => "code blocks",
        };
        f.write_str(name)
    }
}

fn format_tried(tried: &[String]) -> String {
    tried
        .iter()
        .map(|p| format!("\n  - {}", p))
        .collect::<String>()
}

// Conversion from anyhow::Error to ProcessError
impl From<anyhow::Error> for ProcessError {
    fn from(err: anyhow::Error) -> Self {
        ProcessError::Other(format!("{:#}", err))
    }
}

impl ProcessError {
    /// Create a new error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        ProcessError::Other(msg.into())
    }

    /// Check if this error aborts the whole run (vs being recovered per-book)
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ProcessError::Document(_))
    }
}
