/// Word-aligned text chunking
pub mod chunker;

/// Ordered-rule code fragment detection
pub mod code_detector;

/// Heuristic language classification
pub mod language;

/// lopdf-backed page/metadata/image source
pub mod pdf;

pub use chunker::{CODE_CHUNK_SIZE, TEXT_CHUNK_SIZE, split_into_chunks};
pub use code_detector::{CodeBlockDetector, CodeFragment};
pub use language::{Language, LanguageClassifier};
pub use pdf::{DecodedImage, DocumentInfo, PdfSource};
