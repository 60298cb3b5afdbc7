//! # pdf2rag - Batch PDF Processing for RAG Pipelines
//!
//! Converts a folder of PDF books into structured JSON suitable for
//! retrieval-augmented-generation indexing. Each document contributes page
//! text split into word-aligned chunks, embedded raster images fingerprinted
//! by content hash, heuristically detected source-code fragments with a
//! guessed language, and document metadata.
//!
//! ## Pipeline
//!
//! ```text
//! books/*.pdf
//!     |
//! CorpusProcessor          sequential, one book at a time
//!     |
//! process_book             metadata / text / images / code phases
//!     |         \
//! PdfSource    split_into_chunks + CodeBlockDetector
//!     |
//! all_books_data.json + rag_ready_data.json
//! ```
//!
//! Failures shrink to the smallest possible unit: a book that cannot be
//! opened is skipped, a failing phase yields an empty result for that book,
//! a failing image is omitted from its page. Only a missing books folder
//! aborts the run.
//!
//! ## Usage Example
//!
//! ```no_run
//! use pdf2rag::processor::CorpusProcessor;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut processor = CorpusProcessor::new("books");
//!     processor.run()?;
//!     processor.save_outputs(std::path::Path::new("."))?;
//!     Ok(())
//! }
//! ```

/// Books folder resolution and output file names
pub mod config;

/// Error types and recovery taxonomy
pub mod error;

/// Chunking, code detection, language classification and the PDF source
pub mod extractor;

/// Per-book pipeline and corpus driver
pub mod processor;

/// Console progress and summary reporting
pub mod report;

/// Output data model
pub mod types;
