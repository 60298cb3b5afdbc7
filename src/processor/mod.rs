/// Per-book extraction pipeline
pub mod book;

/// Corpus-wide driver and summary fold
pub mod corpus;

pub use book::process_book;
pub use corpus::CorpusProcessor;
