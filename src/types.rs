use crate::extractor::language::Language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A bounded-length, word-aligned piece of page text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextChunk {
    /// Book the chunk came from (filename without the .pdf suffix)
    pub book_name: String,
    /// 1-based page number
    pub page: u32,
    /// 0-based chunk index within the page
    pub chunk_id: usize,
    /// Trimmed chunk text
    pub text: String,
    /// Number of whitespace-separated words in `text`
    pub word_count: usize,
    /// Number of characters in `text`
    pub char_count: usize,
}

/// One embedded raster image occurrence (not deduplicated across the corpus)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    pub book_name: String,
    /// 1-based page number
    pub page: u32,
    /// 0-based image index within the page
    pub image_index: usize,
    /// SHA-256 hex digest of the encoded image bytes
    pub content_hash: String,
    /// Size of the encoded image stream in bytes
    pub byte_size: usize,
    /// Encoding of the stored bytes (jpeg, jpx, tiff, raw)
    pub encoded_format: String,
    pub width: i64,
    pub height: i64,
    pub colorspace_name: String,
    pub has_alpha: bool,
}

/// A text fragment flagged by a heuristic pattern as likely source code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeBlock {
    pub book_name: String,
    /// 1-based page number
    pub page: u32,
    /// Index of the 1000-character detection window the fragment was found in
    pub chunk_id: usize,
    /// Trimmed fragment text
    pub code_text: String,
    pub detected_language: Language,
    /// Number of newline-delimited lines in `code_text`
    pub line_count: usize,
    /// Number of characters in `code_text`
    pub char_count: usize,
    /// Fragment contains a `def` or `function` definition cue
    pub has_functions: bool,
    /// Fragment contains an `import` or `#include` cue
    pub has_imports: bool,
}

/// Document-level metadata for one book
///
/// Missing string fields default to empty; a book whose metadata phase failed
/// entirely still gets a record, all empty/zero with `pdf_version = "unknown"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookMetadata {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub creator: String,
    pub producer: String,
    pub page_count: usize,
    pub file_size_bytes: u64,
    /// When extraction ran (diagnostic, not a property of the document)
    pub extraction_timestamp: String,
    pub pdf_version: String,
    pub book_name: String,
}

impl BookMetadata {
    /// Fallback record emitted when the metadata phase fails entirely
    pub fn unavailable(book_name: &str, extraction_timestamp: String) -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            subject: String::new(),
            creator: String::new(),
            producer: String::new(),
            page_count: 0,
            file_size_bytes: 0,
            extraction_timestamp,
            pdf_version: "unknown".to_string(),
            book_name: book_name.to_string(),
        }
    }
}

/// Per-book rollup, derived from the record's own chunks
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BookSummary {
    pub total_pages: usize,
    pub total_text_chunks: usize,
    pub total_images: usize,
    pub total_code_blocks: usize,
    /// Summed from text chunks only
    pub total_words: usize,
    /// Summed from text chunks only
    pub total_characters: usize,
}

/// Everything extracted from a single PDF, in page order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRecord {
    pub metadata: BookMetadata,
    pub text_chunks: Vec<TextChunk>,
    pub images: Vec<ImageRecord>,
    pub code_blocks: Vec<CodeBlock>,
    pub summary: BookSummary,
}

impl BookRecord {
    /// Compute the per-book summary from the record's own contents.
    ///
    /// Word and character totals come from text chunks only; the page count
    /// comes from metadata so a book with unreadable pages still reports its
    /// declared length.
    pub fn finalize(&mut self) {
        self.summary = BookSummary {
            total_pages: self.metadata.page_count,
            total_text_chunks: self.text_chunks.len(),
            total_images: self.images.len(),
            total_code_blocks: self.code_blocks.len(),
            total_words: self.text_chunks.iter().map(|c| c.word_count).sum(),
            total_characters: self.text_chunks.iter().map(|c| c.char_count).sum(),
        };
    }
}

/// Corpus-wide totals over the books that completed without a fatal error
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CorpusSummary {
    pub total_books: usize,
    pub total_pages: usize,
    pub total_text_chunks: usize,
    pub total_images: usize,
    pub total_code_blocks: usize,
    pub total_words: usize,
    pub total_characters: usize,
    pub processing_time_seconds: f64,
    /// ISO-8601 completion timestamp
    pub processed_at: String,
}

/// Detailed output document: full record per book plus corpus summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedOutput {
    pub books: BTreeMap<String, BookRecord>,
    pub summary: CorpusSummary,
}

/// Flattened, corpus-wide view intended for retrieval indexing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagReadyOutput {
    pub text_chunks: Vec<TextChunk>,
    pub images: Vec<ImageRecord>,
    pub code_blocks: Vec<CodeBlock>,
    /// Reserved for index-level metadata; always empty in this tool
    pub metadata: BTreeMap<String, serde_json::Value>,
    pub summary: CorpusSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(words: &str, page: u32, chunk_id: usize) -> TextChunk {
        TextChunk {
            book_name: "book".to_string(),
            page,
            chunk_id,
            text: words.to_string(),
            word_count: words.split_whitespace().count(),
            char_count: words.chars().count(),
        }
    }

    #[test]
    fn test_finalize_sums_from_text_chunks_only() {
        let mut record = BookRecord {
            metadata: BookMetadata::unavailable("book", "now".to_string()),
            text_chunks: vec![chunk("hello world", 1, 0), chunk("one two three", 2, 0)],
            images: vec![],
            code_blocks: vec![],
            summary: BookSummary::default(),
        };
        record.metadata.page_count = 2;
        record.finalize();

        assert_eq!(record.summary.total_pages, 2);
        assert_eq!(record.summary.total_text_chunks, 2);
        assert_eq!(record.summary.total_words, 5);
        assert_eq!(record.summary.total_characters, 11 + 13);
        assert_eq!(record.summary.total_images, 0);
        assert_eq!(record.summary.total_code_blocks, 0);
    }

    #[test]
    fn test_unavailable_metadata_defaults() {
        let meta = BookMetadata::unavailable("lost-book", "2024-01-01T00:00:00Z".to_string());
        assert_eq!(meta.title, "");
        assert_eq!(meta.page_count, 0);
        assert_eq!(meta.file_size_bytes, 0);
        assert_eq!(meta.pdf_version, "unknown");
        assert_eq!(meta.book_name, "lost-book");
    }

    #[test]
    fn test_text_chunk_serialization_roundtrip() {
        let original = chunk("hello world", 3, 7);
        let json = serde_json::to_string(&original).unwrap();
        let back: TextChunk = serde_json::from_str(&json).unwrap();
        assert_eq!(back.page, 3);
        assert_eq!(back.chunk_id, 7);
        assert_eq!(back.text, "hello world");
        assert_eq!(back.word_count, 2);
        assert_eq!(back.char_count, 11);
    }

    #[test]
    fn test_code_block_language_serializes_as_string() {
        let block = CodeBlock {
            book_name: "b".to_string(),
            page: 1,
            chunk_id: 0,
            code_text: "print(\"hi\")".to_string(),
            detected_language: Language::Python,
            line_count: 1,
            char_count: 11,
            has_functions: false,
            has_imports: false,
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["detected_language"], "python");
    }
}
