//! Per-book extraction pipeline
//!
//! Drives the PDF source, chunker and code detector for one document and
//! assembles the finalized `BookRecord`. The document is opened once; the
//! four phases (metadata, text, images, code) are recovered independently so
//! a failure in one phase never empties another.

use crate::error::{DocumentError, Phase};
use crate::extractor::{
    CODE_CHUNK_SIZE, CodeBlockDetector, PdfSource, TEXT_CHUNK_SIZE, split_into_chunks,
};
use crate::types::{BookMetadata, BookRecord, BookSummary, CodeBlock, ImageRecord, TextChunk};
use anyhow::Result;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Process one PDF into a finalized book record.
///
/// An open failure is returned to the caller, which skips the book entirely.
/// All later failures are recovered here.
pub fn process_book(path: &Path, book_name: &str) -> Result<BookRecord, DocumentError> {
    let source = PdfSource::open(path).map_err(|e| DocumentError::OpenFailed {
        book: book_name.to_string(),
        reason: format!("{:#}", e),
    })?;
    let detector = CodeBlockDetector::new();

    Ok(assemble_record(
        book_name,
        extract_metadata(&source, path, book_name),
        extract_text(&source, book_name),
        extract_images(&source, book_name),
        extract_code(&source, &detector, book_name),
    ))
}

/// Fold the four phase results into a finalized record.
///
/// Each phase is recovered on its own: a failed list phase becomes an empty
/// list, a failed metadata phase falls back to the `unavailable` record, and
/// the surviving phases are kept as extracted.
fn assemble_record(
    book_name: &str,
    metadata: Result<BookMetadata>,
    text: Result<Vec<TextChunk>>,
    images: Result<Vec<ImageRecord>>,
    code: Result<Vec<CodeBlock>>,
) -> BookRecord {
    let metadata = match metadata {
        Ok(metadata) => metadata,
        Err(e) => {
            tracing::warn!(
                "{}",
                DocumentError::PhaseFailed {
                    book: book_name.to_string(),
                    phase: Phase::Metadata,
                    reason: format!("{:#}", e),
                }
            );
            BookMetadata::unavailable(book_name, now_timestamp())
        }
    };

    let mut record = BookRecord {
        metadata,
        text_chunks: recover_phase(book_name, Phase::Text, text),
        images: recover_phase(book_name, Phase::Images, images),
        code_blocks: recover_phase(book_name, Phase::Code, code),
        summary: BookSummary::default(),
    };
    record.finalize();
    record
}

fn recover_phase<T>(book: &str, phase: Phase, result: Result<Vec<T>>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(
                "{}",
                DocumentError::PhaseFailed {
                    book: book.to_string(),
                    phase,
                    reason: format!("{:#}", e),
                }
            );
            Vec::new()
        }
    }
}

fn extract_metadata(source: &PdfSource, path: &Path, book_name: &str) -> Result<BookMetadata> {
    let file_size_bytes = fs::metadata(path)?.len();
    let info = source.document_info();

    Ok(BookMetadata {
        title: info.title,
        author: info.author,
        subject: info.subject,
        creator: info.creator,
        producer: info.producer,
        page_count: source.page_count(),
        file_size_bytes,
        extraction_timestamp: now_timestamp(),
        pdf_version: source.version().to_string(),
        book_name: book_name.to_string(),
    })
}

fn extract_text(source: &PdfSource, book_name: &str) -> Result<Vec<TextChunk>> {
    let mut text_chunks = Vec::new();

    for page in source.page_numbers() {
        let text = source.page_text(page)?;
        for (chunk_id, chunk) in split_into_chunks(&text, TEXT_CHUNK_SIZE).iter().enumerate() {
            let trimmed = chunk.trim();
            if trimmed.is_empty() {
                continue;
            }
            text_chunks.push(TextChunk {
                book_name: book_name.to_string(),
                page,
                chunk_id,
                text: trimmed.to_string(),
                word_count: trimmed.split_whitespace().count(),
                char_count: trimmed.chars().count(),
            });
        }
    }

    Ok(text_chunks)
}

fn extract_images(source: &PdfSource, book_name: &str) -> Result<Vec<ImageRecord>> {
    let mut images = Vec::new();

    for page in source.page_numbers() {
        for (image_index, decoded) in source.page_images(page).into_iter().enumerate() {
            let image = match decoded {
                Ok(image) => image,
                // One bad image never aborts the page
                Err(e) => {
                    tracing::warn!(
                        "{}",
                        DocumentError::ImageDecodeFailed {
                            book: book_name.to_string(),
                            page,
                            index: image_index,
                            reason: format!("{:#}", e),
                        }
                    );
                    continue;
                }
            };

            // Keep grayscale and RGB; CMYK-class images are not convertible
            if image.channel_count >= 4 {
                tracing::debug!(
                    "Skipping {}-channel image {} on page {} of '{}'",
                    image.channel_count,
                    image_index,
                    page,
                    book_name
                );
                continue;
            }

            images.push(ImageRecord {
                book_name: book_name.to_string(),
                page,
                image_index,
                content_hash: content_hash(&image.encoded_bytes),
                byte_size: image.encoded_bytes.len(),
                encoded_format: image.encoded_format,
                width: image.width,
                height: image.height,
                colorspace_name: image.colorspace_name,
                has_alpha: image.has_alpha,
            });
        }
    }

    Ok(images)
}

fn extract_code(
    source: &PdfSource,
    detector: &CodeBlockDetector,
    book_name: &str,
) -> Result<Vec<CodeBlock>> {
    let mut code_blocks = Vec::new();

    for page in source.page_numbers() {
        let text = source.page_text(page)?;
        for (chunk_id, chunk) in split_into_chunks(&text, CODE_CHUNK_SIZE).iter().enumerate() {
            for fragment in detector.detect(chunk) {
                code_blocks.push(CodeBlock {
                    book_name: book_name.to_string(),
                    page,
                    chunk_id,
                    code_text: fragment.code_text,
                    detected_language: fragment.detected_language,
                    line_count: fragment.line_count,
                    char_count: fragment.char_count,
                    has_functions: fragment.has_functions,
                    has_imports: fragment.has_imports,
                });
            }
        }
    }

    Ok(code_blocks)
}

fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_is_stable_hex() {
        let hash = content_hash(b"pixel data");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, content_hash(b"pixel data"));
        assert_ne!(hash, content_hash(b"other data"));
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_process_book_missing_file_is_open_error() {
        let err = process_book(Path::new("/nonexistent/book.pdf"), "book").unwrap_err();
        assert!(matches!(err, DocumentError::OpenFailed { .. }));
    }

    fn sample_metadata(book_name: &str) -> BookMetadata {
        BookMetadata {
            page_count: 3,
            pdf_version: "1.5".to_string(),
            ..BookMetadata::unavailable(book_name, "t".to_string())
        }
    }

    fn sample_chunk(book_name: &str) -> TextChunk {
        TextChunk {
            book_name: book_name.to_string(),
            page: 1,
            chunk_id: 0,
            text: "hello world".to_string(),
            word_count: 2,
            char_count: 11,
        }
    }

    #[test]
    fn test_failed_phase_empties_only_that_phase() {
        let record = assemble_record(
            "book",
            Ok(sample_metadata("book")),
            Ok(vec![sample_chunk("book")]),
            Err(anyhow::anyhow!("bad image stream")),
            Ok(vec![]),
        );

        assert!(record.images.is_empty());
        assert_eq!(record.text_chunks.len(), 1);
        assert_eq!(record.metadata.pdf_version, "1.5");
        assert_eq!(record.summary.total_images, 0);
        assert_eq!(record.summary.total_text_chunks, 1);
        assert_eq!(record.summary.total_words, 2);
        assert_eq!(record.summary.total_pages, 3);
    }

    #[test]
    fn test_failed_metadata_falls_back_to_unavailable() {
        let record = assemble_record(
            "book",
            Err(anyhow::anyhow!("no trailer")),
            Ok(vec![sample_chunk("book")]),
            Ok(vec![]),
            Ok(vec![]),
        );

        assert_eq!(record.metadata.book_name, "book");
        assert_eq!(record.metadata.pdf_version, "unknown");
        assert_eq!(record.metadata.page_count, 0);
        assert!(!record.metadata.extraction_timestamp.is_empty());
        // text survives the metadata failure
        assert_eq!(record.text_chunks.len(), 1);
        assert_eq!(record.summary.total_words, 2);
    }
}
