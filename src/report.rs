//! Console progress and summary reporting
//!
//! User-facing batch output goes to stdout; diagnostics for recovered errors
//! go through `tracing` instead.

use crate::types::{BookRecord, CorpusSummary};

const SEPARATOR_WIDTH: usize = 60;

pub fn print_run_header(total_files: usize) {
    println!("Starting batch processing of {} PDF files...", total_files);
    println!("{}", "=".repeat(SEPARATOR_WIDTH));
}

pub fn print_book_progress(index: usize, total: usize, file_name: &str) {
    println!("\n[{}/{}] Processing: {}", index, total, file_name);
}

/// Per-phase extraction counts followed by the completion line
pub fn print_book_counts(record: &BookRecord) {
    for line in book_count_lines(record) {
        println!("{}", line);
    }
}

fn book_count_lines(record: &BookRecord) -> [String; 4] {
    [
        format!(
            "   Extracted {} text chunks",
            record.summary.total_text_chunks
        ),
        format!("   Extracted {} images", record.summary.total_images),
        format!(
            "   Extracted {} code blocks",
            record.summary.total_code_blocks
        ),
        format!(
            "   Completed: {} text chunks, {} images, {} code blocks",
            record.summary.total_text_chunks,
            record.summary.total_images,
            record.summary.total_code_blocks
        ),
    ]
}

pub fn print_saved(path: &std::path::Path, description: &str) {
    println!("Saved {} ({})", path.display(), description);
}

/// Final corpus report: totals, timing, and the top books by word count
pub fn print_summary(summary: &CorpusSummary, records: &[BookRecord]) {
    println!("\n{}", "=".repeat(SEPARATOR_WIDTH));
    println!("BATCH PROCESSING COMPLETED");
    println!("{}", "=".repeat(SEPARATOR_WIDTH));

    println!("Processing summary:");
    println!("   Total books processed: {}", summary.total_books);
    println!("   Total pages: {}", summary.total_pages);
    println!("   Total text chunks: {}", summary.total_text_chunks);
    println!("   Total images: {}", summary.total_images);
    println!("   Total code blocks: {}", summary.total_code_blocks);
    println!("   Total words: {}", summary.total_words);
    println!("   Total characters: {}", summary.total_characters);
    println!(
        "   Processing time: {:.2} seconds",
        summary.processing_time_seconds
    );
    if summary.total_books > 0 {
        println!(
            "   Average time per book: {:.2} seconds",
            summary.processing_time_seconds / summary.total_books as f64
        );
    }

    let top = top_books_by_words(records, 10);
    if !top.is_empty() {
        println!("\nTop books by content:");
        for (rank, record) in top.iter().enumerate() {
            println!(
                "   {}. {}: {} words, {} pages",
                rank + 1,
                record.metadata.book_name,
                record.summary.total_words,
                record.summary.total_pages
            );
        }
    }
}

fn top_books_by_words<'a>(records: &'a [BookRecord], limit: usize) -> Vec<&'a BookRecord> {
    let mut sorted: Vec<&BookRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.summary.total_words.cmp(&a.summary.total_words));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BookMetadata, BookSummary};

    fn record(name: &str, words: usize) -> BookRecord {
        BookRecord {
            metadata: BookMetadata::unavailable(name, "t".to_string()),
            text_chunks: vec![],
            images: vec![],
            code_blocks: vec![],
            summary: BookSummary {
                total_words: words,
                ..BookSummary::default()
            },
        }
    }

    #[test]
    fn test_top_books_sorted_descending_and_limited() {
        let records = vec![record("small", 10), record("big", 300), record("mid", 50)];
        let top = top_books_by_words(&records, 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].metadata.book_name, "big");
        assert_eq!(top[1].metadata.book_name, "mid");
    }

    #[test]
    fn test_top_books_empty_corpus() {
        assert!(top_books_by_words(&[], 10).is_empty());
    }

    #[test]
    fn test_book_counts_report_each_phase_before_completion() {
        let mut rec = record("book", 0);
        rec.summary.total_text_chunks = 4;
        rec.summary.total_images = 2;
        rec.summary.total_code_blocks = 1;

        let lines = book_count_lines(&rec);
        assert_eq!(lines[0], "   Extracted 4 text chunks");
        assert_eq!(lines[1], "   Extracted 2 images");
        assert_eq!(lines[2], "   Extracted 1 code blocks");
        assert_eq!(lines[3], "   Completed: 4 text chunks, 2 images, 1 code blocks");
    }
}
