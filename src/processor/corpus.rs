//! Corpus-wide driver
//!
//! Discovers PDFs, runs the per-book pipeline sequentially and folds each
//! finalized record into the corpus summary. Books are independent; a book
//! that fails to open is logged and contributes nothing.

use crate::config::{DETAILED_OUTPUT_FILE, RAG_READY_OUTPUT_FILE};
use crate::error::ProcessError;
use crate::processor::book::process_book;
use crate::report;
use crate::types::{BookRecord, CorpusSummary, DetailedOutput, RagReadyOutput};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

pub struct CorpusProcessor {
    books_dir: PathBuf,
    records: Vec<BookRecord>,
    summary: CorpusSummary,
}

impl CorpusProcessor {
    pub fn new(books_dir: impl AsRef<Path>) -> Self {
        Self {
            books_dir: books_dir.as_ref().to_path_buf(),
            records: Vec::new(),
            summary: CorpusSummary::default(),
        }
    }

    /// All `.pdf` files directly in the books folder, in case-insensitive
    /// filename order
    pub fn discover_pdfs(&self) -> Vec<PathBuf> {
        let mut pdf_files: Vec<PathBuf> = WalkDir::new(&self.books_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .map(|name| name.to_lowercase().ends_with(".pdf"))
                    .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
            .collect();

        pdf_files.sort_by_key(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().to_lowercase())
                .unwrap_or_default()
        });
        pdf_files
    }

    /// Process every discovered PDF and finalize the corpus summary
    pub fn run(&mut self) -> Result<(), ProcessError> {
        let started = Instant::now();
        let pdf_files = self.discover_pdfs();

        report::print_run_header(pdf_files.len());

        for (i, path) in pdf_files.iter().enumerate() {
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let book_name = strip_pdf_suffix(&file_name);

            report::print_book_progress(i + 1, pdf_files.len(), &file_name);

            match process_book(path, &book_name) {
                Ok(record) => {
                    report::print_book_counts(&record);
                    self.accumulate(record);
                }
                Err(e) => {
                    tracing::warn!("Skipping book: {}", e);
                }
            }
        }

        self.finalize(started.elapsed().as_secs_f64());
        report::print_summary(&self.summary, &self.records);
        Ok(())
    }

    /// Merge one completed book into the incremental counters
    fn accumulate(&mut self, record: BookRecord) {
        self.summary.total_books += 1;
        self.summary.total_pages += record.summary.total_pages;
        self.summary.total_text_chunks += record.summary.total_text_chunks;
        self.summary.total_images += record.summary.total_images;
        self.summary.total_code_blocks += record.summary.total_code_blocks;
        self.records.push(record);
    }

    /// Final pass: word and character totals are recomputed as a fold over
    /// the finalized records, so they stay reconstructible from the persisted
    /// per-book data alone.
    fn finalize(&mut self, elapsed_seconds: f64) {
        self.summary.total_words = self.records.iter().map(|r| r.summary.total_words).sum();
        self.summary.total_characters = self
            .records
            .iter()
            .map(|r| r.summary.total_characters)
            .sum();
        self.summary.processing_time_seconds = elapsed_seconds;
        self.summary.processed_at = chrono::Utc::now().to_rfc3339();
    }

    pub fn summary(&self) -> &CorpusSummary {
        &self.summary
    }

    pub fn records(&self) -> &[BookRecord] {
        &self.records
    }

    /// Detailed view: book name mapped to its full record
    pub fn detailed_output(&self) -> DetailedOutput {
        let books = self
            .records
            .iter()
            .map(|record| (record.metadata.book_name.clone(), record.clone()))
            .collect();
        DetailedOutput {
            books,
            summary: self.summary.clone(),
        }
    }

    /// RAG-ready view: flat sequences across all books, preserving per-book
    /// then per-item insertion order
    pub fn rag_ready_output(&self) -> RagReadyOutput {
        let mut output = RagReadyOutput {
            text_chunks: Vec::new(),
            images: Vec::new(),
            code_blocks: Vec::new(),
            metadata: BTreeMap::new(),
            summary: self.summary.clone(),
        };

        for record in &self.records {
            output.text_chunks.extend(record.text_chunks.iter().cloned());
            output.images.extend(record.images.iter().cloned());
            output.code_blocks.extend(record.code_blocks.iter().cloned());
        }
        output
    }

    /// Write both output documents, in full, into `output_dir`
    pub fn save_outputs(&self, output_dir: &Path) -> Result<(), ProcessError> {
        let detailed_path = output_dir.join(DETAILED_OUTPUT_FILE);
        write_json(&detailed_path, &self.detailed_output())?;
        report::print_saved(&detailed_path, "detailed data for each book");

        let rag_path = output_dir.join(RAG_READY_OUTPUT_FILE);
        write_json(&rag_path, &self.rag_ready_output())?;
        report::print_saved(&rag_path, "RAG-ready format");
        Ok(())
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), ProcessError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|e| ProcessError::OutputFailed {
        file: path.to_string_lossy().into_owned(),
        reason: e.to_string(),
    })
}

/// Book name for a PDF filename: the name without its `.pdf` suffix
/// (case-insensitive)
fn strip_pdf_suffix(file_name: &str) -> String {
    if file_name.to_lowercase().ends_with(".pdf") {
        file_name[..file_name.len() - 4].to_string()
    } else {
        file_name.to_string()
    }
}
