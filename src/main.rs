use anyhow::Result;
use clap::Parser;
use pdf2rag::config;
use pdf2rag::processor::CorpusProcessor;
use std::path::{Path, PathBuf};

/// Batch process PDF books into text chunks, images and code blocks for RAG
#[derive(Parser, Debug)]
#[command(name = "pdf2rag", version, about)]
struct Cli {
    /// Path to the folder containing PDF books (default: ./books, then a
    /// books folder next to the executable)
    #[arg(long = "books", visible_alias = "books-folder", value_name = "DIR")]
    books: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let books_dir = config::resolve_books_dir(cli.books.as_deref())?;

    let mut processor = CorpusProcessor::new(&books_dir);
    processor.run()?;
    processor.save_outputs(Path::new("."))?;

    Ok(())
}
