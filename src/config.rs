/// Configuration for pdf2rag
///
/// The only real configuration surface is the books folder. Resolution order:
/// explicit CLI argument, then a `books` folder in the current working
/// directory, then a `books` folder next to the executable. The first
/// existing directory wins; a candidate that exists but is a plain file is
/// skipped in favor of the remaining fallbacks. If no candidate is a
/// directory the run aborts with a configuration error listing every
/// attempted path.
use crate::error::ConfigError;
use std::env;
use std::path::{Path, PathBuf};

/// Detailed output document, one full record per book
pub const DETAILED_OUTPUT_FILE: &str = "all_books_data.json";

/// Flattened output document for retrieval indexing
pub const RAG_READY_OUTPUT_FILE: &str = "rag_ready_data.json";

/// Resolve the books folder from an optional explicit argument
pub fn resolve_books_dir(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let mut candidates: Vec<PathBuf> = Vec::new();

    if let Some(path) = explicit {
        candidates.push(path.to_path_buf());
    }
    if let Ok(cwd) = env::current_dir() {
        candidates.push(cwd.join("books"));
    }
    if let Some(exe_dir) = env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        candidates.push(exe_dir.join("books"));
    }

    first_existing_dir(&candidates).ok_or_else(|| ConfigError::BooksDirNotFound {
        tried: candidates
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect(),
    })
}

fn first_existing_dir(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|c| c.is_dir()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_existing_dir_wins() {
        let dir = TempDir::new().unwrap();
        let resolved = resolve_books_dir(Some(dir.path())).unwrap();
        assert_eq!(resolved, dir.path());
    }

    #[test]
    fn test_file_candidate_falls_through_to_next() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("books.pdf");
        std::fs::write(&file, b"x").unwrap();
        let fallback = dir.path().join("books");
        std::fs::create_dir(&fallback).unwrap();

        let resolved = first_existing_dir(&[file, fallback.clone()]).unwrap();
        assert_eq!(resolved, fallback);
    }

    #[test]
    fn test_no_directory_candidate_resolves_nothing() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("books.pdf");
        std::fs::write(&file, b"x").unwrap();

        assert!(first_existing_dir(&[file, dir.path().join("missing")]).is_none());
    }

    #[test]
    fn test_missing_everything_lists_tried_paths() {
        let missing = Path::new("/definitely/not/a/real/books/dir");
        // cwd/books or exe-dir/books could exist in odd environments; only
        // assert the error shape when resolution genuinely fails.
        if let Err(err) = resolve_books_dir(Some(missing)) {
            match err {
                ConfigError::BooksDirNotFound { tried } => {
                    assert!(tried.iter().any(|p| p.contains("not/a/real")));
                    assert!(tried.len() >= 2);
                }
                other => panic!("unexpected error: {}", other),
            }
        }
    }
}
