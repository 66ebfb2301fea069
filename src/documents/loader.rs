//! Corpus loading from a flat directory of text files.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use super::types::Document;

/// Errors from reading the document corpus.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Corpus directory not found: {0}")]
    NotFound(PathBuf),

    #[error("Corpus path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list corpus directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Options controlling which files become documents.
#[derive(Debug, Clone)]
pub struct CorpusOptions {
    /// File extension without the leading dot.
    pub extension: String,

    /// Sort documents by file name.
    pub sort_by_name: bool,
}

impl Default for CorpusOptions {
    fn default() -> Self {
        Self {
            extension: "txt".to_string(),
            sort_by_name: true,
        }
    }
}

/// Load every matching file directly inside `dir`.
///
/// Subdirectories are not descended into. Files that are not valid UTF-8
/// fail the whole load, as does any unreadable entry.
pub fn load_corpus(dir: &Path, options: &CorpusOptions) -> Result<Vec<Document>, CorpusError> {
    if !dir.exists() {
        return Err(CorpusError::NotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(CorpusError::NotADirectory(dir.to_path_buf()));
    }

    let mut walker = WalkDir::new(dir).min_depth(1).max_depth(1);
    if options.sort_by_name {
        walker = walker.sort_by_file_name();
    }

    let mut documents = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !has_extension(entry.path(), &options.extension) {
            continue;
        }

        let path = entry.path();
        let text = std::fs::read_to_string(path).map_err(|source| CorpusError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let name = entry.file_name().to_string_lossy().into_owned();
        tracing::debug!(target: "corpus", "loaded {name} ({} bytes)", text.len());

        documents.push(Document {
            name,
            source_path: path.to_path_buf(),
            text,
        });
    }

    tracing::info!(
        target: "corpus",
        "loaded {} documents from {}",
        documents.len(),
        dir.display()
    );

    Ok(documents)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_loads_only_matching_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.txt"), "bravo").unwrap();
        fs::write(temp.path().join("a.txt"), "alpha").unwrap();
        fs::write(temp.path().join("notes.md"), "# ignored").unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested").join("c.txt"), "ignored").unwrap();

        let docs = load_corpus(temp.path(), &CorpusOptions::default()).unwrap();
        let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();

        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert_eq!(docs[0].text, "alpha");
        assert_eq!(docs[0].source_path, temp.path().join("a.txt"));
    }

    #[test]
    fn test_extension_match_is_exact() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("UPPER.TXT"), "loud").unwrap();
        fs::write(temp.path().join("archive.txt.bak"), "stale").unwrap();
        fs::write(temp.path().join("kept.txt"), "kept").unwrap();

        let docs = load_corpus(temp.path(), &CorpusOptions::default()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "kept.txt");
    }

    #[test]
    fn test_empty_directory() {
        let temp = TempDir::new().unwrap();
        let docs = load_corpus(temp.path(), &CorpusOptions::default()).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");

        let err = load_corpus(&missing, &CorpusOptions::default()).unwrap_err();
        assert!(matches!(err, CorpusError::NotFound(_)));
    }

    #[test]
    fn test_file_instead_of_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("single.txt");
        fs::write(&file, "text").unwrap();

        let err = load_corpus(&file, &CorpusOptions::default()).unwrap_err();
        assert!(matches!(err, CorpusError::NotADirectory(_)));
    }

    #[test]
    fn test_invalid_utf8_is_read_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("bad.txt"), [0xff, 0xfe, 0x00]).unwrap();

        let err = load_corpus(temp.path(), &CorpusOptions::default()).unwrap_err();
        assert!(matches!(err, CorpusError::Read { .. }));
    }
}
