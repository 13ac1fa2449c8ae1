//! Errors raised while loading glossary resources

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlossaryError {
    #[error("Glossary file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error(
        "Invalid glossary format at {}:{line}: expected 2 columns (source<tab>target), got {fields}",
        path.display()
    )]
    MalformedEntry {
        path: PathBuf,
        line: usize,
        fields: usize,
    },

    #[error("Failed to read glossary file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type GlossaryResult<T> = Result<T, GlossaryError>;
