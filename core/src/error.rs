use std::io;
use std::path::PathBuf;

/// Failures surfaced by the flat-file store.
///
/// Malformed numeric fields are never reported here; they degrade to zero.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not create data directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            StoreError::CreateDir { path, .. }
            | StoreError::Read { path, .. }
            | StoreError::Write { path, .. } => path,
        }
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Failures while reading an external CSV file for import.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("failed to parse CSV row {line}")]
    Row {
        line: usize,
        #[source]
        source: csv::Error,
    },
    #[error("failed to read CSV headers")]
    Headers(#[source] csv::Error),
}
