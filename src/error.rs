use std::path::PathBuf;
use thiserror::Error;

/// Rejected before the pipeline touches the filesystem.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("workers has to be > 0, was {requested}")]
    InvalidWorkerCount { requested: i64 },

    #[error("mmap threshold has to be > 0")]
    InvalidMmapThreshold,
}

/// Non-fatal conditions met while walking or hashing. These only ever reach
/// a `DiagnosticPort`; they never abort a run.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot visit {}: {message}", display_path(.path))]
    Traversal {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("cannot read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    pub fn traversal(path: Option<PathBuf>, message: impl Into<String>) -> Self {
        ScanError::Traversal {
            path,
            message: message.into(),
        }
    }

    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScanError::FileRead {
            path: path.into(),
            source,
        }
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "<unknown entry>".to_string(),
    }
}

/// Everything that can stop a run from returning a `Grouping`.
#[derive(Debug, Error)]
pub enum FinderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A pipeline thread died, so the grouping may be missing results.
    #[error("{stage} thread panicked")]
    WorkerPanicked { stage: &'static str },
}
