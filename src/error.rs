use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// User-facing error taxonomy
// ---------------------------------------------------------------------------

/// The input table could not be read. The active dataset is left untouched.
#[derive(Debug, Error)]
#[error("could not load {}: {cause:#}", .path.display())]
pub struct LoadError {
    pub path: PathBuf,
    cause: anyhow::Error,
}

impl LoadError {
    pub fn new(path: impl Into<PathBuf>, cause: anyhow::Error) -> Self {
        Self {
            path: path.into(),
            cause,
        }
    }
}

/// Writing the responses failed. The output path is not updated.
#[derive(Debug, Error)]
#[error("could not save responses to {}: {cause:#}", .path.display())]
pub struct SaveError {
    pub path: PathBuf,
    cause: anyhow::Error,
}

impl SaveError {
    pub fn new(path: impl Into<PathBuf>, cause: anyhow::Error) -> Self {
        Self {
            path: path.into(),
            cause,
        }
    }
}

/// A single render failed; the UI stays usable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("row {index} does not exist (dataset has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },
    #[error("row {index} has no samples")]
    EmptyRow { index: usize },
}
