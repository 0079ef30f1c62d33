use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Whether a file error happened while reading or writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Read,
    Write,
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileAction::Read => f.write_str("read"),
            FileAction::Write => f.write_str("write"),
        }
    }
}

/// Errors raised by the scanning core.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot {action} image {}: {source}", path.display())]
    File {
        action: FileAction,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("no document detected among the {examined} largest contours")]
    NotFound { examined: usize },

    #[error("detected region is degenerate: {reason}")]
    DegenerateGeometry { reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot load configuration {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ScanError {
    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        ScanError::DegenerateGeometry {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
