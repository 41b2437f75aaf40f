//! Error taxonomy for catalog loading, observer validation and rendering.
//!
//! Loaders contain `MissingResource` and `MalformedRecord` themselves: they log
//! the problem, skip the offending file or row, and keep going. Only
//! `MissingPrerequisite` and `InvalidObserver` are expected to reach a caller.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SkyError>;

#[derive(Debug, Error)]
pub enum SkyError {
    /// A required input file does not exist or could not be opened.
    #[error("Missing resource: {}", path.display())]
    MissingResource { path: PathBuf },

    /// A single catalog or constellation row could not be parsed.
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    /// A render or export was requested before its inputs were supplied.
    #[error("Missing prerequisite: {0}")]
    MissingPrerequisite(&'static str),

    /// Observer coordinates or date fall outside the supported range.
    #[error("Invalid observer: {message}")]
    InvalidObserver { message: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[cfg(feature = "image")]
    #[error("Image encoding failed: {source}")]
    Image {
        #[from]
        source: image::ImageError,
    },
}

impl SkyError {
    pub fn invalid_observer(message: impl Into<String>) -> Self {
        Self::InvalidObserver {
            message: message.into(),
        }
    }

    pub fn malformed(line: u64, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// `true` for the error kinds a loader recovers from locally.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SkyError::MissingResource { .. } | SkyError::MalformedRecord { .. }
        )
    }
}
