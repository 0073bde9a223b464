//! Error type for the I/O layer
//!
//! Wraps the codec's [`PackError`] together with the failures that only
//! exist once files, manifests and configuration are involved.

use packmat_core::{ErrorCategory, PackError};
use thiserror::Error;

/// Errors returned by storage, configuration and container operations
#[derive(Debug, Error)]
pub enum Error {
    /// Encoding, decoding or protocol failure
    #[error(transparent)]
    Pack(#[from] PackError),

    /// Filesystem failure outside a stream read or write
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest or configuration JSON could not be parsed or produced
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Manifest names a format or version this build cannot read
    #[error("Unsupported format {name:?} version {version}")]
    UnsupportedFormat { name: String, version: u32 },

    /// Manifest disagrees with the stored streams
    #[error("Manifest mismatch: {0}")]
    ManifestMismatch(String),
}

impl Error {
    /// Classify the error using the codec taxonomy
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Pack(e) => e.category(),
            Error::Io(_) => ErrorCategory::Io,
            Error::Json(_) | Error::UnsupportedFormat { .. } | Error::ManifestMismatch(_) => {
                ErrorCategory::Decode
            }
            Error::Config(_) => ErrorCategory::Configuration,
        }
    }

    /// Whether this error reports a cooperative cancellation
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Error::Pack(PackError::Interrupted))
    }
}

/// Result type for the I/O layer
pub type Result<T> = std::result::Result<T, Error>;

/// Log an I/O failure and collapse it into the codec's error type
///
/// Stream backends sit behind the `no_std` stream traits, which only carry a
/// static context string.
pub(crate) fn stream_io_error(context: &'static str, err: std::io::Error) -> PackError {
    tracing::error!(error = %err, "{context}");
    PackError::Io(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_passthrough() {
        let err: Error = PackError::CorruptedData.into();
        assert_eq!(err.category(), ErrorCategory::Decode);
        assert!(!err.is_interrupted());

        let err: Error = PackError::Interrupted.into();
        assert!(err.is_interrupted());
        assert_eq!(err.category(), ErrorCategory::Cancelled);

        let err = Error::Config("zero buffer".into());
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_display() {
        let err: Error = PackError::ColumnOrder.into();
        assert_eq!(err.to_string(), "Columns out of order");
        let err = Error::UnsupportedFormat { name: "mtx".into(), version: 9 };
        assert_eq!(err.to_string(), "Unsupported format \"mtx\" version 9");
    }
}
