//! Error types for terrastead_io crate.
//!
//! Provides structured error handling for map persistence.

use thiserror::Error;

/// Main error type for terrastead_io operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File system errors other than a missing save file
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    /// Compression or decompression failures
    #[error("Compression error: {0}")]
    Compression(String),

    /// Save data with an impossible layout
    #[error("Corrupt save data: {0}")]
    Corrupt(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<IoError>,
    },
}

/// Result type alias for terrastead_io operations.
pub type Result<T> = std::result::Result<T, IoError>;

impl IoError {
    /// Creates a new compression error.
    #[must_use]
    pub fn compression<S: Into<String>>(msg: S) -> Self {
        Self::Compression(msg.into())
    }

    /// Creates a new corruption error.
    #[must_use]
    pub fn corrupt<S: Into<String>>(msg: S) -> Self {
        Self::Corrupt(msg.into())
    }

    /// True when the save data itself is unusable, as opposed to the file
    /// system refusing access.
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        match self {
            Self::Compression(_) | Self::Corrupt(_) => true,
            Self::FileSystem(_) => false,
            Self::Context { source, .. } => source.is_corruption(),
        }
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IoError::corrupt("short record");
        assert_eq!(err.to_string(), "Corrupt save data: short record");
    }

    #[test]
    fn test_error_context() {
        let err = IoError::compression("stream ended early").with_context("loading tile.data");
        assert!(err.to_string().contains("loading tile.data"));
    }

    #[test]
    fn test_corruption_seen_through_context() {
        assert!(IoError::corrupt("x").with_context("a").is_corruption());
        let fs = IoError::from(std::io::Error::other("disk")).with_context("a");
        assert!(!fs.is_corruption());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: IoError = io_err.into();
        assert!(matches!(err, IoError::FileSystem(_)));
    }
}
