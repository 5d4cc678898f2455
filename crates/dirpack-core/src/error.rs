//! Error types for directory archiving operations.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;
use zip::result::ZipError;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while archiving or extracting a directory.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The directory/filename combination cannot be used.
    ///
    /// Raised when the source directory is the current working directory,
    /// or when no source can be derived from the arguments.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Why the arguments were rejected.
        reason: String,
    },

    /// The source directory or the archive file does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// The archive stream cannot be parsed (truncated, wrong format, bad
    /// checksum, unsafe member path).
    #[error("corrupt archive: {0}")]
    Corrupt(String),

    /// The archive format cannot be determined from the filename or content.
    #[error("unsupported archive format: {path}")]
    UnsupportedFormat {
        /// The archive whose format is unknown.
        path: PathBuf,
    },

    /// Underlying read, write or rename call failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArchiveError {
    /// Builds an [`ArchiveError::InvalidArgument`] from a reason.
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the error reports a missing source or archive.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirpack_core::ArchiveError;
    /// use std::path::PathBuf;
    ///
    /// let err = ArchiveError::NotFound {
    ///     path: PathBuf::from("la_station"),
    /// };
    /// assert!(err.is_not_found());
    /// assert!(!err.is_corrupt());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the archive stream could not be parsed.
    #[must_use]
    pub const fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt(_))
    }

    /// Returns a context string for this error, if available.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirpack_core::ArchiveError;
    ///
    /// let err = ArchiveError::Corrupt("bad header".to_string());
    /// assert_eq!(err.context(), Some("bad header"));
    /// ```
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Corrupt(msg) => Some(msg),
            Self::InvalidArgument { reason } => Some(reason),
            _ => None,
        }
    }
}

impl ArchiveError {
    /// Classifies an I/O error raised while decoding an archive stream.
    ///
    /// Truncated or malformed input surfaces as `UnexpectedEof`,
    /// `InvalidData` or `InvalidInput` and becomes `Corrupt`; anything else
    /// stays `Io`.
    pub(crate) fn from_decode(err: std::io::Error) -> Self {
        match err.kind() {
            ErrorKind::UnexpectedEof | ErrorKind::InvalidData | ErrorKind::InvalidInput => {
                Self::Corrupt(err.to_string())
            }
            _ => Self::Io(err),
        }
    }
}

impl From<ZipError> for ArchiveError {
    fn from(err: ZipError) -> Self {
        match err {
            ZipError::Io(io_err) => Self::from_decode(io_err),
            other => Self::Corrupt(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ArchiveError::invalid_argument("directory cannot be the current working directory");
        assert_eq!(
            err.to_string(),
            "invalid argument: directory cannot be the current working directory"
        );
    }

    #[test]
    fn test_not_found_error() {
        let err = ArchiveError::NotFound {
            path: PathBuf::from("nulla.zip"),
        };
        assert!(err.to_string().contains("nulla.zip"));
        assert!(err.is_not_found());
        assert_eq!(err.context(), None);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ArchiveError = io_err.into();
        assert!(matches!(err, ArchiveError::Io(_)));
        assert!(!err.is_corrupt());
    }

    #[test]
    fn test_zip_error_conversion() {
        let err: ArchiveError = ZipError::InvalidArchive("Invalid zip header".into()).into();
        assert!(err.is_corrupt());
        assert!(err.to_string().contains("Invalid zip header"));

        let err: ArchiveError = ZipError::FileNotFound.into();
        assert!(err.is_corrupt());

        let io_err = std::io::Error::other("disk full");
        let err: ArchiveError = ZipError::Io(io_err).into();
        assert!(matches!(err, ArchiveError::Io(_)));

        let eof = std::io::Error::new(ErrorKind::UnexpectedEof, "truncated");
        let err: ArchiveError = ZipError::Io(eof).into();
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_from_decode() {
        let err = ArchiveError::from_decode(std::io::Error::new(ErrorKind::InvalidInput, "bad gzip"));
        assert!(err.is_corrupt());

        let err = ArchiveError::from_decode(std::io::Error::new(
            ErrorKind::PermissionDenied,
            "denied",
        ));
        assert!(matches!(err, ArchiveError::Io(_)));
    }

    #[test]
    fn test_context() {
        let err = ArchiveError::invalid_argument("no directory");
        assert_eq!(err.context(), Some("no directory"));

        let err = ArchiveError::UnsupportedFormat {
            path: PathBuf::from("archive.rar"),
        };
        assert_eq!(err.context(), None);
    }
}
