//! Error conversion utilities for CLI.
//!
//! Converts dirpack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use dirpack_core::ArchiveError;
use std::path::Path;

/// Converts `ArchiveError` to user-friendly anyhow error with context
pub fn convert_archive_error(err: ArchiveError, subject: &Path) -> anyhow::Error {
    match err {
        ArchiveError::InvalidArgument { reason } => {
            anyhow!(
                "Cannot archive '{}': {}\n\
                 HINT: Run dirpack from outside the directory, and write the archive \
                 somewhere other than inside it.",
                subject.display(),
                reason
            )
        }
        ArchiveError::NotFound { path } => {
            anyhow!(
                "No such file or directory: '{}'\n\
                 HINT: Check the path, or pass the directory explicitly.",
                path.display()
            )
        }
        ArchiveError::Corrupt(reason) => {
            anyhow!(
                "Corrupt archive '{}': {}\n\
                 HINT: The archive may be truncated or was not written by a zip/tar tool.",
                subject.display(),
                reason
            )
        }
        ArchiveError::UnsupportedFormat { path } => {
            anyhow!(
                "Archive format not supported: {}\n\
                 HINT: Supported formats: zip, tgz (tar.gz)",
                path.display()
            )
        }
        ArchiveError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {}",
                subject.display(),
                io_err
            )
        }
    }
}

/// Adds context to a core result about the archive or directory involved
pub fn add_archive_context<T>(
    result: Result<T, ArchiveError>,
    subject: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_archive_error(e, subject))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_convert_invalid_argument_error() {
        let err = ArchiveError::InvalidArgument {
            reason: "source directory is the current working directory".to_string(),
        };
        let converted = convert_archive_error(err, Path::new("la_station"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("current working directory"));
        assert!(msg.contains("la_station"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_not_found_error() {
        let err = ArchiveError::NotFound {
            path: PathBuf::from("quaerunt.zip"),
        };
        let converted = convert_archive_error(err, Path::new("quaerunt.zip"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("No such file or directory"));
        assert!(msg.contains("quaerunt.zip"));
    }

    #[test]
    fn test_convert_corrupt_error() {
        let err = ArchiveError::Corrupt("invalid Zip archive".to_string());
        let converted = convert_archive_error(err, Path::new("junk.zip"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("Corrupt archive 'junk.zip'"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_io_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let converted = convert_archive_error(ArchiveError::Io(io_err), Path::new("a.tgz"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("I/O error"));
    }
}
