//! Atomic archive output.
//!
//! Archives are written to a temporary file next to the destination and
//! renamed over it only after the writer has finished. Dropping an
//! [`AtomicOutput`] without calling [`AtomicOutput::commit`] deletes the
//! temporary file, so a failed archive leaves the destination untouched.

use std::fs::File;
use std::path::Path;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use crate::Result;
use crate::formats::ArchiveFormat;

/// A temporary archive file that becomes `destination` on commit.
#[derive(Debug)]
pub struct AtomicOutput {
    temp: NamedTempFile,
    destination: PathBuf,
}

impl AtomicOutput {
    /// Creates the temporary file in the destination's directory.
    ///
    /// The temporary name is `.<final name>.<random><temp suffix>`, e.g.
    /// `.la_station.zip.a1b2c3.part.zip`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the destination directory does not exist or
    /// is not writable.
    pub fn create(destination: &Path, format: ArchiveFormat) -> Result<Self> {
        let parent = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let prefix = match destination.file_name() {
            Some(name) => format!(".{}.", name.to_string_lossy()),
            None => ".dirpack.".to_string(),
        };

        let temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(format.temp_suffix())
            .tempfile_in(parent)?;

        Ok(Self {
            temp,
            destination: destination.to_path_buf(),
        })
    }

    /// Returns the temporary file for writing.
    pub fn file_mut(&mut self) -> &mut File {
        self.temp.as_file_mut()
    }

    /// Returns the path of the temporary file.
    #[must_use]
    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    /// Flushes the temporary file and renames it over the destination.
    ///
    /// Returns the final archive size in bytes.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if syncing or renaming fails. The temporary file
    /// is removed in that case.
    pub fn commit(self) -> Result<u64> {
        let file = self.temp.as_file();
        file.sync_all()?;
        let size = file.metadata()?.len();
        self.temp
            .persist(&self.destination)
            .map_err(|e| e.error)?;
        Ok(size)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_commit_renames_over_destination() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("la_station.zip");
        std::fs::write(&destination, b"old").unwrap();

        let mut output = AtomicOutput::create(&destination, ArchiveFormat::Zip).unwrap();
        let temp_path = output.temp_path().to_path_buf();
        assert!(temp_path.to_string_lossy().ends_with(".part.zip"));
        assert_eq!(temp_path.parent(), destination.parent());

        output.file_mut().write_all(b"new archive").unwrap();
        assert_eq!(std::fs::read(&destination).unwrap(), b"old");

        let size = output.commit().unwrap();
        assert_eq!(size, 11);
        assert_eq!(std::fs::read(&destination).unwrap(), b"new archive");
        assert!(!temp_path.exists());
    }

    #[test]
    fn test_drop_removes_temp_file() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("nulla.tgz");

        let output = AtomicOutput::create(&destination, ArchiveFormat::Tgz).unwrap();
        let temp_path = output.temp_path().to_path_buf();
        assert!(temp_path.to_string_lossy().ends_with(".tar.gz"));
        assert!(temp_path.exists());

        drop(output);
        assert!(!temp_path.exists());
        assert!(!destination.exists());
    }

    #[test]
    fn test_missing_parent_is_error() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("absent").join("x.zip");
        let result = AtomicOutput::create(&destination, ArchiveFormat::Zip);
        assert!(matches!(result, Err(crate::ArchiveError::Io(_))));
    }
}
