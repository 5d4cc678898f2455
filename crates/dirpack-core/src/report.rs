//! Archive and extraction operation reporting.

use std::path::PathBuf;
use std::time::Duration;

use crate::formats::ArchiveFormat;

/// Report of an archive operation.
///
/// # Examples
///
/// ```
/// use dirpack_core::ArchiveFormat;
/// use dirpack_core::ArchiveReport;
///
/// let mut report = ArchiveReport::new("la_station.zip", ArchiveFormat::Zip);
/// report.bytes_read = 1000;
/// report.bytes_compressed = 250;
///
/// assert_eq!(report.compression_ratio(), 4.0);
/// assert_eq!(report.compression_percentage(), 75.0);
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveReport {
    /// Final archive filename.
    pub archive_path: PathBuf,

    /// Format the archive was written in.
    pub format: ArchiveFormat,

    /// Number of regular files stored.
    pub files_added: usize,

    /// Number of empty directories stored (markers for zip, directory
    /// entries for tgz).
    pub empty_dirs_added: usize,

    /// Number of symbolic links stored as links (tgz only).
    pub symlinks_added: usize,

    /// Total bytes read from source files.
    pub bytes_read: u64,

    /// Size of the final archive file.
    pub bytes_compressed: u64,

    /// Number of entries skipped (unsupported file types, pruned names).
    pub entries_skipped: usize,

    /// Warnings generated while archiving.
    pub warnings: Vec<String>,

    /// Duration of the operation.
    pub duration: Duration,
}

impl ArchiveReport {
    /// Creates an empty report for the given archive.
    #[must_use]
    pub fn new(archive_path: impl Into<PathBuf>, format: ArchiveFormat) -> Self {
        Self {
            archive_path: archive_path.into(),
            format,
            files_added: 0,
            empty_dirs_added: 0,
            symlinks_added: 0,
            bytes_read: 0,
            bytes_compressed: 0,
            entries_skipped: 0,
            warnings: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    /// Records a skipped entry along with a warning message.
    pub fn skip(&mut self, msg: impl Into<String>) {
        self.entries_skipped += 1;
        self.warnings.push(msg.into());
    }

    /// Records a warning about an entry that was stored with a loss.
    pub fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the compression ratio (uncompressed / compressed).
    ///
    /// Returns 0.0 if either side is 0.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_compressed == 0 || self.bytes_read == 0 {
            return 0.0;
        }
        self.bytes_read as f64 / self.bytes_compressed as f64
    }

    /// Returns the space saved as a percentage of the uncompressed size.
    ///
    /// Negative when the archive is larger than its content, which is
    /// normal for tiny trees.
    #[must_use]
    pub fn compression_percentage(&self) -> f64 {
        if self.bytes_read == 0 {
            return 0.0;
        }
        (1.0 - self.bytes_compressed as f64 / self.bytes_read as f64) * 100.0
    }
}

/// Report of an extraction operation.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Number of regular files written.
    pub files_extracted: usize,

    /// Number of directories created from directory entries.
    pub directories_created: usize,

    /// Number of symbolic links recreated.
    pub symlinks_created: usize,

    /// Number of entries whose modification time was restored.
    pub timestamps_restored: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Duration of the operation.
    pub duration: Duration,
}

impl ExtractionReport {
    /// Creates a new empty extraction report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns total number of entries recreated.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted + self.directories_created + self.symlinks_created
    }
}
