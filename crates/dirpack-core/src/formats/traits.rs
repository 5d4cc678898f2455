//! Common trait for archive format handlers.

use std::fs::File;
use std::path::Path;

use crate::ArchiveConfig;
use crate::ArchiveReport;
use crate::ExtractionReport;
use crate::Result;
use crate::formats::ArchiveFormat;
use crate::inspect::MemberInfo;

/// One archive format: how a directory tree is written into it, and how it
/// is unpacked again.
///
/// Handlers are stateless. Validation, atomic output, timing and logging of
/// the whole operation are the caller's job; a handler only streams members.
pub trait FormatHandler {
    /// Returns the format this handler reads and writes.
    fn format(&self) -> ArchiveFormat;

    /// Returns the canonical filename extension.
    fn extension(&self) -> &'static str {
        self.format().extension()
    }

    /// Writes the tree under `source` into `output`, rooting every member
    /// name at `base_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be read or the archive cannot be
    /// written.
    fn write_archive(
        &self,
        output: &mut File,
        source: &Path,
        base_name: &str,
        config: &ArchiveConfig,
        report: &mut ArchiveReport,
    ) -> Result<()>;

    /// Recreates the members of `archive` under `destination`, which must
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns `Corrupt` if the archive cannot be parsed or a member path
    /// escapes `destination`, `Io` if writing fails.
    fn extract_archive(
        &self,
        archive: File,
        destination: &Path,
        report: &mut ExtractionReport,
    ) -> Result<()>;

    /// Lists the members of `archive` in stored order.
    ///
    /// # Errors
    ///
    /// Returns `Corrupt` if the archive cannot be parsed.
    fn list_members(&self, archive: File) -> Result<Vec<MemberInfo>>;
}
