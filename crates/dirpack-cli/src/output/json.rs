//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use dirpack_core::ArchiveReport;
use dirpack_core::ExtractionReport;
use dirpack_core::ResolvedName;
use dirpack_core::inspect::MemberInfo;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

/// One archive member as serialised by `list`.
#[derive(Debug, Serialize)]
struct MemberOutput {
    name: String,
    kind: &'static str,
    size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    modified: Option<String>,
}

impl From<&MemberInfo> for MemberOutput {
    fn from(member: &MemberInfo) -> Self {
        Self {
            name: member.name.clone(),
            kind: member.kind.label(),
            size: member.size,
            modified: member.timestamp.map(|t| t.to_string()),
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn members(members: &[MemberInfo]) -> Result<()> {
        let data: Vec<MemberOutput> = members.iter().map(MemberOutput::from).collect();
        Self::output(&JsonOutput::success("list", data))
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_archive_result(&self, report: &ArchiveReport) -> Result<()> {
        #[derive(Serialize)]
        struct ArchiveOutput {
            archive_path: String,
            format: &'static str,
            files_added: usize,
            empty_dirs_added: usize,
            symlinks_added: usize,
            bytes_read: u64,
            bytes_compressed: u64,
            compression_ratio: f64,
            entries_skipped: usize,
            duration_ms: u128,
            warnings: Vec<String>,
        }

        let data = ArchiveOutput {
            archive_path: report.archive_path.display().to_string(),
            format: report.format.name(),
            files_added: report.files_added,
            empty_dirs_added: report.empty_dirs_added,
            symlinks_added: report.symlinks_added,
            bytes_read: report.bytes_read,
            bytes_compressed: report.bytes_compressed,
            compression_ratio: report.compression_ratio(),
            entries_skipped: report.entries_skipped,
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.clone(),
        };

        Self::output(&JsonOutput::success("archive", data))
    }

    fn format_extraction_result(
        &self,
        destination: &Path,
        report: &ExtractionReport,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct ExtractionOutput {
            destination: String,
            files_extracted: usize,
            directories_created: usize,
            symlinks_created: usize,
            total_items: usize,
            timestamps_restored: usize,
            bytes_written: u64,
            duration_ms: u128,
        }

        let data = ExtractionOutput {
            destination: destination.display().to_string(),
            files_extracted: report.files_extracted,
            directories_created: report.directories_created,
            symlinks_created: report.symlinks_created,
            total_items: report.total_items(),
            timestamps_restored: report.timestamps_restored,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
        };

        Self::output(&JsonOutput::success("extract", data))
    }

    fn format_resolved_name(&self, resolved: &ResolvedName) -> Result<()> {
        #[derive(Serialize)]
        struct NameOutput {
            directory: String,
            archive_filename: String,
        }

        let data = NameOutput {
            directory: resolved.directory.display().to_string(),
            archive_filename: resolved.archive_filename.display().to_string(),
        };

        Self::output(&JsonOutput::success("name", data))
    }

    fn format_members_short(&self, members: &[MemberInfo]) -> Result<()> {
        Self::members(members)
    }

    fn format_members_long(&self, members: &[MemberInfo], _human_readable: bool) -> Result<()> {
        Self::members(members)
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error(operation, format!("{error:?}"));
        let _ = Self::output(&output);
    }
}
