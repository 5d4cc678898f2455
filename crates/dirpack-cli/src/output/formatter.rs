//! Output formatter trait for CLI results.

use anyhow::Result;
use dirpack_core::ArchiveReport;
use dirpack_core::ExtractionReport;
use dirpack_core::ResolvedName;
use dirpack_core::inspect::MemberInfo;
use serde::Serialize;
use std::path::Path;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format archive result
    fn format_archive_result(&self, report: &ArchiveReport) -> Result<()>;

    /// Format extraction result
    fn format_extraction_result(&self, destination: &Path, report: &ExtractionReport)
    -> Result<()>;

    /// Format the outcome of the naming policy
    fn format_resolved_name(&self, resolved: &ResolvedName) -> Result<()>;

    /// Format member names only
    fn format_members_short(&self, members: &[MemberInfo]) -> Result<()>;

    /// Format members with kind, size and timestamp
    fn format_members_long(&self, members: &[MemberInfo], human_readable: bool) -> Result<()>;

    /// Format error message
    fn format_error(&self, operation: &str, error: &anyhow::Error);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
