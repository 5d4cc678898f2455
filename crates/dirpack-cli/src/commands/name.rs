//! Name command implementation.
//!
//! Prints the directory/archive pair `archive` would use, without touching
//! the filesystem.

use crate::cli::NameArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use dirpack_core::ArchiveFormat;
use dirpack_core::resolve_name;
use std::path::Path;

pub fn execute(args: &NameArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let subject = args
        .directory
        .as_deref()
        .or(args.output.as_deref())
        .unwrap_or_else(|| Path::new("."));

    let resolved = add_archive_context(
        resolve_name(
            args.directory.as_deref(),
            args.output.as_deref(),
            ArchiveFormat::from(args.format),
        ),
        subject,
    )?;

    formatter.format_resolved_name(&resolved)?;

    Ok(())
}
