//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use dirpack_core::extract;
use std::env;
use tracing::debug;

pub fn execute(args: &ExtractArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let destination = match &args.destination {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    debug!(
        archive = %args.archive.display(),
        destination = %destination.display(),
        "extracting"
    );

    let report = add_archive_context(extract(&args.archive, &destination), &args.archive)?;

    formatter.format_extraction_result(&destination, &report)?;

    Ok(())
}
