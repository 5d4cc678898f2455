//! List command implementation

use crate::cli::ListArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use dirpack_core::list_members;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let members = add_archive_context(list_members(&args.archive), &args.archive)?;

    if args.long {
        formatter.format_members_long(&members, args.human_readable)?;
    } else {
        formatter.format_members_short(&members)?;
    }

    Ok(())
}
