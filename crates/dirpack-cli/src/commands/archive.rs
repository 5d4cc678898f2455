//! Archive command implementation.

use crate::cli::ArchiveArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use dirpack_core::ArchiveConfig;
use dirpack_core::ArchiveFormat;
use dirpack_core::archive;
use std::path::Path;
use tracing::debug;

pub fn execute(args: &ArchiveArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let config = build_config(args);
    let format = ArchiveFormat::from(args.format);

    let subject = args
        .directory
        .as_deref()
        .or(args.output.as_deref())
        .unwrap_or_else(|| Path::new("."));

    debug!(?config, %format, "archive options");

    let report = add_archive_context(
        archive(
            args.directory.as_deref(),
            args.output.as_deref(),
            format,
            &config,
        ),
        subject,
    )?;

    formatter.format_archive_result(&report)?;

    Ok(())
}

fn build_config(args: &ArchiveArgs) -> ArchiveConfig {
    let mut config = ArchiveConfig::default()
        .with_exclude_dirs(args.exclude.clone())
        .with_include_hidden(!args.no_hidden);

    if let Some(level) = args.compression_level {
        config = config.with_compression_level(level);
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::FormatArg;

    #[test]
    fn test_build_config_maps_flags() {
        let args = ArchiveArgs {
            directory: None,
            output: None,
            format: FormatArg::Tgz,
            compression_level: Some(9),
            exclude: vec![".git".to_string()],
            no_hidden: true,
        };

        let config = build_config(&args);
        assert_eq!(config.compression_level, Some(9));
        assert_eq!(config.exclude_dirs, vec![".git".to_string()]);
        assert!(!config.include_hidden);
    }

    #[test]
    fn test_build_config_keeps_default_level() {
        let args = ArchiveArgs {
            directory: None,
            output: None,
            format: FormatArg::Zip,
            compression_level: None,
            exclude: Vec::new(),
            no_hidden: false,
        };

        assert_eq!(build_config(&args), ArchiveConfig::default());
    }
}
