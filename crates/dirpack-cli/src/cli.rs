//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap_complete::Shell;
use dirpack_core::ArchiveFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dirpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Archive a directory into a single file
    Archive(ArchiveArgs),
    /// Recreate a directory from an archive
    Extract(ExtractArgs),
    /// Show the directory and archive names that would be used
    Name(NameArgs),
    /// List archive members without extracting
    List(ListArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

impl Commands {
    /// Operation name reported in JSON output.
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Archive(_) => "archive",
            Self::Extract(_) => "extract",
            Self::Name(_) => "name",
            Self::List(_) => "list",
            Self::Completion(_) => "completion",
        }
    }
}

/// Archive format selectable on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Deflate-compressed zip
    #[default]
    Zip,
    /// Gzip-compressed tar
    Tgz,
}

impl From<FormatArg> for ArchiveFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Zip => Self::Zip,
            FormatArg::Tgz => Self::Tgz,
        }
    }
}

#[derive(clap::Args)]
pub struct ArchiveArgs {
    /// Directory to archive (derived from --output when omitted)
    #[arg(value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Archive file to write (derived from DIR when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Archive format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: FormatArg,

    /// Compression level (0 stores zip members uncompressed)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(0..=9))]
    pub compression_level: Option<u8>,

    /// Directory name to leave out (can be repeated)
    #[arg(long = "exclude", short = 'x', value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Skip files and directories whose name starts with '.'
    #[arg(long)]
    pub no_hidden: bool,
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Directory to extract into (default: current directory)
    #[arg(value_name = "DEST")]
    pub destination: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct NameArgs {
    /// Directory to archive
    #[arg(value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Archive file to write
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Archive format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: FormatArg,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Show kind, size and timestamp for each member
    #[arg(short, long)]
    pub long: bool,

    /// Show sizes in human-readable format
    #[arg(short = 'H', long)]
    pub human_readable: bool,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}
