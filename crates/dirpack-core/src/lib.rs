//! Directory archiving with empty-directory and timestamp round-tripping.
//!
//! `dirpack-core` archives a directory into a single `.zip` or `.tgz` file
//! and reconstructs the directory from it. Empty directories survive the zip
//! round trip as marker members, and file and directory modification times
//! are restored on extraction.
//!
//! # Examples
//!
//! ```no_run
//! use dirpack_core::ArchiveConfig;
//! use dirpack_core::ArchiveFormat;
//! use dirpack_core::archive;
//! use dirpack_core::extract;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = archive(
//!     Some(Path::new("la_station")),
//!     None,
//!     ArchiveFormat::Zip,
//!     &ArchiveConfig::default(),
//! )?;
//! extract(&report.archive_path, "restored")?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod atomic;
pub mod config;
pub mod copy;
pub mod error;
pub mod formats;
pub mod inspect;
pub mod naming;
pub mod report;
pub mod timestamp;
pub mod walker;

#[cfg(test)]
pub(crate) mod test_utils;

pub use api::archive;
pub use api::archive_spec;
pub use api::extract;
pub use config::ArchiveConfig;
pub use error::ArchiveError;
pub use error::Result;
pub use formats::ArchiveFormat;
pub use inspect::list_members;
pub use naming::ArchiveSpec;
pub use naming::ResolvedName;
pub use naming::resolve_name;
pub use report::ArchiveReport;
pub use report::ExtractionReport;
pub use timestamp::ArchiveTime;
pub use timestamp::TimestampCodec;
