//! Archive naming policy.
//!
//! Given an optional source directory and an optional archive filename,
//! [`resolve_name`] fills in whichever is missing:
//!
//! | directory   | filename         | result                                  |
//! |-------------|------------------|-----------------------------------------|
//! | none        | none             | `""`, `dir_package.<ext>`               |
//! | `le_cheque` | none             | `le_cheque`, `le_cheque.<ext>`          |
//! | none        | `quaerunt.zip`   | `quaerunt`, `quaerunt.zip`              |
//! | given       | given            | both verbatim                           |
//!
//! The filesystem root has no base name and is archived as `root.<ext>`.
//! Base names are taken from the path as written, never from the
//! filesystem, so a path ending in `..` has none.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::ArchiveError;
use crate::Result;
use crate::formats::ArchiveFormat;

/// Stem of the archive filename used when neither argument is given.
pub const DEFAULT_ARCHIVE_STEM: &str = "dir_package";

/// Base name used for the filesystem root.
pub const ROOT_NAME: &str = "root";

/// A directory/filename pair after the naming policy has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    /// Source directory. Empty means "the current directory".
    pub directory: PathBuf,
    /// Archive filename.
    pub archive_filename: PathBuf,
}

/// Applies the naming policy without touching the filesystem.
///
/// An empty `directory` is treated as absent.
///
/// # Errors
///
/// Returns `InvalidArgument` if `directory` is `.`, or if no base name can
/// be derived from it (for example `..`).
///
/// # Examples
///
/// ```
/// use dirpack_core::ArchiveFormat;
/// use dirpack_core::resolve_name;
/// use std::path::Path;
///
/// let name = resolve_name(Some(Path::new("le_cheque")), None, ArchiveFormat::Zip).unwrap();
/// assert_eq!(name.directory, Path::new("le_cheque"));
/// assert_eq!(name.archive_filename, Path::new("le_cheque.zip"));
///
/// let name = resolve_name(None, Some(Path::new("quaerunt.zip")), ArchiveFormat::Zip).unwrap();
/// assert_eq!(name.directory, Path::new("quaerunt"));
/// ```
pub fn resolve_name(
    directory: Option<&Path>,
    archive_filename: Option<&Path>,
    format: ArchiveFormat,
) -> Result<ResolvedName> {
    let directory = directory.filter(|d| !d.as_os_str().is_empty());

    if let Some(dir) = directory
        && dir.components().all(|c| matches!(c, Component::CurDir))
    {
        return Err(ArchiveError::invalid_argument(
            "directory cannot be '.'; name the directory explicitly",
        ));
    }

    let resolved = match (directory, archive_filename) {
        (None, None) => ResolvedName {
            directory: PathBuf::new(),
            archive_filename: PathBuf::from(format!(
                "{DEFAULT_ARCHIVE_STEM}{}",
                format.extension()
            )),
        },
        (Some(dir), None) => ResolvedName {
            directory: dir.to_path_buf(),
            archive_filename: PathBuf::from(format!("{}{}", base_name(dir)?, format.extension())),
        },
        (None, Some(file)) => ResolvedName {
            directory: strip_archive_extension(file),
            archive_filename: file.to_path_buf(),
        },
        (Some(dir), Some(file)) => ResolvedName {
            directory: dir.to_path_buf(),
            archive_filename: file.to_path_buf(),
        },
    };

    Ok(resolved)
}

/// Returns the last component of `directory`, or `root` for the filesystem
/// root. Trailing separators are ignored.
///
/// # Errors
///
/// Returns `InvalidArgument` if the path ends in `..` or is not valid UTF-8.
pub fn base_name(directory: &Path) -> Result<String> {
    if let Some(name) = directory.file_name() {
        return name.to_str().map(str::to_string).ok_or_else(|| {
            ArchiveError::invalid_argument(format!(
                "directory name is not valid UTF-8: {}",
                directory.display()
            ))
        });
    }

    let root_only = directory
        .components()
        .all(|c| matches!(c, Component::RootDir | Component::Prefix(_)));
    if root_only && directory.has_root() {
        return Ok(ROOT_NAME.to_string());
    }

    Err(ArchiveError::invalid_argument(format!(
        "cannot derive an archive name from {}",
        directory.display()
    )))
}

/// Strips the archive extension from `filename`; `.tar.gz` counts as one.
fn strip_archive_extension(filename: &Path) -> PathBuf {
    if let Some(name) = filename.to_str() {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".tar.gz") {
            return PathBuf::from(&name[..name.len() - ".tar.gz".len()]);
        }
    }
    filename.with_extension("")
}

/// The resolved identity of one archive operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSpec {
    /// Directory to archive.
    pub source_directory: PathBuf,
    /// Archive file to write.
    pub archive_filename: PathBuf,
    /// Output format.
    pub format: ArchiveFormat,
}

impl ArchiveSpec {
    /// Resolves the archive identity for an archive operation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the naming policy fails, if no source
    /// directory or base name can be derived, or if the source is the
    /// current working directory. Returns `Io` if the current directory
    /// cannot be read.
    pub fn for_archive(
        directory: Option<&Path>,
        archive_filename: Option<&Path>,
        format: ArchiveFormat,
    ) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::for_archive_from(directory, archive_filename, format, &cwd)
    }

    /// Same as [`ArchiveSpec::for_archive`] with an explicit working
    /// directory.
    ///
    /// # Errors
    ///
    /// See [`ArchiveSpec::for_archive`].
    pub fn for_archive_from(
        directory: Option<&Path>,
        archive_filename: Option<&Path>,
        format: ArchiveFormat,
        cwd: &Path,
    ) -> Result<Self> {
        let resolved = resolve_name(directory, archive_filename, format)?;

        if resolved.directory.as_os_str().is_empty() {
            return Err(ArchiveError::invalid_argument(
                "no source directory given and none can be derived from the archive name",
            ));
        }
        base_name(&resolved.directory)?;

        if is_same_directory(&resolved.directory, cwd) {
            return Err(ArchiveError::invalid_argument(format!(
                "directory cannot be the current working directory: {}",
                resolved.directory.display()
            )));
        }

        Ok(Self {
            source_directory: resolved.directory,
            archive_filename: resolved.archive_filename,
            format,
        })
    }

    /// Base name under which members are rooted inside the archive.
    ///
    /// # Errors
    ///
    /// See [`base_name`].
    pub fn base_name(&self) -> Result<String> {
        base_name(&self.source_directory)
    }
}

/// Compares two directories after canonicalisation. A path that cannot be
/// canonicalised (missing) never matches.
fn is_same_directory(candidate: &Path, cwd: &Path) -> bool {
    let relative_to_cwd = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        cwd.join(candidate)
    };
    match (relative_to_cwd.canonicalize(), cwd.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
