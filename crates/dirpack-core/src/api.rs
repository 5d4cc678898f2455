//! High-level public API for archiving and extracting directories.

use std::fs;
use std::fs::File;
use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::ArchiveConfig;
use crate::ArchiveError;
use crate::ArchiveReport;
use crate::ExtractionReport;
use crate::Result;
use crate::atomic::AtomicOutput;
use crate::formats::ArchiveFormat;
use crate::formats::detect_or_sniff;
use crate::formats::handler;
use crate::naming::ArchiveSpec;

/// Archives a directory into a single `.zip` or `.tgz` file.
///
/// Missing arguments are filled in by [`crate::resolve_name`]. Member names
/// are rooted at the directory's base name, so extracting the archive into
/// `.` recreates the directory itself.
///
/// The archive is written to a temporary file next to the destination and
/// renamed into place once complete; on error the destination is untouched.
///
/// # Errors
///
/// Returns an error if:
/// - The source is the current working directory, or cannot be derived
///   (`InvalidArgument`)
/// - The archive would be written inside the source directory
///   (`InvalidArgument`)
/// - The source directory does not exist (`NotFound`)
/// - Reading the tree or writing the archive fails (`Io`)
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::ArchiveConfig;
/// use dirpack_core::ArchiveFormat;
/// use dirpack_core::archive;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = archive(
///     Some(Path::new("la_station")),
///     None,
///     ArchiveFormat::Zip,
///     &ArchiveConfig::default(),
/// )?;
/// println!("Wrote {} ({} files)", report.archive_path.display(), report.files_added);
/// # Ok(())
/// # }
/// ```
pub fn archive(
    source_dir: Option<&Path>,
    archive_filename: Option<&Path>,
    format: ArchiveFormat,
    config: &ArchiveConfig,
) -> Result<ArchiveReport> {
    let spec = ArchiveSpec::for_archive(source_dir, archive_filename, format)?;
    archive_spec(&spec, config)
}

/// Archives the directory described by an already resolved [`ArchiveSpec`].
///
/// # Errors
///
/// See [`archive`].
pub fn archive_spec(spec: &ArchiveSpec, config: &ArchiveConfig) -> Result<ArchiveReport> {
    let start = Instant::now();
    let source = &spec.source_directory;

    if !source.is_dir() {
        return Err(ArchiveError::NotFound {
            path: source.clone(),
        });
    }
    ensure_outside_source(source, &spec.archive_filename)?;

    let base_name = spec.base_name()?;
    info!(
        source = %source.display(),
        archive = %spec.archive_filename.display(),
        format = %spec.format,
        "archiving directory"
    );

    let mut output = AtomicOutput::create(&spec.archive_filename, spec.format)?;
    let mut report = ArchiveReport::new(&spec.archive_filename, spec.format);
    handler(spec.format).write_archive(
        output.file_mut(),
        source,
        &base_name,
        config,
        &mut report,
    )?;
    report.bytes_compressed = output.commit()?;
    report.duration = start.elapsed();

    info!(
        archive = %report.archive_path.display(),
        files = report.files_added,
        empty_dirs = report.empty_dirs_added,
        symlinks = report.symlinks_added,
        skipped = report.entries_skipped,
        bytes = report.bytes_compressed,
        "archive written"
    );
    Ok(report)
}

/// Rejects an archive path whose directory lies inside the source tree.
fn ensure_outside_source(source: &Path, archive_filename: &Path) -> Result<()> {
    let parent = archive_filename
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    if let (Ok(source), Ok(parent)) = (source.canonicalize(), parent.canonicalize())
        && parent.starts_with(&source)
    {
        return Err(ArchiveError::invalid_argument(format!(
            "archive {} would be written inside the source directory",
            archive_filename.display()
        )));
    }
    Ok(())
}

/// Recreates the directory tree stored in an archive under
/// `destination_root`.
///
/// The format is detected from the extension (`.zip`, `.tgz`, `.tar.gz`),
/// falling back to the file's magic bytes. `destination_root` is created if
/// it does not exist. File and directory modification times are restored
/// from the archive.
///
/// # Errors
///
/// Returns an error if:
/// - The archive does not exist (`NotFound`)
/// - The format cannot be determined (`UnsupportedFormat`)
/// - The archive cannot be parsed, or a member escapes the destination
///   (`Corrupt`)
/// - Writing to the destination fails (`Io`)
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::extract;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = extract("la_station.zip", ".")?;
/// println!("Recreated {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract(
    archive_filename: impl AsRef<Path>,
    destination_root: impl AsRef<Path>,
) -> Result<ExtractionReport> {
    let start = Instant::now();
    let archive_path = archive_filename.as_ref();
    let destination = match destination_root.as_ref() {
        p if p.as_os_str().is_empty() => Path::new("."),
        p => p,
    };

    if !archive_path.is_file() {
        return Err(ArchiveError::NotFound {
            path: archive_path.to_path_buf(),
        });
    }

    let format = detect_or_sniff(archive_path)?;
    info!(
        archive = %archive_path.display(),
        destination = %destination.display(),
        %format,
        "extracting archive"
    );

    fs::create_dir_all(destination)?;
    let mut report = ExtractionReport::new();
    handler(format).extract_archive(File::open(archive_path)?, destination, &mut report)?;
    report.duration = start.elapsed();

    info!(
        files = report.files_extracted,
        directories = report.directories_created,
        bytes = report.bytes_written,
        "extraction complete"
    );
    Ok(report)
}
