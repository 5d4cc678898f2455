//! Zip archive handler.
//!
//! Files are stored as deflate-compressed members carrying their own
//! modification time. Directories with no files and no subdirectories are
//! stored as empty-directory markers (see [`super::marker`]); every other
//! directory is implied by the member names beneath it.
//!
//! Modification times outside the MS-DOS range also get an Info-ZIP
//! extended timestamp, which takes precedence on extraction.

use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;

use filetime::FileTime;
use tracing::debug;
use tracing::warn;
use zip::CompressionMethod;
use zip::ExtraField;
use zip::ZipArchive;
use zip::ZipWriter;
use zip::read::ZipFile;
use zip::write::FullFileOptions;

use super::ArchiveFormat;
use super::marker;
use super::traits::FormatHandler;
use crate::ArchiveConfig;
use crate::ArchiveError;
use crate::ArchiveReport;
use crate::ExtractionReport;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::copy_archive_member;
use crate::copy::copy_with_buffer;
use crate::inspect::MemberInfo;
use crate::inspect::MemberKind;
use crate::inspect::classify_directories;
use crate::timestamp::ArchiveTime;
use crate::timestamp::TimestampCodec;
use crate::timestamp::epoch_seconds;
use crate::walker::EntryKind;
use crate::walker::TreeWalker;

/// Zip stores local wall-clock time.
const CODEC: TimestampCodec = TimestampCodec::Local;

/// Members at or above this size need the zip64 extension.
const ZIP64_THRESHOLD: u64 = 0xFFFF_FFFF;

/// Header id of the Info-ZIP extended timestamp extra field.
const EXTENDED_TIMESTAMP: u16 = 0x5455;

/// Extended timestamp flag: modification time present.
const EXTENDED_MTIME: u8 = 0x01;

type Reader = BufReader<File>;

/// Handler for `.zip` archives.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipHandler;

impl ZipHandler {
    /// Creates a new zip handler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn file_options(config: &ArchiveConfig) -> FullFileOptions<'static> {
    match config.level() {
        0 => FullFileOptions::default().compression_method(CompressionMethod::Stored),
        level => FullFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(i64::from(level))),
    }
}

/// Stamps `modified` on the options for member `name`.
///
/// The DOS field only spans 1980 to 2107. Outside that range the exact
/// time goes into an extended timestamp; when even that cannot hold it the
/// DOS value stays clamped and a warning is recorded.
fn with_modified(
    options: &FullFileOptions<'static>,
    name: &str,
    modified: SystemTime,
    report: &mut ArchiveReport,
) -> Result<FullFileOptions<'static>> {
    let stored = CODEC.to_archive_time(modified);
    let mut options = options.clone().last_modified_time(stored.to_zip());
    if stored.fits_zip() {
        return Ok(options);
    }

    let seconds = epoch_seconds(modified);
    if let Ok(unix) = u32::try_from(seconds) {
        let mut field = vec![EXTENDED_MTIME];
        field.extend_from_slice(&unix.to_le_bytes());
        options.add_extra_data(EXTENDED_TIMESTAMP, field, false)?;
        debug!(member = name, seconds, "stored extended timestamp");
    } else {
        warn!(member = name, seconds, "modification time outside zip range, clamped");
        report.warn(format!(
            "modification time of {name} is outside the zip range and was clamped to {}",
            ArchiveTime::from_zip(stored.to_zip())
        ));
    }
    Ok(options)
}

/// Extended-timestamp modification time of `member`, in epoch seconds.
fn extended_mtime(member: &ZipFile<'_, Reader>) -> Option<i64> {
    member.extra_data_fields().find_map(|field| match field {
        ExtraField::ExtendedTimestamp(timestamp) => timestamp.mod_time().map(i64::from),
        ExtraField::Ntfs(_) => None,
    })
}

/// Host modification time of `member`, in epoch seconds.
fn member_mtime(member: &ZipFile<'_, Reader>) -> Result<i64> {
    match extended_mtime(member) {
        Some(seconds) => Ok(seconds),
        None => CODEC.to_host_time(ArchiveTime::from_zip(
            member.last_modified().unwrap_or_default(),
        )),
    }
}

/// Stored modification time of `member` as listed.
fn member_timestamp(member: &ZipFile<'_, Reader>) -> Option<ArchiveTime> {
    extended_mtime(member)
        .map(|seconds| CODEC.epoch_to_archive_time(seconds))
        .or_else(|| member.last_modified().map(ArchiveTime::from_zip))
}

fn member_kind(name: &str, attributes: u32, size: u64, is_dir: bool) -> Option<MemberKind> {
    if marker::is_marker_parts(name, attributes, size) {
        Some(MemberKind::EmptyDir)
    } else if is_dir {
        Some(MemberKind::Dir)
    } else {
        None
    }
}

/// Opens `archive` along with the raw external attributes of every member,
/// in index order.
fn open_archive(archive: File) -> Result<(ZipArchive<Reader>, Vec<u32>)> {
    let mut reader = BufReader::new(archive);
    let offsets = {
        let mut zip = ZipArchive::new(&mut reader)?;
        let count = zip.len();
        (0..count)
            .map(|index| -> Result<u64> { Ok(zip.by_index_raw(index)?.central_header_start()) })
            .collect::<Result<Vec<_>>>()?
    };
    let attributes = offsets
        .into_iter()
        .map(|offset| marker::read_external_attributes(&mut reader, offset))
        .collect::<Result<Vec<_>>>()?;
    Ok((ZipArchive::new(reader)?, attributes))
}

/// Sets the external attributes of every marker in the finished archive
/// to [`marker::EMPTY_DIR_ATTRIBUTES`].
fn stamp_markers(output: &mut File, markers: &[String]) -> Result<()> {
    if markers.is_empty() {
        return Ok(());
    }

    let offsets = {
        let mut zip = ZipArchive::new(&mut *output)?;
        markers
            .iter()
            .map(|name| -> Result<u64> { Ok(zip.by_name(name)?.central_header_start()) })
            .collect::<Result<Vec<_>>>()?
    };
    for offset in offsets {
        marker::write_external_attributes(output, offset, marker::EMPTY_DIR_ATTRIBUTES)?;
    }
    output.flush()?;
    Ok(())
}

/// Sets both access and modification time of `path` to `seconds`.
fn restore_times(path: &Path, seconds: i64) -> Result<()> {
    let time = FileTime::from_unix_time(seconds, 0);
    filetime::set_file_times(path, time, time)?;
    Ok(())
}

impl FormatHandler for ZipHandler {
    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::Zip
    }

    fn write_archive(
        &self,
        output: &mut File,
        source: &Path,
        base_name: &str,
        config: &ArchiveConfig,
        report: &mut ArchiveReport,
    ) -> Result<()> {
        let mut zip = ZipWriter::new(output);
        let options = file_options(config);
        let mut buffer = CopyBuffer::new();
        let base = Path::new(base_name);
        let mut markers = Vec::new();

        let walker = TreeWalker::new(source)
            .prune(config.exclude_dirs.iter().cloned())
            .include_hidden(config.include_hidden);

        for node in walker {
            let node = node?;

            for name in &node.other {
                let path = node.dir.join(name);
                warn!(path = %path.display(), "skipping entry that is neither file nor directory");
                report.skip(format!("skipped unsupported entry: {}", path.display()));
            }

            for entry in node.entries()? {
                let name = marker::member_name(&base.join(&entry.path))?;

                match entry.kind {
                    EntryKind::Directory => {
                        let member = marker::build_marker(Path::new(&name), entry.modified, CODEC)?;
                        let member_options =
                            with_modified(&options, &member.name, entry.modified, report)?;
                        zip.add_directory(member.name.as_str(), member_options)?;
                        report.empty_dirs_added += 1;
                        debug!(member = %member.name, "added empty-directory marker");
                        markers.push(member.name);
                    }
                    EntryKind::File => {
                        let member_options = with_modified(&options, &name, entry.modified, report)?
                            .large_file(entry.size >= ZIP64_THRESHOLD);
                        zip.start_file(name.as_str(), member_options)?;

                        let mut file = File::open(&entry.source)?;
                        let bytes = copy_with_buffer(&mut file, &mut zip, &mut buffer)?;
                        report.files_added += 1;
                        report.bytes_read += bytes;
                        debug!(member = %name, bytes, "added file");
                    }
                }
            }
        }

        let output = zip.finish()?;
        stamp_markers(output, &markers)?;
        Ok(())
    }

    fn extract_archive(
        &self,
        archive: File,
        destination: &Path,
        report: &mut ExtractionReport,
    ) -> Result<()> {
        let (mut zip, attributes) = open_archive(archive)?;
        let mut buffer = CopyBuffer::new();
        let mut directories: Vec<(PathBuf, i64)> = Vec::new();

        for (index, attributes) in attributes.into_iter().enumerate() {
            let mut member = zip.by_index(index)?;
            let name = member.name().to_string();
            let relative = member.enclosed_name().ok_or_else(|| {
                ArchiveError::Corrupt(format!("member path escapes destination: {name}"))
            })?;
            let target = destination.join(relative);
            let mtime = member_mtime(&member)?;

            if member_kind(&name, attributes, member.size(), member.is_dir()).is_some() {
                fs::create_dir_all(&target)?;
                report.directories_created += 1;
                directories.push((target, mtime));
                debug!(member = %name, "created directory");
                continue;
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&target)?;
            let bytes = copy_archive_member(&mut member, &mut out, &mut buffer)?;
            drop(out);

            restore_times(&target, mtime)?;
            report.files_extracted += 1;
            report.timestamps_restored += 1;
            report.bytes_written += bytes;
            debug!(member = %name, bytes, "extracted file");
        }

        // writing a file into a directory resets its mtime, so directories go last
        directories.sort_by(|a, b| b.0.cmp(&a.0));
        for (path, mtime) in directories {
            restore_times(&path, mtime)?;
            report.timestamps_restored += 1;
        }

        Ok(())
    }

    fn list_members(&self, archive: File) -> Result<Vec<MemberInfo>> {
        let (mut zip, attributes) = open_archive(archive)?;
        let mut members = Vec::with_capacity(zip.len());

        for (index, attributes) in attributes.into_iter().enumerate() {
            let member = zip.by_index_raw(index)?;
            let name = member.name().to_string();
            let kind = member_kind(&name, attributes, member.size(), member.is_dir())
                .unwrap_or(MemberKind::File);
            members.push(MemberInfo {
                size: member.size(),
                kind,
                timestamp: member_timestamp(&member),
                name,
            });
        }

        classify_directories(&mut members);
        Ok(members)
    }
}
