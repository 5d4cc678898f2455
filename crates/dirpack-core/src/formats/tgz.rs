//! Gzip-compressed tar handler.
//!
//! Tar records directories and modification times natively, so every
//! directory (empty or not) is stored as its own entry and no marker
//! convention is needed. Symbolic links are stored as links, never
//! followed.

use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use filetime::FileTime;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tar::Archive;
use tar::Builder;
use tar::EntryType;
use tracing::debug;
use tracing::warn;

use super::ArchiveFormat;
use super::traits::FormatHandler;
use crate::ArchiveConfig;
use crate::ArchiveError;
use crate::ArchiveReport;
use crate::ExtractionReport;
use crate::Result;
use crate::inspect::MemberInfo;
use crate::inspect::MemberKind;
use crate::inspect::classify_directories;
use crate::timestamp::TimestampCodec;
use crate::walker::TreeWalker;

/// Handler for `.tgz` / `.tar.gz` archives.
#[derive(Debug, Default, Clone, Copy)]
pub struct TgzHandler;

impl TgzHandler {
    /// Creates a new tgz handler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn open_archive(archive: File) -> Archive<GzDecoder<BufReader<File>>> {
    Archive::new(GzDecoder::new(BufReader::new(archive)))
}

fn is_symlink(path: &Path) -> Result<bool> {
    Ok(fs::symlink_metadata(path)?.file_type().is_symlink())
}

fn append_symlink<W: Write>(
    builder: &mut Builder<W>,
    path: &Path,
    member: &Path,
    report: &mut ArchiveReport,
) -> Result<()> {
    builder.append_path_with_name(path, member)?;
    report.symlinks_added += 1;
    debug!(member = %member.display(), "added symlink");
    Ok(())
}

fn entry_path(entry: &tar::Entry<'_, impl std::io::Read>) -> Result<PathBuf> {
    entry
        .path()
        .map(|p| p.into_owned())
        .map_err(ArchiveError::from_decode)
}

impl FormatHandler for TgzHandler {
    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::Tgz
    }

    fn write_archive(
        &self,
        output: &mut File,
        source: &Path,
        base_name: &str,
        config: &ArchiveConfig,
        report: &mut ArchiveReport,
    ) -> Result<()> {
        let encoder = GzEncoder::new(output, Compression::new(u32::from(config.level())));
        let mut builder = Builder::new(encoder);
        builder.follow_symlinks(false);
        let base = Path::new(base_name);

        let walker = TreeWalker::new(source)
            .prune(config.exclude_dirs.iter().cloned())
            .include_hidden(config.include_hidden);

        for node in walker {
            let node = node?;

            let dir_name = base.join(&node.relative);
            builder.append_dir(&dir_name, &node.dir)?;
            let links_before = report.symlinks_added;

            for name in &node.files {
                let path = node.dir.join(name);
                let member = dir_name.join(name);
                if is_symlink(&path)? {
                    append_symlink(&mut builder, &path, &member, report)?;
                    continue;
                }
                builder.append_path_with_name(&path, &member)?;
                let bytes = fs::metadata(&path)?.len();
                report.files_added += 1;
                report.bytes_read += bytes;
                debug!(member = %member.display(), bytes, "added file");
            }

            for name in &node.other {
                let path = node.dir.join(name);
                if is_symlink(&path)? {
                    append_symlink(&mut builder, &path, &dir_name.join(name), report)?;
                } else {
                    warn!(path = %path.display(), "skipping entry that is neither file nor directory");
                    report.skip(format!("skipped unsupported entry: {}", path.display()));
                }
            }

            if node.is_empty() && report.symlinks_added == links_before {
                report.empty_dirs_added += 1;
                debug!(member = %dir_name.display(), "added empty directory");
            }
        }

        builder.into_inner()?.finish()?;
        Ok(())
    }

    fn extract_archive(
        &self,
        archive: File,
        destination: &Path,
        report: &mut ExtractionReport,
    ) -> Result<()> {
        let mut archive = open_archive(archive);
        let mut directories: Vec<(PathBuf, u64)> = Vec::new();

        for entry in archive.entries().map_err(ArchiveError::from_decode)? {
            let mut entry = entry.map_err(ArchiveError::from_decode)?;
            let path = entry_path(&entry)?;
            let entry_type = entry.header().entry_type();
            let mtime = entry.header().mtime().map_err(ArchiveError::from_decode)?;
            let size = entry.size();

            let unpacked = entry
                .unpack_in(destination)
                .map_err(ArchiveError::from_decode)?;
            if !unpacked {
                return Err(ArchiveError::Corrupt(format!(
                    "member path escapes destination: {}",
                    path.display()
                )));
            }

            match entry_type {
                EntryType::Directory => {
                    report.directories_created += 1;
                    directories.push((destination.join(&path), mtime));
                    debug!(member = %path.display(), "created directory");
                }
                EntryType::Symlink => {
                    report.symlinks_created += 1;
                    debug!(member = %path.display(), "created symlink");
                }
                EntryType::Regular | EntryType::Continuous => {
                    report.files_extracted += 1;
                    report.timestamps_restored += 1;
                    report.bytes_written += size;
                    debug!(member = %path.display(), bytes = size, "extracted file");
                }
                other => {
                    debug!(member = %path.display(), kind = ?other, "unpacked special entry");
                }
            }
        }

        // tar stops at its end-of-archive blocks; reading on checks the gzip trailer
        std::io::copy(&mut archive.into_inner(), &mut std::io::sink())
            .map_err(ArchiveError::from_decode)?;

        // writing a file into a directory resets its mtime, so directories go last
        directories.sort_by(|a, b| b.0.cmp(&a.0));
        for (path, mtime) in directories {
            let seconds = i64::try_from(mtime).unwrap_or(i64::MAX);
            let time = FileTime::from_unix_time(seconds, 0);
            filetime::set_file_times(&path, time, time)?;
            report.timestamps_restored += 1;
        }

        Ok(())
    }

    fn list_members(&self, archive: File) -> Result<Vec<MemberInfo>> {
        let mut archive = open_archive(archive);
        let mut members = Vec::new();

        for entry in archive.entries().map_err(ArchiveError::from_decode)? {
            let entry = entry.map_err(ArchiveError::from_decode)?;
            let path = entry_path(&entry)?;
            let entry_type = entry.header().entry_type();
            let kind = if entry_type.is_dir() {
                MemberKind::Dir
            } else if entry_type.is_symlink() {
                MemberKind::Symlink
            } else {
                MemberKind::File
            };
            let timestamp = entry
                .header()
                .mtime()
                .ok()
                .and_then(|m| i64::try_from(m).ok())
                .map(|m| TimestampCodec::Local.epoch_to_archive_time(m));

            let mut name = path.to_string_lossy().into_owned();
            if kind == MemberKind::Dir && !name.ends_with('/') {
                name.push('/');
            }

            members.push(MemberInfo {
                name,
                size: entry.size(),
                kind,
                timestamp,
            });
        }

        classify_directories(&mut members);
        Ok(members)
    }
}
