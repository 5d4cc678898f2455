//! Empty-directory markers for zip archives.
//!
//! Zip has no notion of a directory beyond a member name ending in `/`, so a
//! directory holding no files would vanish on extraction. Such directories
//! are stored as a zero-length member whose name ends with `/` and whose
//! DOS attribute byte is [`EMPTY_DIR_ATTRIBUTES`]. All three conditions are
//! checked on the way back in.
//!
//! The zip codec derives external attributes from a unix mode and never
//! exposes the raw field, so markers are stamped and read directly in the
//! central directory by [`write_external_attributes`] and
//! [`read_external_attributes`].

use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;
use std::path::Path;
use std::time::SystemTime;

use crate::ArchiveError;
use crate::Result;
use crate::timestamp::ArchiveTime;
use crate::timestamp::TimestampCodec;

/// DOS "directory" attribute bit.
pub const DOS_DIRECTORY: u32 = 0x10;

/// DOS "archive" attribute bit.
pub const DOS_ARCHIVE: u32 = 0x20;

/// Attribute value flagging an empty-directory marker (48).
pub const EMPTY_DIR_ATTRIBUTES: u32 = DOS_DIRECTORY | DOS_ARCHIVE;

/// Signature of a central-directory file header.
const CENTRAL_HEADER_SIGNATURE: u32 = 0x0201_4b50;

/// Offset of the 4-byte external-attributes field in a central-directory
/// file header.
const EXTERNAL_ATTRIBUTES_OFFSET: u64 = 38;

/// One stored unit inside a zip archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveMember {
    /// Archive-relative, `/`-separated name. Markers end with `/`.
    pub name: String,
    /// Stored bytes; empty for markers.
    pub payload: Vec<u8>,
    /// DOS attribute byte.
    pub external_attributes: u32,
    /// Stored modification time.
    pub timestamp: ArchiveTime,
}

impl ArchiveMember {
    /// Stored size of the member.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.payload.len() as u64
    }
}

/// Returns `true` if `member` represents an empty directory.
///
/// # Examples
///
/// ```
/// use dirpack_core::formats::marker::{ArchiveMember, EMPTY_DIR_ATTRIBUTES, is_empty_marker};
/// use dirpack_core::timestamp::ArchiveTime;
///
/// let member = ArchiveMember {
///     name: "nulla/".to_string(),
///     payload: Vec::new(),
///     external_attributes: EMPTY_DIR_ATTRIBUTES,
///     timestamp: ArchiveTime::new(2001, 1, 1, 0, 0, 0),
/// };
/// assert!(is_empty_marker(&member));
/// ```
#[must_use]
pub fn is_empty_marker(member: &ArchiveMember) -> bool {
    is_marker_parts(&member.name, member.external_attributes, member.size())
}

/// Marker check on raw member fields.
#[must_use]
pub fn is_marker_parts(name: &str, external_attributes: u32, size: u64) -> bool {
    name.ends_with('/') && external_attributes == EMPTY_DIR_ATTRIBUTES && size == 0
}

/// Builds the marker member for an empty directory.
///
/// `dir_path` is the archive-relative directory path; it is normalised to
/// `/` separators and given a trailing `/`.
///
/// # Errors
///
/// Returns `InvalidArgument` if the path is empty or not valid UTF-8.
pub fn build_marker(
    dir_path: &Path,
    modified: SystemTime,
    codec: TimestampCodec,
) -> Result<ArchiveMember> {
    let mut name = member_name(dir_path)?;
    if name.is_empty() {
        return Err(ArchiveError::invalid_argument(
            "empty-directory marker needs a non-empty path",
        ));
    }
    name.push('/');

    Ok(ArchiveMember {
        name,
        payload: Vec::new(),
        external_attributes: EMPTY_DIR_ATTRIBUTES,
        timestamp: codec.to_archive_time(modified),
    })
}

/// Converts an archive-relative path to a zip member name.
///
/// # Errors
///
/// Returns `InvalidArgument` if the path is not valid UTF-8.
pub fn member_name(path: &Path) -> Result<String> {
    let parts = path
        .components()
        .map(|c| {
            c.as_os_str().to_str().ok_or_else(|| {
                ArchiveError::invalid_argument(format!(
                    "path is not valid UTF-8: {}",
                    path.display()
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join("/"))
}

/// Reads the raw external attributes of the central-directory record
/// starting at `header_start`.
///
/// # Errors
///
/// Returns `Corrupt` if no central-directory record starts there.
pub fn read_external_attributes<R: Read + Seek>(reader: &mut R, header_start: u64) -> Result<u32> {
    seek_central_header(reader, header_start)?;
    let mut field = [0u8; 4];
    reader
        .read_exact(&mut field)
        .map_err(ArchiveError::from_decode)?;
    Ok(u32::from_le_bytes(field))
}

/// Overwrites the raw external attributes of the central-directory record
/// starting at `header_start`.
///
/// # Errors
///
/// Returns `Corrupt` if no central-directory record starts there, `Io` if
/// the write fails.
pub fn write_external_attributes<F: Read + Write + Seek>(
    file: &mut F,
    header_start: u64,
    attributes: u32,
) -> Result<()> {
    seek_central_header(file, header_start)?;
    file.write_all(&attributes.to_le_bytes())?;
    Ok(())
}

/// Checks the record signature and leaves `reader` at the attributes field.
fn seek_central_header<R: Read + Seek>(reader: &mut R, header_start: u64) -> Result<()> {
    reader.seek(SeekFrom::Start(header_start))?;
    let mut signature = [0u8; 4];
    reader
        .read_exact(&mut signature)
        .map_err(ArchiveError::from_decode)?;
    if u32::from_le_bytes(signature) != CENTRAL_HEADER_SIGNATURE {
        return Err(ArchiveError::Corrupt(format!(
            "no central-directory record at offset {header_start}"
        )));
    }
    reader.seek(SeekFrom::Start(header_start + EXTERNAL_ATTRIBUTES_OFFSET))?;
    Ok(())
}
