//! Archive format selection and detection.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::ArchiveError;
use crate::Result;

/// Zip local file header signature (`PK\x03\x04`).
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Zip end of central directory signature, the only record of an empty zip.
const ZIP_EMPTY_MAGIC: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];

/// Gzip member header magic.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// Deflate-compressed zip archive.
    Zip,
    /// Gzip-compressed tar archive.
    Tgz,
}

impl ArchiveFormat {
    /// Returns the canonical filename extension, including the leading dot.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirpack_core::ArchiveFormat;
    ///
    /// assert_eq!(ArchiveFormat::Zip.extension(), ".zip");
    /// assert_eq!(ArchiveFormat::Tgz.extension(), ".tgz");
    /// ```
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Zip => ".zip",
            Self::Tgz => ".tgz",
        }
    }

    /// Suffix of the temporary file written before the final rename.
    ///
    /// Always a double extension so a half-written archive can never be
    /// mistaken for a finished one.
    #[must_use]
    pub const fn temp_suffix(self) -> &'static str {
        match self {
            Self::Zip => ".part.zip",
            Self::Tgz => ".tar.gz",
        }
    }

    /// Returns the short format name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tgz => "tgz",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Detects the archive format from the filename extension.
///
/// Recognises `.zip`, `.tgz` and `.tar.gz` (case-insensitive).
///
/// # Errors
///
/// Returns `UnsupportedFormat` if the extension is not recognised.
pub fn detect_format(path: &Path) -> Result<ArchiveFormat> {
    let unsupported = || ArchiveError::UnsupportedFormat {
        path: path.to_path_buf(),
    };

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(unsupported)?;

    match extension.to_ascii_lowercase().as_str() {
        "zip" => Ok(ArchiveFormat::Zip),
        "tgz" => Ok(ArchiveFormat::Tgz),
        "gz" => {
            if let Some(stem) = path.file_stem()
                && stem.to_string_lossy().to_ascii_lowercase().ends_with(".tar")
            {
                return Ok(ArchiveFormat::Tgz);
            }
            Err(unsupported())
        }
        _ => Err(unsupported()),
    }
}

/// Detects the archive format from the leading bytes of `path`.
///
/// # Errors
///
/// Returns `UnsupportedFormat` if the magic bytes match no supported format,
/// or an I/O error if the file cannot be read.
pub fn sniff_format(path: &Path) -> Result<ArchiveFormat> {
    let mut magic = [0u8; 4];
    let mut file = File::open(path)?;
    let mut filled = 0;
    while filled < magic.len() {
        match file.read(&mut magic[filled..])? {
            0 => break,
            n => filled += n,
        }
    }

    let magic = &magic[..filled];
    if magic.starts_with(&ZIP_MAGIC) || magic.starts_with(&ZIP_EMPTY_MAGIC) {
        Ok(ArchiveFormat::Zip)
    } else if magic.starts_with(&GZIP_MAGIC) {
        Ok(ArchiveFormat::Tgz)
    } else {
        Err(ArchiveError::UnsupportedFormat {
            path: path.to_path_buf(),
        })
    }
}

/// Detects the format by extension, falling back to magic bytes.
///
/// # Errors
///
/// Returns `UnsupportedFormat` if neither the extension nor the content
/// identifies a supported format.
pub fn detect_or_sniff(path: &Path) -> Result<ArchiveFormat> {
    detect_format(path).or_else(|_| sniff_format(path))
}
