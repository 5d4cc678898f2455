//! Buffered copying between source files and archive members.
//!
//! One [`CopyBuffer`] is allocated per archive or extract call and reused for
//! every member. Read failures are classified by where the bytes come from:
//! a failing source file is an I/O error, a failing archive member means the
//! archive stream is corrupt.

use std::io;
use std::io::Read;
use std::io::Write;

use crate::ArchiveError;
use crate::Result;

/// Copy buffer size (64 KiB).
pub const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Reusable heap buffer for streaming member data.
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Allocates a zeroed buffer of [`COPY_BUFFER_SIZE`] bytes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies a source file into an archive writer.
///
/// # Errors
///
/// Returns `Io` if reading or writing fails.
pub fn copy_with_buffer<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> Result<u64> {
    copy_inner(reader, writer, buffer, ArchiveError::Io)
}

/// Copies an archive member out to a file.
///
/// # Errors
///
/// Returns `Corrupt` if the member cannot be decoded (bad checksum,
/// truncated data) and `Io` if writing fails.
pub fn copy_archive_member<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> Result<u64> {
    copy_inner(reader, writer, buffer, ArchiveError::from_decode)
}

fn copy_inner<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
    on_read_error: fn(io::Error) -> ArchiveError,
) -> Result<u64> {
    let mut total: u64 = 0;

    loop {
        let n = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(on_read_error(e)),
        };

        writer.write_all(&buffer.buf[..n])?;
        total += n as u64;
    }

    Ok(total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct FailingReader(io::ErrorKind);

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(self.0, "read failed"))
        }
    }

    #[test]
    fn test_copy_buffer_size() {
        assert_eq!(CopyBuffer::new().size(), 64 * 1024);
        assert_eq!(CopyBuffer::default().size(), COPY_BUFFER_SIZE);
    }

    #[test]
    fn test_copy_empty_source() {
        let mut buffer = CopyBuffer::new();
        let mut output = Vec::new();
        let copied =
            copy_with_buffer(&mut Cursor::new(Vec::<u8>::new()), &mut output, &mut buffer).unwrap();
        assert_eq!(copied, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_copy_multiple_chunks() {
        let mut buffer = CopyBuffer::new();
        let input = vec![0x55u8; COPY_BUFFER_SIZE * 3 + 1000];
        let mut output = Vec::new();

        let copied = copy_with_buffer(&mut Cursor::new(&input), &mut output, &mut buffer).unwrap();
        assert_eq!(copied, input.len() as u64);
        assert_eq!(output, input);

        // buffer is reusable
        let mut output = Vec::new();
        copy_with_buffer(&mut Cursor::new(b"aqua"), &mut output, &mut buffer).unwrap();
        assert_eq!(output, b"aqua");
    }

    #[test]
    fn test_source_read_error_is_io() {
        let mut buffer = CopyBuffer::new();
        let mut reader = FailingReader(io::ErrorKind::InvalidData);
        let err = copy_with_buffer(&mut reader, &mut Vec::new(), &mut buffer).unwrap_err();
        assert!(matches!(err, ArchiveError::Io(_)));
    }

    #[test]
    fn test_member_decode_error_is_corrupt() {
        let mut buffer = CopyBuffer::new();
        let mut reader = FailingReader(io::ErrorKind::InvalidData);
        let err = copy_archive_member(&mut reader, &mut Vec::new(), &mut buffer).unwrap_err();
        assert!(err.is_corrupt());

        let mut reader = FailingReader(io::ErrorKind::PermissionDenied);
        let err = copy_archive_member(&mut reader, &mut Vec::new(), &mut buffer).unwrap_err();
        assert!(matches!(err, ArchiveError::Io(_)));
    }
}
