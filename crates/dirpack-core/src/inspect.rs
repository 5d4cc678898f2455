//! Archive listing without extraction.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fs::File;
use std::ops::Bound;
use std::path::Path;

use tracing::debug;

use crate::ArchiveError;
use crate::Result;
use crate::formats::detect_or_sniff;
use crate::formats::handler;
use crate::timestamp::ArchiveTime;

/// What a stored member recreates on extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Regular file.
    File,
    /// Directory with nothing stored beneath it.
    EmptyDir,
    /// Directory that also has members beneath it.
    Dir,
    /// Symbolic link, stored as its target path.
    Symlink,
}

impl MemberKind {
    /// Short lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::EmptyDir => "empty dir",
            Self::Dir => "dir",
            Self::Symlink => "symlink",
        }
    }

    /// Returns `true` for both directory kinds.
    #[must_use]
    pub const fn is_dir(self) -> bool {
        matches!(self, Self::EmptyDir | Self::Dir)
    }
}

/// One entry of an archive listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    /// Stored member name.
    pub name: String,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// File or directory.
    pub kind: MemberKind,
    /// Stored modification time, if any.
    pub timestamp: Option<ArchiveTime>,
}

/// Lists the members of a zip or tgz archive.
///
/// The format is detected from the extension, falling back to magic bytes.
///
/// # Errors
///
/// Returns `NotFound` if the archive does not exist, `UnsupportedFormat` if
/// the format cannot be determined and `Corrupt` if it cannot be parsed.
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::inspect::list_members;
///
/// for member in list_members("la_station.zip")? {
///     println!("{:>10} {}", member.size, member.name);
/// }
/// # Ok::<(), dirpack_core::ArchiveError>(())
/// ```
pub fn list_members(archive_filename: impl AsRef<Path>) -> Result<Vec<MemberInfo>> {
    let path = archive_filename.as_ref();
    if !path.is_file() {
        return Err(ArchiveError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let format = detect_or_sniff(path)?;
    let members = handler(format).list_members(File::open(path)?)?;
    debug!(archive = %path.display(), %format, members = members.len(), "listed archive");
    Ok(members)
}

/// Marks directory members with nothing stored beneath them as empty.
pub(crate) fn classify_directories(members: &mut [MemberInfo]) {
    let has_children: Vec<bool> = {
        let names: BTreeSet<&str> = members.iter().map(|m| m.name.as_str()).collect();
        members
            .iter()
            .map(|m| m.kind.is_dir() && has_members_below(&names, &m.name))
            .collect()
    };

    for (member, has_children) in members.iter_mut().zip(has_children) {
        if member.kind.is_dir() {
            member.kind = if has_children {
                MemberKind::Dir
            } else {
                MemberKind::EmptyDir
            };
        }
    }
}

/// Names sharing a prefix are contiguous in sorted order, so the first name
/// after `dir/` decides.
fn has_members_below(names: &BTreeSet<&str>, dir: &str) -> bool {
    let prefix = if dir.ends_with('/') {
        Cow::Borrowed(dir)
    } else {
        Cow::Owned(format!("{dir}/"))
    };
    names
        .range::<str, _>((Bound::Excluded(prefix.as_ref()), Bound::Unbounded))
        .next()
        .is_some_and(|name| name.starts_with(prefix.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, kind: MemberKind) -> MemberInfo {
        MemberInfo {
            name: name.to_string(),
            size: 0,
            kind,
            timestamp: None,
        }
    }

    #[test]
    fn test_classify_directories() {
        let mut members = vec![
            member("la_station/", MemberKind::Dir),
            member("la_station/scirit", MemberKind::File),
            member("la_station/nulla/", MemberKind::Dir),
            member("la_station/nullam", MemberKind::Dir),
        ];
        classify_directories(&mut members);

        assert_eq!(members[0].kind, MemberKind::Dir);
        assert_eq!(members[1].kind, MemberKind::File);
        assert_eq!(members[2].kind, MemberKind::EmptyDir);
        assert_eq!(members[3].kind, MemberKind::EmptyDir);
    }

    #[test]
    fn test_classify_ignores_sibling_prefixes() {
        let mut members = vec![
            member("possible/", MemberKind::Dir),
            member("possible.txt", MemberKind::File),
            member("possible0/existit", MemberKind::File),
            member("possible/publici/", MemberKind::Dir),
            member("possible/publici/stipat", MemberKind::File),
            member("possible/publici-link", MemberKind::Symlink),
        ];
        classify_directories(&mut members);

        assert_eq!(members[0].kind, MemberKind::Dir);
        assert_eq!(members[3].kind, MemberKind::Dir);
        assert_eq!(members[5].kind, MemberKind::Symlink);

        let mut members = vec![
            member("possible/", MemberKind::Dir),
            member("possible.txt", MemberKind::File),
            member("possible0/existit", MemberKind::File),
        ];
        classify_directories(&mut members);
        assert_eq!(members[0].kind, MemberKind::EmptyDir);
    }

    #[test]
    fn test_classify_large_listing() {
        let mut members: Vec<MemberInfo> = (0..5000)
            .map(|i| member(&format!("d{i}/"), MemberKind::Dir))
            .collect();
        members.push(member("d42/scirit", MemberKind::File));
        classify_directories(&mut members);

        assert_eq!(members[42].kind, MemberKind::Dir);
        assert_eq!(
            members.iter().filter(|m| m.kind == MemberKind::EmptyDir).count(),
            4999
        );
    }

    #[test]
    fn test_list_missing_archive() {
        let result = list_members("/nonexistent/quaerunt.zip");
        assert!(matches!(result, Err(ArchiveError::NotFound { .. })));
    }

    #[test]
    fn test_labels() {
        assert_eq!(MemberKind::EmptyDir.label(), "empty dir");
        assert_eq!(MemberKind::File.label(), "file");
        assert_eq!(MemberKind::Symlink.label(), "symlink");
        assert!(MemberKind::EmptyDir.is_dir());
        assert!(!MemberKind::Symlink.is_dir());
    }
}
