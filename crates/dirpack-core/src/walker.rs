//! Directory tree traversal.
//!
//! [`TreeWalker`] visits every directory under a root and reports, per
//! directory, its immediate subdirectories, files and other entries. It is
//! the input to the zip and tgz writers. [`walk_files`] is a flat variant
//! yielding only file paths.

use std::ffi::OsStr;
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::Result;

/// One directory visited by [`TreeWalker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirNode {
    /// Full path of the directory.
    pub dir: PathBuf,
    /// Path of the directory relative to the walk root; empty for the root.
    pub relative: PathBuf,
    /// Names of immediate subdirectories, sorted.
    pub subdirs: Vec<OsString>,
    /// Names of immediate files, sorted. Symlinks to files are included.
    pub files: Vec<OsString>,
    /// Names of entries that are neither files nor directories (sockets,
    /// FIFOs, devices, dangling or directory symlinks), sorted.
    pub other: Vec<OsString>,
}

impl DirNode {
    /// Returns `true` if the directory holds no files and no subdirectories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.subdirs.is_empty()
    }

    /// Returns the entries of this node that produce archive members: one
    /// per file, plus the directory itself when it is empty.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the metadata of an entry cannot be read.
    pub fn entries(&self) -> Result<Vec<TreeEntry>> {
        let mut entries = Vec::with_capacity(self.files.len() + 1);

        if self.is_empty() {
            entries.push(TreeEntry {
                path: self.relative.clone(),
                source: self.dir.clone(),
                kind: EntryKind::Directory,
                is_empty: true,
                size: 0,
                modified: fs::metadata(&self.dir)?.modified()?,
            });
        }

        for name in &self.files {
            let source = self.dir.join(name);
            let metadata = fs::metadata(&source)?;
            entries.push(TreeEntry {
                path: self.relative.join(name),
                source,
                kind: EntryKind::File,
                is_empty: false,
                size: metadata.len(),
                modified: metadata.modified()?,
            });
        }

        Ok(entries)
    }
}

/// Kind of a [`TreeEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file (or symlink to one).
    File,
    /// Directory.
    Directory,
}

/// One node that produces an archive member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Path relative to the walk root.
    pub path: PathBuf,
    /// Path on disk.
    pub source: PathBuf,
    /// File or directory.
    pub kind: EntryKind,
    /// `true` only for a directory with no files and no subdirectories.
    pub is_empty: bool,
    /// Size in bytes; 0 for directories.
    pub size: u64,
    /// Modification time.
    pub modified: SystemTime,
}

/// Depth-first, parent-before-children directory iterator.
///
/// Entries within a directory are sorted by name, so traversal order is
/// deterministic. Symlinks to directories are never followed.
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::walker::TreeWalker;
///
/// for node in TreeWalker::new("la_station").prune(["target"]) {
///     let node = node?;
///     println!("{}: {} files", node.dir.display(), node.files.len());
/// }
/// # Ok::<(), dirpack_core::ArchiveError>(())
/// ```
#[derive(Debug)]
pub struct TreeWalker {
    root: PathBuf,
    stack: Vec<PathBuf>,
    pruned: Vec<OsString>,
    include_hidden: bool,
}

impl TreeWalker {
    /// Creates a walker rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            stack: vec![root.clone()],
            root,
            pruned: Vec::new(),
            include_hidden: true,
        }
    }

    /// Skips directories with any of the given names. Pruned directories are
    /// neither descended into nor listed in their parent's `subdirs`.
    #[must_use]
    pub fn prune<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.pruned.extend(names.into_iter().map(Into::into));
        self
    }

    /// Sets whether entries whose name starts with `.` are reported.
    #[must_use]
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    fn is_hidden(name: &OsStr) -> bool {
        name.as_encoded_bytes().first() == Some(&b'.')
    }

    fn read_node(&self, dir: PathBuf) -> Result<DirNode> {
        let mut subdirs = Vec::new();
        let mut files = Vec::new();
        let mut other = Vec::new();

        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if !self.include_hidden && Self::is_hidden(&name) {
                continue;
            }

            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                if !self.pruned.contains(&name) {
                    subdirs.push(name);
                }
            } else if file_type.is_file() {
                files.push(name);
            } else if file_type.is_symlink() {
                match fs::metadata(entry.path()) {
                    Ok(target) if target.is_file() => files.push(name),
                    _ => other.push(name),
                }
            } else {
                other.push(name);
            }
        }

        subdirs.sort();
        files.sort();
        other.sort();

        let relative = dir.strip_prefix(&self.root).unwrap_or(&dir).to_path_buf();

        Ok(DirNode {
            dir,
            relative,
            subdirs,
            files,
            other,
        })
    }
}

impl Iterator for TreeWalker {
    type Item = Result<DirNode>;

    fn next(&mut self) -> Option<Self::Item> {
        let dir = self.stack.pop()?;
        let node = match self.read_node(dir) {
            Ok(node) => node,
            Err(e) => return Some(Err(e)),
        };

        for name in node.subdirs.iter().rev() {
            self.stack.push(node.dir.join(name));
        }

        Some(Ok(node))
    }
}

/// Yields every file under `root`, skipping directories named in
/// `exclude_dirs`. Paths are sorted by name within each directory.
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::walker::walk_files;
/// use std::path::Path;
///
/// for file in walk_files(Path::new("necessaire"), &[".git".to_string()]) {
///     println!("{}", file?.display());
/// }
/// # Ok::<(), dirpack_core::ArchiveError>(())
/// ```
pub fn walk_files<'a>(
    root: &Path,
    exclude_dirs: &'a [String],
) -> impl Iterator<Item = Result<PathBuf>> + use<'a> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !exclude_dirs
                    .iter()
                    .any(|name| entry.file_name() == OsStr::new(name))
        })
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(e) => Some(Err(std::io::Error::from(e).into())),
        })
}
