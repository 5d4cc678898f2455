//! Test utilities for building directory trees on disk.
//!
//! # Panics
//!
//! All functions in this module panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::fs;
use std::path::Path;

use filetime::FileTime;

/// Creates `files` (with their path as content) and empty `dirs` under
/// `root`. Intermediate directories are created as needed.
pub fn build_tree(root: &Path, files: &[&str], dirs: &[&str]) {
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, file.as_bytes()).unwrap();
    }
    for dir in dirs {
        fs::create_dir_all(root.join(dir)).unwrap();
    }
}

/// Sets the modification time of `path` to `seconds` since the epoch.
pub fn set_mtime(path: &Path, seconds: i64) {
    filetime::set_file_mtime(path, FileTime::from_unix_time(seconds, 0)).unwrap();
}

/// Returns the modification time of `path` in whole epoch seconds.
#[must_use]
pub fn mtime(path: &Path) -> i64 {
    FileTime::from_last_modification_time(&fs::metadata(path).unwrap()).unix_seconds()
}
