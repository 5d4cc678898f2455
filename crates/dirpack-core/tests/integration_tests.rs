//! Integration tests for dirpack-core.
//!
//! These tests archive and extract real directory trees on disk.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use dirpack_core::ArchiveConfig;
use dirpack_core::ArchiveError;
use dirpack_core::ArchiveFormat;
use dirpack_core::archive;
use dirpack_core::extract;
use dirpack_core::inspect::MemberKind;
use dirpack_core::list_members;
use dirpack_core::walker::walk_files;
use filetime::FileTime;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;
use walkdir::WalkDir;

const FORMATS: [ArchiveFormat; 2] = [ArchiveFormat::Zip, ArchiveFormat::Tgz];

/// 1995-12-05 08:56:03 UTC
const LA_STATION_MTIME: i64 = 818_153_763;

fn archive_to(source: &Path, out: &Path, format: ArchiveFormat) -> PathBuf {
    let archive_path = out.join(format!("archive{}", format.extension()));
    archive(
        Some(source),
        Some(&archive_path),
        format,
        &ArchiveConfig::default(),
    )
    .unwrap();
    archive_path
}

fn directories(root: &Path) -> BTreeSet<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(Result::unwrap)
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect()
}

fn files(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    walk_files(root, &[])
        .map(Result::unwrap)
        .map(|p| {
            let content = fs::read(&p).unwrap();
            (p.strip_prefix(root).unwrap().to_path_buf(), content)
        })
        .collect()
}

fn mtime(path: &Path) -> i64 {
    FileTime::from_last_modification_time(&fs::metadata(path).unwrap()).unix_seconds()
}

fn set_mtime(path: &Path, seconds: i64) {
    filetime::set_file_mtime(path, FileTime::from_unix_time(seconds, 0)).unwrap();
}

/// File contents of the `la_station` tree; `stipat` is left empty.
const LA_STATION_CONTENT: [(&str, &str); 6] = [
    ("scirit", "tellus. Phasellus posuere,"),
    ("possible/existit", "sit"),
    ("possible/publici/stipat", ""),
    ("possible/publici/porcus", "rutrum risus. Nullam consectetur"),
    ("possible/publici/elephanti", "Nam pretium justo nec magna"),
    ("possible/publici/ultimo", "odio"),
];

fn build_la_station(root: &Path) -> PathBuf {
    let source = root.join("la_station");
    for (name, content) in LA_STATION_CONTENT {
        let path = source.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
    }
    set_mtime(&source.join("scirit"), LA_STATION_MTIME);
    source
}

#[test]
fn test_la_station_round_trip() {
    for format in FORMATS {
        let temp = TempDir::new().unwrap();
        let source = build_la_station(temp.path());
        let expected_dirs = directories(&source);
        let archive_path = temp.path().join(format!("la_station{}", format.extension()));
        archive(
            Some(&source),
            Some(&archive_path),
            format,
            &ArchiveConfig::default(),
        )
        .unwrap();

        fs::remove_dir_all(&source).unwrap();
        let report = extract(&archive_path, temp.path()).unwrap();
        assert_eq!(report.files_extracted, LA_STATION_CONTENT.len(), "{format}");

        for (name, content) in LA_STATION_CONTENT {
            assert_eq!(
                fs::read_to_string(source.join(name)).unwrap(),
                content,
                "{format}: {name}"
            );
        }
        assert_eq!(directories(&source), expected_dirs, "{format}");

        let delta = LA_STATION_MTIME - mtime(&source.join("scirit"));
        assert!((0..=1).contains(&delta), "{format}: mtime off by {delta}");
    }
}

#[test]
fn test_only_empty_subdirectories_round_trip() {
    for format in FORMATS {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("necessaire");
        for dir in ["reginae", "nulla", "possible/publici", "possible/mos"] {
            fs::create_dir_all(source.join(dir)).unwrap();
        }

        let out = TempDir::new().unwrap();
        let archive_path = archive_to(&source, out.path(), format);

        let dest = TempDir::new().unwrap();
        extract(&archive_path, dest.path()).unwrap();

        let restored = dest.path().join("necessaire");
        assert_eq!(directories(&restored), directories(&source), "{format}");
        assert!(files(&restored).is_empty(), "{format}");
    }
}

#[test]
fn test_mixed_tree_round_trip() {
    for format in FORMATS {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("mixed");
        fs::create_dir_all(source.join("a/b/empty")).unwrap();
        fs::create_dir_all(source.join("nulla")).unwrap();
        fs::write(source.join("a/kappa"), vec![0u8, 1, 2, 255]).unwrap();
        fs::write(source.join("a/b/aqua"), b"").unwrap();
        fs::write(source.join("scirit"), "x".repeat(200_000)).unwrap();

        let out = TempDir::new().unwrap();
        let archive_path = archive_to(&source, out.path(), format);

        let dest = TempDir::new().unwrap();
        let report = extract(&archive_path, dest.path()).unwrap();
        assert_eq!(report.files_extracted, 3, "{format}");

        let restored = dest.path().join("mixed");
        assert_eq!(files(&restored), files(&source), "{format}");
        assert_eq!(directories(&restored), directories(&source), "{format}");
    }
}

#[test]
fn test_file_mtimes_round_trip() {
    for format in FORMATS {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("times");
        fs::create_dir_all(source.join("sub")).unwrap();
        let stamps = [
            ("one", 1_000_000_000_i64),
            ("sub/two", 1_234_567_891),
            ("three", 1_600_000_001),
        ];
        for (name, seconds) in stamps {
            let path = source.join(name);
            fs::write(&path, name).unwrap();
            set_mtime(&path, seconds);
        }

        let out = TempDir::new().unwrap();
        let archive_path = archive_to(&source, out.path(), format);
        let dest = TempDir::new().unwrap();
        extract(&archive_path, dest.path()).unwrap();

        for (name, seconds) in stamps {
            let delta = seconds - mtime(&dest.path().join("times").join(name));
            assert!((0..=1).contains(&delta), "{format} {name}: off by {delta}");
        }
    }
}

#[test]
fn test_empty_directory_archive() {
    for format in FORMATS {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("nulla");
        fs::create_dir(&source).unwrap();

        let out = TempDir::new().unwrap();
        let archive_path = archive_to(&source, out.path(), format);
        assert!(fs::metadata(&archive_path).unwrap().len() > 0);

        let dest = TempDir::new().unwrap();
        extract(&archive_path, dest.path()).unwrap();
        let restored = dest.path().join("nulla");
        assert!(restored.is_dir(), "{format}");
        assert_eq!(fs::read_dir(&restored).unwrap().count(), 0, "{format}");
    }
}

#[test]
fn test_zip_listing_marks_empty_directories() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("la_station");
    fs::create_dir_all(source.join("nulla")).unwrap();
    fs::write(source.join("scirit"), "scirit").unwrap();

    let out = TempDir::new().unwrap();
    let archive_path = archive_to(&source, out.path(), ArchiveFormat::Zip);

    let members = list_members(&archive_path).unwrap();
    let listed: Vec<(&str, MemberKind, u64)> = members
        .iter()
        .map(|m| (m.name.as_str(), m.kind, m.size))
        .collect();
    assert_eq!(
        listed,
        vec![
            ("la_station/scirit", MemberKind::File, 6),
            ("la_station/nulla/", MemberKind::EmptyDir, 0),
        ]
    );
}

#[test]
fn test_exclude_dirs_pruned() {
    for format in FORMATS {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("project");
        fs::create_dir_all(source.join(".git/objects")).unwrap();
        fs::write(source.join(".git/HEAD"), "ref").unwrap();
        fs::write(source.join("main.rs"), "fn main() {}").unwrap();

        let out = TempDir::new().unwrap();
        let archive_path = out.path().join(format!("project{}", format.extension()));
        let config = ArchiveConfig::default().with_exclude_dirs(vec![".git".to_string()]);
        let report = archive(Some(&source), Some(&archive_path), format, &config).unwrap();
        assert_eq!(report.files_added, 1);

        let dest = TempDir::new().unwrap();
        extract(&archive_path, dest.path()).unwrap();
        assert!(dest.path().join("project/main.rs").is_file());
        assert!(!dest.path().join("project/.git").exists(), "{format}");
    }
}

#[test]
fn test_failed_archive_leaves_destination_untouched() {
    for format in FORMATS {
        let temp = TempDir::new().unwrap();
        let archive_path = temp.path().join(format!("ripis{}", format.extension()));
        fs::write(&archive_path, b"previous archive").unwrap();

        let err = archive(
            Some(&temp.path().join("absent")),
            Some(&archive_path),
            format,
            &ArchiveConfig::default(),
        )
        .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(fs::read(&archive_path).unwrap(), b"previous archive");
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }
}

#[test]
fn test_archive_overwrites_existing_file() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("la_station");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("scirit"), "fresh").unwrap();
    let archive_path = temp.path().join("la_station.zip");
    fs::write(&archive_path, b"stale").unwrap();

    archive(
        Some(&source),
        Some(&archive_path),
        ArchiveFormat::Zip,
        &ArchiveConfig::default(),
    )
    .unwrap();

    let members = list_members(&archive_path).unwrap();
    assert_eq!(members.len(), 1);
    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers.len(), 2, "temp file left behind: {leftovers:?}");
}

#[test]
fn test_truncated_zip_is_corrupt() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("la_station");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("scirit"), "scirit".repeat(1000)).unwrap();
    let archive_path = archive_to(&source, temp.path(), ArchiveFormat::Zip);

    let bytes = fs::read(&archive_path).unwrap();
    fs::write(&archive_path, &bytes[..bytes.len() / 2]).unwrap();

    let err = extract(&archive_path, temp.path().join("out")).unwrap_err();
    assert!(err.is_corrupt(), "{err}");
}

#[test]
fn test_garbage_archives_are_corrupt() {
    for format in FORMATS {
        let temp = TempDir::new().unwrap();
        let archive_path = temp.path().join(format!("junk{}", format.extension()));
        fs::write(&archive_path, b"this is not an archive of any kind").unwrap();

        let err = extract(&archive_path, temp.path().join("out")).unwrap_err();
        assert!(err.is_corrupt(), "{format}: {err}");
    }
}

#[test]
fn test_missing_archive_is_not_found() {
    let temp = TempDir::new().unwrap();
    let err = extract(temp.path().join("quaerunt.zip"), temp.path()).unwrap_err();
    assert!(matches!(err, ArchiveError::NotFound { .. }));
}

#[test]
fn test_extract_detects_format_by_content() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("la_station");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("scirit"), "scirit").unwrap();
    let archive_path = archive_to(&source, temp.path(), ArchiveFormat::Tgz);

    let renamed = temp.path().join("backup.bin");
    fs::rename(&archive_path, &renamed).unwrap();

    let dest = temp.path().join("out");
    extract(&renamed, &dest).unwrap();
    assert_eq!(
        fs::read_to_string(dest.join("la_station/scirit")).unwrap(),
        "scirit"
    );
}
