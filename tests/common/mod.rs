#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Create a directory structure from a list of relative paths.
/// Paths ending with '/' create directories; others create files whose
/// content is their own relative path.
pub fn create_fixture(paths: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for p in paths {
        let full = tmp.path().join(p);
        if p.ends_with('/') {
            fs::create_dir_all(&full).unwrap();
        } else {
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&full, p).unwrap();
        }
    }
    tmp
}

/// Canonical root so expected paths match what the library emits.
pub fn canonical(tmp: &TempDir) -> std::path::PathBuf {
    tmp.path().canonicalize().unwrap()
}

/// Names at a given tree depth, in display order.
pub fn names_at_depth(entries: &[cloudtree::tree::TreeEntry], depth: usize) -> Vec<String> {
    entries
        .iter()
        .filter(|e| e.depth == depth)
        .map(|e| e.name.clone())
        .collect()
}

/// Index rows split into (path, size, mtime) fields.
pub fn parse_rows(text: &str) -> Vec<(String, u64, i64)> {
    text.lines()
        .map(|line| {
            let fields: Vec<&str> = line.split('\t').collect();
            assert_eq!(fields.len(), 3, "malformed row: {line:?}");
            (
                fields[0].to_string(),
                fields[1].parse().unwrap(),
                fields[2].parse().unwrap(),
            )
        })
        .collect()
}

/// Make a directory unreadable. Returns false when the process can still list
/// it (e.g. running as root), in which case permission tests should bail out.
/// The skip is reported on stderr, visible with `--nocapture`.
#[cfg(unix)]
pub fn deny(dir: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(dir).is_ok() {
        allow(dir);
        let test = std::thread::current().name().unwrap_or("permission test").to_string();
        eprintln!("SKIPPED {test}: mode 000 is still readable (running as root?), nothing was checked");
        return false;
    }
    true
}

#[cfg(unix)]
pub fn allow(dir: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Write an executable shell script standing in for the `tree` binary.
#[cfg(unix)]
pub fn fake_tree(dir: &Path, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join("tree");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}
