//! Unreadable-directory handling. Each test removes read permission from a
//! directory; a process that can still list it (root, CAP_DAC_OVERRIDE) skips
//! the test and prints a `SKIPPED` line on stderr. Run these as an
//! unprivileged user to exercise them.
#![cfg(unix)]

mod common;

use common::{allow, create_fixture, deny, parse_rows};
use cloudtree::filter::FilterSet;
use cloudtree::index::write_index;
use cloudtree::snapshot::{run_snapshot, SnapshotRequest};
use cloudtree::tree::collect_entries;
use tempfile::TempDir;

#[test]
fn tree_walk_completes_past_denied_directory() {
    let tmp = create_fixture(&["forbidden/secret.txt", "open/visible.txt", "sibling.txt"]);
    let forbidden = tmp.path().join("forbidden");
    if !deny(&forbidden) {
        return;
    }

    let (entries, denied) = collect_entries(tmp.path(), 0, &FilterSet::default());
    allow(&forbidden);

    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert!(denied);
    assert!(names.contains(&"forbidden"), "denied dir itself is still listed");
    assert!(!names.contains(&"secret.txt"));
    assert!(names.contains(&"visible.txt"));
    assert!(names.contains(&"sibling.txt"));
}

#[test]
fn index_walk_completes_past_denied_directory() {
    let tmp = create_fixture(&["forbidden/secret.txt", "open/visible.txt"]);
    let forbidden = tmp.path().join("forbidden");
    if !deny(&forbidden) {
        return;
    }

    let mut buf = Vec::new();
    let outcome = write_index(tmp.path(), &FilterSet::default(), &mut buf).unwrap();
    allow(&forbidden);

    let text = String::from_utf8(buf).unwrap();
    assert!(outcome.permission_denied);
    assert_eq!(outcome.files, 1);
    assert_eq!(parse_rows(&text).len(), 1);
    assert!(!text.contains("secret.txt"));
}

#[test]
fn excluded_denied_directory_does_not_raise_the_flag() {
    let tmp = create_fixture(&["mesh/secret.txt", "ok.txt"]);
    let mesh = tmp.path().join("mesh");
    if !deny(&mesh) {
        return;
    }

    let (_, tree_denied) = collect_entries(tmp.path(), 0, &FilterSet::default());
    let mut buf = Vec::new();
    let outcome = write_index(tmp.path(), &FilterSet::default(), &mut buf).unwrap();
    allow(&mesh);

    assert!(!tree_denied);
    assert!(!outcome.permission_denied);
}

#[test]
fn snapshot_result_carries_the_flag() {
    let tmp = create_fixture(&["forbidden/secret.txt", "keep.txt"]);
    let forbidden = tmp.path().join("forbidden");
    if !deny(&forbidden) {
        return;
    }

    let out = TempDir::new().unwrap();
    let result = run_snapshot(&SnapshotRequest::new(tmp.path(), out.path()), |_| {});
    allow(&forbidden);

    let result = result.unwrap();
    assert!(result.permission_error);
    assert_eq!(result.files_indexed, 1);
}
