mod common;

use common::{canonical, create_fixture, parse_rows};
use cloudtree::filter::FilterSet;
use cloudtree::index::{epoch_seconds, write_index, write_index_file};
use std::fs;

fn index_text(root: &std::path::Path, filters: &FilterSet) -> (String, cloudtree::index::IndexOutcome) {
    let mut buf = Vec::new();
    let outcome = write_index(root, filters, &mut buf).unwrap();
    (String::from_utf8(buf).unwrap(), outcome)
}

#[test]
fn row_is_path_size_mtime() {
    let tmp = create_fixture(&[]);
    let root = canonical(&tmp);
    let file = root.join("data.bin");
    fs::write(&file, vec![7u8; 1234]).unwrap();
    let mtime = epoch_seconds(fs::metadata(&file).unwrap().modified().unwrap());

    let (text, outcome) = index_text(&root, &FilterSet::default());
    assert_eq!(text, format!("{}\t1234\t{}\n", file.display(), mtime));
    assert_eq!(outcome.files, 1);
    assert!(!outcome.permission_denied);
}

#[test]
fn default_filters_scenario() {
    let tmp = create_fixture(&["a.obj", "notes.txt", "mesh/keep.txt"]);
    let root = canonical(&tmp);
    let (text, outcome) = index_text(&root, &FilterSet::default());
    let rows = parse_rows(&text);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, root.join("notes.txt").display().to_string());
    assert_eq!(rows[0].1, "notes.txt".len() as u64);
    assert_eq!(outcome.files, 1);
}

#[test]
fn excluded_prefix_directories_are_pruned() {
    let tmp = create_fixture(&["pointcloud_scan/plain.txt", "pointcloud_scan/sub/deep.txt", "keep/ok.txt"]);
    let (text, _) = index_text(tmp.path(), &FilterSet::default());
    assert!(!text.contains("plain.txt"));
    assert!(!text.contains("deep.txt"));
    assert!(text.contains("ok.txt"));
}

#[test]
fn extension_match_is_whole_extension_only() {
    let tmp = create_fixture(&["x.OBJ", "x.objextra", "x.Las"]);
    let (text, outcome) = index_text(tmp.path(), &FilterSet::default());
    assert_eq!(outcome.files, 1);
    assert!(text.contains("x.objextra\t"));
}

#[test]
fn word_filter_prunes_directories_and_files() {
    let tmp = create_fixture(&["Draft_V2.txt", "mydraft.png", "old_drafts/a.txt", "final.txt"]);
    let filters = FilterSet::from_overrides(None, Some("draft"));
    let (text, _) = index_text(tmp.path(), &filters);
    let rows = parse_rows(&text);
    assert_eq!(rows.len(), 1);
    assert!(rows[0].0.ends_with("final.txt"));
}

#[test]
fn depth_does_not_limit_the_index() {
    let tmp = create_fixture(&["a/b/c/d/e.txt"]);
    let (text, outcome) = index_text(tmp.path(), &FilterSet::default());
    assert_eq!(outcome.files, 1);
    assert!(text.contains("e.txt"));
}

#[test]
fn rows_come_in_stable_name_order() {
    let tmp = create_fixture(&["c.txt", "a.txt", "b/inner.txt"]);
    let (first, _) = index_text(tmp.path(), &FilterSet::default());
    let (second, _) = index_text(tmp.path(), &FilterSet::default());
    assert_eq!(first, second);
    let names: Vec<String> = parse_rows(&first)
        .into_iter()
        .map(|(path, _, _)| path.rsplit('/').next().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["a.txt", "inner.txt", "c.txt"]);
}

#[test]
#[cfg(unix)]
fn control_characters_in_paths_become_spaces() {
    let tmp = create_fixture(&[]);
    fs::write(tmp.path().join("tab\there.txt"), "x").unwrap();
    fs::write(tmp.path().join("new\nline.txt"), "y").unwrap();
    let (text, outcome) = index_text(tmp.path(), &FilterSet::default());
    assert_eq!(outcome.files, 2);
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("tab here.txt\t1\t"));
    assert!(text.contains("new line.txt\t1\t"));
}

#[test]
#[cfg(unix)]
fn symlinks_to_directories_are_not_indexed_or_followed() {
    let tmp = create_fixture(&["real/inside.txt"]);
    std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("link")).unwrap();
    std::os::unix::fs::symlink(tmp.path().join("missing"), tmp.path().join("dangling")).unwrap();
    let (text, outcome) = index_text(tmp.path(), &FilterSet::default());
    assert_eq!(outcome.files, 1);
    let rows = parse_rows(&text);
    assert!(rows[0].0.ends_with("/real/inside.txt"));
    assert!(!outcome.permission_denied);
}

#[test]
#[cfg(unix)]
fn symlinks_to_files_report_target_size() {
    let tmp = create_fixture(&["target.txt"]);
    std::os::unix::fs::symlink(tmp.path().join("target.txt"), tmp.path().join("alias.txt")).unwrap();
    let (text, _) = index_text(tmp.path(), &FilterSet::default());
    let rows = parse_rows(&text);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|(_, size, _)| *size == "target.txt".len() as u64));
}

#[test]
fn write_index_file_reports_bytes() {
    let tmp = create_fixture(&["one.txt", "two.txt"]);
    let out_dir = tempfile::TempDir::new().unwrap();
    let out = out_dir.path().join("index.tsv");
    let (outcome, bytes) = write_index_file(tmp.path(), &out, &FilterSet::default()).unwrap();
    assert_eq!(outcome.files, 2);
    assert_eq!(bytes, fs::metadata(&out).unwrap().len());
    assert!(bytes > 0);
}

#[test]
fn empty_tree_gives_empty_index() {
    let tmp = create_fixture(&["only.obj", "mesh/"]);
    let (text, outcome) = index_text(tmp.path(), &FilterSet::default());
    assert!(text.is_empty());
    assert_eq!(outcome.files, 0);
}
