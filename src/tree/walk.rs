use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::layout::compute_tree_structure;
use super::{RenderedTree, TreeEntry, TreeRenderer};
use crate::filter::FilterSet;

/// Raw entry data collected during filesystem traversal, before layout computation.
pub(super) type RawEntry = (usize, String, PathBuf, bool);

/// In-process renderer built on `walkdir`. Supports every filter rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkRenderer;

impl TreeRenderer for WalkRenderer {
    fn name(&self) -> &'static str {
        "walk"
    }

    fn render(&self, root: &Path, depth: usize, filters: &FilterSet) -> io::Result<RenderedTree> {
        let (entries, permission_denied) = collect_entries(root, depth, filters);
        let mut lines = Vec::with_capacity(entries.len() + 1);
        lines.push(root.display().to_string());
        lines.extend(entries.iter().map(TreeEntry::line));
        Ok(RenderedTree {
            lines,
            permission_denied,
        })
    }
}

/// Walk `root` and return the surviving entries in display order, with
/// prefixes computed, plus whether any directory could not be listed for lack
/// of permission.
pub fn collect_entries(root: &Path, depth: usize, filters: &FilterSet) -> (Vec<TreeEntry>, bool) {
    let mut walker = WalkDir::new(root).follow_links(false).sort_by(sort_cmp);
    if depth > 0 {
        walker = walker.max_depth(depth);
    }

    // filter_entry prunes excluded directories instead of just hiding them.
    let iter = walker.into_iter().filter_entry(|entry| {
        if entry.depth() == 0 {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        if entry.file_type().is_dir() {
            !filters.is_excluded_directory(&name)
        } else {
            !filters.is_excluded_file(&name)
        }
    });

    let mut raw_entries: Vec<RawEntry> = Vec::new();
    let mut permission_denied = false;

    for entry_result in iter {
        match entry_result {
            Ok(entry) => {
                let depth = entry.depth();
                if depth == 0 {
                    continue;
                }
                raw_entries.push((
                    depth,
                    entry.file_name().to_string_lossy().to_string(),
                    entry.path().to_path_buf(),
                    entry.file_type().is_dir(),
                ));
            }
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                match e.io_error().map(io::Error::kind) {
                    Some(io::ErrorKind::PermissionDenied) => {
                        tracing::warn!(path = %path.display(), "permission denied, skipping");
                        permission_denied = true;
                    }
                    Some(io::ErrorKind::NotFound) => {
                        tracing::debug!(path = %path.display(), "vanished during walk");
                    }
                    _ => {
                        tracing::warn!(path = %path.display(), error = %e, "unreadable, skipping");
                    }
                }
            }
        }
    }

    (compute_tree_structure(&raw_entries), permission_denied)
}

/// Directories first, then case-insensitive alpha; raw name breaks ties.
fn sort_cmp(a: &DirEntry, b: &DirEntry) -> Ordering {
    let a_is_dir = a.file_type().is_dir();
    let b_is_dir = b.file_type().is_dir();

    if a_is_dir != b_is_dir {
        return if a_is_dir {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    let a_name = a.file_name().to_string_lossy();
    let b_name = b.file_name().to_string_lossy();

    a_name
        .to_lowercase()
        .cmp(&b_name.to_lowercase())
        .then_with(|| a_name.cmp(&b_name))
}
