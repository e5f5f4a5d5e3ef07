//! Renderer backed by the external `tree` utility.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::layout::{BRANCH, CONTINUE, LAST_BRANCH, SPACER};
use super::{RenderedTree, TreeRenderer};
use crate::filter::FilterSet;

const PERMISSION_MARKERS: &[&str] = &[
    "Permission denied",
    "Operation not permitted",
    "error opening dir",
];

/// `tree`'s ASCII connector for the last sibling.
const TREE_LAST_BRANCH: &str = "`-- ";

/// Runs the `tree` binary. Cannot express word rules; see [`super::select_renderer`].
#[derive(Debug, Clone)]
pub struct ExternalTreeRenderer {
    program: PathBuf,
}

impl ExternalTreeRenderer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Find `tree` on `PATH`.
    pub fn locate() -> Option<Self> {
        which::which("tree").ok().map(Self::new)
    }

    /// Arguments passed to `tree` for this root, depth and filter set.
    pub fn args(root: &Path, depth: usize, filters: &FilterSet) -> Vec<String> {
        let mut args = vec![
            root.display().to_string(),
            "-a".to_string(),
            "--noreport".to_string(),
            "--dirsfirst".to_string(),
            "--charset=ascii".to_string(),
            "--ignore-case".to_string(),
        ];
        if depth > 0 {
            args.push("-L".to_string());
            args.push(depth.to_string());
        }
        let pattern = filters.ignore_pattern();
        if !pattern.is_empty() {
            args.push("-I".to_string());
            args.push(pattern);
        }
        args
    }
}

impl TreeRenderer for ExternalTreeRenderer {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn render(&self, root: &Path, depth: usize, filters: &FilterSet) -> io::Result<RenderedTree> {
        let output = Command::new(&self.program)
            .args(Self::args(root, depth, filters))
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        // `tree` also exits non-zero after printing a listing with unreadable
        // entries; only a run that printed nothing counts as a failure.
        if !output.status.success() && stdout.trim().is_empty() {
            return Err(io::Error::other(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        let permission_denied = has_permission_marker(&stdout) || has_permission_marker(&stderr);

        Ok(RenderedTree {
            lines: stdout.lines().map(normalize_line).collect(),
            permission_denied,
        })
    }
}

fn has_permission_marker(text: &str) -> bool {
    PERMISSION_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Rewrite the connector chunks at the start of a `tree --charset=ascii` line
/// into the in-process glyphs. The name after the prefix is left untouched.
pub fn normalize_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    loop {
        if let Some(tail) = rest.strip_prefix(TREE_LAST_BRANCH) {
            out.push_str(LAST_BRANCH);
            rest = tail;
            break;
        }
        if let Some(tail) = rest.strip_prefix(BRANCH) {
            out.push_str(BRANCH);
            rest = tail;
            break;
        }
        if let Some(tail) = rest.strip_prefix(CONTINUE) {
            out.push_str(CONTINUE);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix(SPACER) {
            out.push_str(SPACER);
            rest = tail;
        } else {
            break;
        }
    }
    out.push_str(rest);
    out
}
