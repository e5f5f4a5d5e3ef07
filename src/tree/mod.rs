//! Filtered tree rendering: walking, layout, and the external `tree` fallback.

pub(crate) mod external;
mod layout;
pub(crate) mod walk;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::filter::FilterSet;

pub use external::ExternalTreeRenderer;
pub use layout::{ascii_prefix, BRANCH, CONTINUE, LAST_BRANCH, SPACER};
pub use walk::{collect_entries, WalkRenderer};

/// A single surviving entry in the rendered tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEntry {
    /// Display name (filename component only).
    pub name: String,
    /// Full filesystem path.
    pub path: PathBuf,
    /// Nesting depth (1 = direct child of root).
    pub depth: usize,
    /// Whether this entry is a real directory (symlinks never are).
    pub is_dir: bool,
    /// Whether this is the last sibling in its parent group.
    pub is_last: bool,
    /// Pre-computed ASCII connector prefix.
    pub prefix: String,
}

impl TreeEntry {
    pub fn line(&self) -> String {
        format!("{}{}", self.prefix, self.name)
    }
}

/// Lines produced by one renderer run, plus the walk's permission signal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedTree {
    /// First line is the root path; one line per surviving entry after it.
    pub lines: Vec<String>,
    pub permission_denied: bool,
}

impl RenderedTree {
    /// Newline-joined text with a trailing newline.
    pub fn to_text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// Result of writing a tree file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOutcome {
    pub bytes: u64,
    pub permission_denied: bool,
}

/// Anything that can turn a root directory into filtered tree lines.
///
/// `depth` of 0 means unlimited; N lists entries at level N without
/// expanding them.
pub trait TreeRenderer {
    fn name(&self) -> &'static str;
    fn render(&self, root: &Path, depth: usize, filters: &FilterSet) -> io::Result<RenderedTree>;
}

/// Pick the renderer for a run. The external tool is used only when preferred,
/// when no word rules are active, and when a `tree` binary is on `PATH`.
pub fn select_renderer(prefer_external: bool, filters: &FilterSet) -> Box<dyn TreeRenderer + Send> {
    if prefer_external && !filters.has_word_rules() {
        if let Some(renderer) = ExternalTreeRenderer::locate() {
            return Box::new(renderer);
        }
        tracing::debug!("no tree binary on PATH, using the in-process walk");
    } else if prefer_external {
        tracing::debug!("word filters are active, using the in-process walk");
    }
    Box::new(WalkRenderer)
}

/// Render `root` with `renderer` and write the text to `out`.
///
/// If the renderer itself fails (e.g. the external binary cannot start) the
/// in-process walk is used instead.
pub fn write_tree(
    renderer: &dyn TreeRenderer,
    root: &Path,
    out: &Path,
    depth: usize,
    filters: &FilterSet,
) -> io::Result<TreeOutcome> {
    let rendered = match renderer.render(root, depth, filters) {
        Ok(rendered) => rendered,
        Err(e) => {
            tracing::warn!(renderer = renderer.name(), error = %e, "renderer failed, falling back to in-process walk");
            WalkRenderer.render(root, depth, filters)?
        }
    };
    fs::write(out, rendered.to_text())?;
    let bytes = fs::metadata(out)?.len();
    Ok(TreeOutcome {
        bytes,
        permission_denied: rendered.permission_denied,
    })
}
