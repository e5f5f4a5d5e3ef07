//! Snapshot orchestration: output naming, phases, and result aggregation.

use chrono::Local;
use crossbeam_channel::Sender;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crate::error::SnapshotError;
use crate::filter::FilterSet;
use crate::index::write_index_file;
use crate::settings::Settings;
use crate::tree::{select_renderer, write_tree};

/// Suffix tag used when none is given.
pub const DEFAULT_SUFFIX: &str = "FILTERED";

/// Second-granularity, lexicographically sortable.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Which artifacts to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outputs {
    pub tree: bool,
    pub index: bool,
}

impl Default for Outputs {
    fn default() -> Self {
        Self {
            tree: true,
            index: true,
        }
    }
}

/// Everything one snapshot run needs.
#[derive(Debug, Clone)]
pub struct SnapshotRequest {
    pub root: PathBuf,
    pub out_dir: PathBuf,
    /// Empty means the root's final path component.
    pub label: String,
    pub suffix: String,
    /// 0 = unlimited. Applies to the tree only; the index always walks fully.
    pub depth: usize,
    pub outputs: Outputs,
    pub filters: FilterSet,
    /// Use the external `tree` binary when possible.
    pub prefer_external: bool,
    /// Raw filter text as the user typed it, kept for [`SnapshotRequest::settings`].
    pub exclude_exts_text: Option<String>,
    pub exclude_words_text: Option<String>,
}

impl SnapshotRequest {
    /// A request with default filters, both outputs, and no depth limit.
    pub fn new(root: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            out_dir: out_dir.into(),
            label: String::new(),
            suffix: DEFAULT_SUFFIX.to_string(),
            depth: 0,
            outputs: Outputs::default(),
            filters: FilterSet::default(),
            prefer_external: false,
            exclude_exts_text: None,
            exclude_words_text: None,
        }
    }

    /// Values worth persisting after a successful run.
    pub fn settings(&self) -> Settings {
        Settings {
            root: Some(self.root.clone()),
            label: (!self.label.is_empty()).then(|| self.label.clone()),
            out_dir: Some(self.out_dir.clone()),
            depth: Some(self.depth),
            suffix: Some(self.suffix.clone()),
            exclude_exts: self.exclude_exts_text.clone(),
            exclude_words: self.exclude_words_text.clone(),
            tree: Some(self.outputs.tree),
            index: Some(self.outputs.index),
            remember_settings: true,
        }
    }
}

/// Outcome of a completed run. Sizes are in bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotResult {
    pub tree_path: Option<PathBuf>,
    pub tree_size: Option<u64>,
    pub index_path: Option<PathBuf>,
    pub index_size: Option<u64>,
    pub files_indexed: u64,
    pub permission_error: bool,
}

/// Messages from a background snapshot worker.
#[derive(Debug)]
pub enum SnapshotEvent {
    Progress(String),
    Finished(Result<SnapshotResult, SnapshotError>),
    /// Sent by the caller's Ctrl-C handler, never by the worker.
    Interrupted,
}

/// Canonical root, or [`SnapshotError::InvalidRoot`].
pub fn validate_root(root: &Path) -> Result<PathBuf, SnapshotError> {
    let resolved = root.canonicalize().map_err(|source| SnapshotError::InvalidRoot {
        path: root.to_path_buf(),
        source: Some(source),
    })?;
    if !resolved.is_dir() {
        return Err(SnapshotError::InvalidRoot {
            path: resolved,
            source: None,
        });
    }
    Ok(resolved)
}

/// Make a label safe to embed in a file name.
pub fn sanitize_label(label: &str) -> String {
    label
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' || c.is_control() { '_' } else { c })
        .collect()
}

/// `{label}_tree_{suffix}_{ts}.txt` and `{label}_files_index_{suffix}_{ts}.tsv`.
pub fn output_paths(out_dir: &Path, label: &str, suffix: &str, timestamp: &str) -> (PathBuf, PathBuf) {
    (
        out_dir.join(format!("{label}_tree_{suffix}_{timestamp}.txt")),
        out_dir.join(format!("{label}_files_index_{suffix}_{timestamp}.tsv")),
    )
}

pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Run one snapshot synchronously, reporting coarse milestones to `progress`.
///
/// Setup errors (bad root, nothing requested, output directory) are returned
/// before anything is written. Scan problems only set
/// [`SnapshotResult::permission_error`].
pub fn run_snapshot<P>(request: &SnapshotRequest, mut progress: P) -> Result<SnapshotResult, SnapshotError>
where
    P: FnMut(&str),
{
    let root = validate_root(&request.root)?;
    if !request.outputs.tree && !request.outputs.index {
        return Err(SnapshotError::NothingRequested);
    }

    fs::create_dir_all(&request.out_dir).map_err(|source| SnapshotError::OutputDir {
        path: request.out_dir.clone(),
        source,
    })?;

    let label = match sanitize_label(&request.label) {
        label if label.is_empty() => root
            .file_name()
            .map(|name| sanitize_label(&name.to_string_lossy()))
            .unwrap_or_else(|| "root".to_string()),
        label => label,
    };
    let suffix = match sanitize_label(&request.suffix) {
        suffix if suffix.is_empty() => DEFAULT_SUFFIX.to_string(),
        suffix => suffix,
    };
    let (tree_path, index_path) = output_paths(&request.out_dir, &label, &suffix, &timestamp_now());

    let mut result = SnapshotResult::default();

    progress("Starting scan...");
    tracing::info!(root = %root.display(), out_dir = %request.out_dir.display(), "snapshot started");

    if request.outputs.tree {
        progress("Writing tree...");
        let renderer = select_renderer(request.prefer_external, &request.filters);
        tracing::info!(renderer = renderer.name(), path = %tree_path.display(), "writing tree");
        let outcome = write_tree(renderer.as_ref(), &root, &tree_path, request.depth, &request.filters)
            .map_err(|source| SnapshotError::Write {
                path: tree_path.clone(),
                source,
            })?;
        result.tree_size = Some(outcome.bytes);
        result.tree_path = Some(tree_path);
        result.permission_error |= outcome.permission_denied;
    }

    if request.outputs.index {
        progress("Writing TSV...");
        tracing::info!(path = %index_path.display(), "writing index");
        let (outcome, bytes) = write_index_file(&root, &index_path, &request.filters).map_err(|source| {
            SnapshotError::Write {
                path: index_path.clone(),
                source,
            }
        })?;
        result.files_indexed = outcome.files;
        result.index_size = Some(bytes);
        result.index_path = Some(index_path);
        result.permission_error |= outcome.permission_denied;
    }

    progress("Done");
    tracing::info!(
        files = result.files_indexed,
        permission_error = result.permission_error,
        "snapshot finished"
    );
    Ok(result)
}

/// Run a snapshot on a worker thread, forwarding progress and the outcome to
/// `events`. Dropping the receiver early is fine; sends are best-effort.
pub fn spawn(request: SnapshotRequest, events: Sender<SnapshotEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        let result = run_snapshot(&request, |msg| {
            let _ = events.send(SnapshotEvent::Progress(msg.to_string()));
        });
        let _ = events.send(SnapshotEvent::Finished(result));
    })
}
