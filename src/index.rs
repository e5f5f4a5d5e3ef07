//! Tab-separated index of surviving files: `path\tsize\tmtime`.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use walkdir::WalkDir;

use crate::filter::FilterSet;

/// Counters from one index walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexOutcome {
    /// Rows written.
    pub files: u64,
    pub permission_denied: bool,
}

/// Replace tabs, newlines and carriage returns so a path stays one TSV field.
pub fn sanitize_path(path: &str) -> String {
    path.replace(['\t', '\n', '\r'], " ")
}

/// One index row, newline included.
pub fn format_row(path: &Path, size: u64, mtime: i64) -> String {
    format!("{}\t{}\t{}\n", sanitize_path(&path.to_string_lossy()), size, mtime)
}

/// Whole seconds since the Unix epoch, truncated toward zero.
pub fn epoch_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
        Err(before) => -i64::try_from(before.duration().as_secs()).unwrap_or(i64::MAX),
    }
}

/// Walk `root`, pruning excluded directories and skipping excluded files, and
/// write one row per surviving file to `writer`.
///
/// Scan errors never abort the walk; only a failure to write does.
pub fn write_index<W: Write>(root: &Path, filters: &FilterSet, writer: &mut W) -> io::Result<IndexOutcome> {
    let walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
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

    let mut outcome = IndexOutcome::default();

    for entry_result in iter {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                match e.io_error().map(io::Error::kind) {
                    Some(io::ErrorKind::PermissionDenied) => {
                        tracing::warn!(path = %path.display(), "permission denied, skipping");
                        outcome.permission_denied = true;
                    }
                    Some(io::ErrorKind::NotFound) => {
                        tracing::debug!(path = %path.display(), "vanished during walk");
                    }
                    _ => tracing::warn!(path = %path.display(), error = %e, "unreadable, skipping"),
                }
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "vanished before stat");
                continue;
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                tracing::warn!(path = %path.display(), "permission denied on stat, skipping");
                outcome.permission_denied = true;
                continue;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "stat failed, skipping");
                continue;
            }
        };

        // symlinks are never descended, and a link to a directory is not a file
        if meta.is_dir() {
            tracing::debug!(path = %path.display(), "symlink to directory, not indexed");
            continue;
        }

        let mtime = meta.modified().map(epoch_seconds).unwrap_or_else(|e| {
            tracing::debug!(path = %path.display(), error = %e, "no modification time");
            0
        });

        writer.write_all(format_row(path, meta.len(), mtime).as_bytes())?;
        outcome.files += 1;
    }

    writer.flush()?;
    Ok(outcome)
}

/// Write the index for `root` to the file `out`, returning the walk outcome
/// and the file's final size in bytes.
pub fn write_index_file(root: &Path, out: &Path, filters: &FilterSet) -> io::Result<(IndexOutcome, u64)> {
    let mut writer = BufWriter::new(File::create(out)?);
    let outcome = write_index(root, filters, &mut writer)?;
    drop(writer);
    let bytes = fs::metadata(out)?.len();
    Ok((outcome, bytes))
}
