//! Human-readable reporting of a finished snapshot.

use std::path::Path;

use crate::snapshot::SnapshotResult;

const UNITS: &[&str] = &["B", "K", "M", "G", "T"];

/// Printed when any entry could not be read during the walk.
pub const PERMISSION_WARNING: &str =
    "warning: some entries could not be read; grant this terminal elevated filesystem access (e.g. Full Disk Access) to capture everything";

/// Format a byte count, dividing by 1024 per unit. Whole numbers up to
/// terabytes, one decimal place for petabytes.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{size:.0}{unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1}P")
}

fn size_or_unknown(bytes: Option<u64>) -> String {
    bytes.map(format_size).unwrap_or_else(|| "?".to_string())
}

/// Summary lines for stdout, one per produced artifact.
pub fn summary_lines(result: &SnapshotResult) -> Vec<String> {
    let mut lines = vec!["Done.".to_string()];
    if let Some(path) = &result.tree_path {
        lines.push(format!("Tree : {} ({})", display(path), size_or_unknown(result.tree_size)));
    }
    if let Some(path) = &result.index_path {
        lines.push(format!(
            "Index: {} ({}, {} files)",
            display(path),
            size_or_unknown(result.index_size),
            result.files_indexed
        ));
    }
    lines
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn sizes_use_binary_units() {
        assert_eq!(format_size(0), "0B");
        assert_eq!(format_size(1023), "1023B");
        assert_eq!(format_size(1024), "1K");
        assert_eq!(format_size(1536), "2K");
        assert_eq!(format_size(5 * 1024 * 1024), "5M");
        assert_eq!(format_size(3 * 1024_u64.pow(4)), "3T");
    }

    #[test]
    fn petabytes_get_one_decimal() {
        assert_eq!(format_size(1024_u64.pow(5)), "1.0P");
        assert_eq!(format_size(1024_u64.pow(5) * 3 / 2), "1.5P");
    }

    #[test]
    fn summary_lists_only_produced_artifacts() {
        let result = SnapshotResult {
            index_path: Some(PathBuf::from("/out/x.tsv")),
            index_size: Some(2048),
            files_indexed: 7,
            ..SnapshotResult::default()
        };
        assert_eq!(
            summary_lines(&result),
            vec!["Done.".to_string(), "Index: /out/x.tsv (2K, 7 files)".to_string()]
        );
    }
}
