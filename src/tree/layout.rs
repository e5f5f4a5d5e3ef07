use super::walk::RawEntry;
use super::TreeEntry;

/// Connector for a sibling that has more siblings after it.
pub const BRANCH: &str = "|-- ";
/// Connector for the last sibling in a directory.
pub const LAST_BRANCH: &str = "\\-- ";
/// Padding under an ancestor that has more siblings.
pub const CONTINUE: &str = "|   ";
/// Padding under an ancestor that was the last sibling.
pub const SPACER: &str = "    ";

/// Compute is_last flags and prefix strings for all entries.
pub(super) fn compute_tree_structure(raw: &[RawEntry]) -> Vec<TreeEntry> {
    let mut entries = Vec::with_capacity(raw.len());

    for (i, (depth, name, path, is_dir)) in raw.iter().enumerate() {
        entries.push(TreeEntry {
            name: name.clone(),
            path: path.clone(),
            depth: *depth,
            is_dir: *is_dir,
            is_last: is_last_sibling(raw, i),
            prefix: String::new(), // computed below
        });
    }

    compute_prefixes(&mut entries);
    entries
}

/// Determine if entry at index `i` is the last sibling in its parent group.
fn is_last_sibling(raw: &[RawEntry], i: usize) -> bool {
    let depth = raw[i].0;
    for next in &raw[i + 1..] {
        if next.0 == depth {
            return false;
        }
        if next.0 < depth {
            return true;
        }
        // deeper entries are our own descendants
    }
    true
}

/// Build the prefix for an entry at `depth` given the is_last flags of its
/// ancestors (index 0 = depth 1) and its own is_last flag.
pub fn ascii_prefix(ancestors_last: &[bool], is_last: bool) -> String {
    let mut prefix = String::with_capacity((ancestors_last.len() + 1) * 4);
    for &last in ancestors_last {
        prefix.push_str(if last { SPACER } else { CONTINUE });
    }
    prefix.push_str(if is_last { LAST_BRANCH } else { BRANCH });
    prefix
}

/// Fill in prefixes using a stack of ancestor is_last flags.
fn compute_prefixes(entries: &mut [TreeEntry]) {
    let mut ancestor_is_last: Vec<bool> = Vec::new();

    for entry in entries.iter_mut() {
        let depth = entry.depth;
        ancestor_is_last.truncate(depth.saturating_sub(1));
        while ancestor_is_last.len() < depth.saturating_sub(1) {
            ancestor_is_last.push(false);
        }

        entry.prefix = ascii_prefix(&ancestor_is_last, entry.is_last);
        ancestor_is_last.push(entry.is_last);
    }
}
