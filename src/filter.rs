//! Exclusion rules shared by the tree renderer and the index writer.

use std::collections::BTreeSet;
use std::path::Path;

/// Extensions skipped when the user supplies no override (3D meshes and point clouds).
pub const DEFAULT_EXCLUDED_EXTS: &[&str] = &[
    "udsmesh", "uds", "obj", "fbx", "stl", "gltf", "glb", "ply", "las", "laz", "e57", "rcp", "rcs",
];
pub const DEFAULT_EXCLUDED_BASENAMES: &[&str] = &[".ds_store"];
pub const DEFAULT_EXCLUDED_DIRNAMES: &[&str] = &["mesh", "meshes"];
pub const DEFAULT_EXCLUDED_DIR_PREFIXES: &[&str] = &["pointcloud", "point cloud"];

/// Normalized, case-insensitive exclusion rules for one snapshot run.
///
/// Every stored string is trimmed and lowercased. An entry is excluded when it
/// matches any rule; rules never combine with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    excluded_exts: BTreeSet<String>,
    excluded_basenames: BTreeSet<String>,
    excluded_dirnames: BTreeSet<String>,
    excluded_dir_prefixes: Vec<String>,
    excluded_words: BTreeSet<String>,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            excluded_exts: normalize_exts(DEFAULT_EXCLUDED_EXTS.iter().copied()),
            excluded_basenames: normalize_words(DEFAULT_EXCLUDED_BASENAMES.iter().copied()),
            excluded_dirnames: normalize_words(DEFAULT_EXCLUDED_DIRNAMES.iter().copied()),
            excluded_dir_prefixes: normalize_prefixes(DEFAULT_EXCLUDED_DIR_PREFIXES.iter().copied()),
            excluded_words: BTreeSet::new(),
        }
    }
}

impl FilterSet {
    /// A filter set with no rules at all.
    pub fn empty() -> Self {
        Self {
            excluded_exts: BTreeSet::new(),
            excluded_basenames: BTreeSet::new(),
            excluded_dirnames: BTreeSet::new(),
            excluded_dir_prefixes: Vec::new(),
            excluded_words: BTreeSet::new(),
        }
    }

    /// Defaults, with the extension and word groups replaced by free-text
    /// overrides when given. `Some("")` disables a group.
    pub fn from_overrides(exts: Option<&str>, words: Option<&str>) -> Self {
        let mut filters = Self::default();
        if let Some(text) = exts {
            filters.excluded_exts = parse_exclude_exts(text);
        }
        if let Some(text) = words {
            filters.excluded_words = parse_exclude_words(text);
        }
        filters
    }

    pub fn with_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_exts = normalize_exts(exts);
        self
    }

    pub fn with_basenames<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_basenames = normalize_words(names);
        self
    }

    pub fn with_dirnames<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_dirnames = normalize_words(names);
        self
    }

    pub fn with_dir_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_dir_prefixes = normalize_prefixes(prefixes);
        self
    }

    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_words = normalize_words(words);
        self
    }

    pub fn excluded_exts(&self) -> &BTreeSet<String> {
        &self.excluded_exts
    }

    pub fn excluded_words(&self) -> &BTreeSet<String> {
        &self.excluded_words
    }

    /// Whether any substring rule is active. Such rules have no glob form.
    pub fn has_word_rules(&self) -> bool {
        !self.excluded_words.is_empty()
    }

    /// True if a directory with this name must be skipped (and not descended).
    pub fn is_excluded_directory(&self, name: &str) -> bool {
        let name = name.trim().to_lowercase();
        if self.excluded_dirnames.contains(&name) {
            return true;
        }
        if self
            .excluded_dir_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
        {
            return true;
        }
        self.contains_word(&name)
    }

    /// True if a non-directory entry with this name must be skipped.
    pub fn is_excluded_file(&self, name: &str) -> bool {
        let lowered = name.trim().to_lowercase();
        if self.excluded_basenames.contains(&lowered) {
            return true;
        }
        if let Some(ext) = extension_of(name) {
            if !ext.is_empty() && self.excluded_exts.contains(&ext) {
                return true;
            }
        }
        self.contains_word(&lowered)
    }

    fn contains_word(&self, lowered: &str) -> bool {
        self.excluded_words
            .iter()
            .any(|word| lowered.contains(word.as_str()))
    }

    /// Translate the extension, basename, dirname and prefix rules into the
    /// `|`-separated glob list accepted by `tree -I`.
    ///
    /// Word rules are not part of the pattern. Rule text containing `|` cannot
    /// be expressed and is skipped. `tree` matches every glob against files as
    /// well as directories, so dirname and prefix rules also hide files there
    /// (`pointcloud_notes.txt`), which the in-process walk keeps.
    pub fn ignore_pattern(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        let mut skipped = Vec::new();

        let mut push = |raw: &str, glob: String| {
            if raw.contains('|') {
                skipped.push(raw.to_string());
            } else if !parts.contains(&glob) {
                parts.push(glob);
            }
        };

        for ext in &self.excluded_exts {
            push(ext, format!("*.{}", globset::escape(ext)));
        }
        for name in &self.excluded_basenames {
            push(name, globset::escape(name));
        }
        for name in &self.excluded_dirnames {
            push(name, globset::escape(name));
        }
        for prefix in &self.excluded_dir_prefixes {
            push(prefix, format!("{}*", globset::escape(prefix)));
        }

        if !skipped.is_empty() {
            tracing::warn!(rules = ?skipped, "rules containing '|' cannot be passed to tree, skipped");
        }
        parts.join("|")
    }
}

/// Split extension text on whitespace, commas and semicolons.
pub fn parse_exclude_exts(text: &str) -> BTreeSet<String> {
    normalize_exts(text.split(|c: char| c.is_whitespace() || c == ',' || c == ';'))
}

/// Split word text on commas, semicolons and newlines. Inner spaces are kept.
pub fn parse_exclude_words(text: &str) -> BTreeSet<String> {
    normalize_words(text.split([',', ';', '\n']))
}

fn normalize_exts<I, S>(items: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| {
            let lowered = item.as_ref().trim().to_lowercase();
            match lowered.strip_prefix('.') {
                Some(rest) => rest.to_string(),
                None => lowered,
            }
        })
        .filter(|ext| !ext.is_empty())
        .collect()
}

fn normalize_words<I, S>(items: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}

fn normalize_prefixes<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let prefix = item.as_ref().trim().to_lowercase();
        if !prefix.is_empty() && !out.contains(&prefix) {
            out.push(prefix);
        }
    }
    out
}

/// Lowercased text after the final dot. Dotfiles without another dot have none.
fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}
