//! Persisted last-used values and per-user default locations.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;

const APP_DIR: &str = "cloudtree";
const CONFIG_FILE: &str = "config.json";

/// Last-used values of a run, as stored in `config.json`.
///
/// Missing fields deserialize to `None`/`false`, so older or hand-edited
/// files still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub root: Option<PathBuf>,
    pub label: Option<String>,
    pub out_dir: Option<PathBuf>,
    pub depth: Option<usize>,
    pub suffix: Option<String>,
    pub exclude_exts: Option<String>,
    pub exclude_words: Option<String>,
    pub tree: Option<bool>,
    pub index: Option<bool>,
    pub remember_settings: bool,
}

impl Settings {
    /// The record written by `--forget`: nothing remembered.
    pub fn forgotten() -> Self {
        Self::default()
    }

    /// Read settings from `path`. A missing file is an empty record.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`Settings::load`], but an unreadable or corrupt file is logged and
    /// treated as empty.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring stored settings");
            Self::default()
        })
    }

    /// Write settings as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut text = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        text.push('\n');
        fs::write(path, text).map_err(io_err)
    }

    /// Stored values apply only when the user opted in to remembering them.
    pub fn active(&self) -> Option<&Self> {
        self.remember_settings.then_some(self)
    }
}

/// `<config dir>/cloudtree/config.json`.
pub fn default_config_path() -> Result<PathBuf, SettingsError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
        .ok_or(SettingsError::NoConfigDir)
}

/// Where snapshots go when no output directory is given:
/// `<documents>/CloudTree/snapshots`, else `<local data>/cloudtree/snapshots`,
/// else `./snapshots`.
pub fn default_output_dir() -> PathBuf {
    if let Some(docs) = dirs::document_dir() {
        return docs.join("CloudTree").join("snapshots");
    }
    if let Some(data) = dirs::data_local_dir() {
        return data.join(APP_DIR).join("snapshots");
    }
    PathBuf::from("snapshots")
}
