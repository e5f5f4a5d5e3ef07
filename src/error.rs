//! Error types for snapshot runs and the settings store.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Terminal failures of a snapshot run. Scan-time problems (denied or
/// vanished entries) are never errors; they only degrade the result.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Root is missing or not a directory.
    #[error("{}: not a directory or does not exist", .path.display())]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: Option<io::Error>,
    },

    /// Neither tree nor index output was requested.
    #[error("nothing to do: select the tree output, the index output, or both")]
    NothingRequested,

    /// The output directory could not be created.
    #[error("{}: cannot create output directory", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An output artifact could not be written.
    #[error("{}: cannot write output", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures of the persisted settings record.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("{}: cannot access settings", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: malformed settings", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no user configuration directory available")]
    NoConfigDir,
}
