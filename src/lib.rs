#![forbid(unsafe_code)]
//! Filtered directory tree listings and TSV file indexes of a folder.

pub mod cli;
pub mod error;
pub mod filter;
pub mod index;
pub mod settings;
pub mod snapshot;
pub mod summary;
pub mod tree;

pub use error::{SettingsError, SnapshotError};
pub use filter::FilterSet;
pub use snapshot::{run_snapshot, SnapshotRequest, SnapshotResult};
