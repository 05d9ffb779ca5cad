//! History export port
//!
//! Delivers a serialized chat snapshot somewhere the user can pick it up
//! (a file on disk for the terminal front-end, a download in a browser).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to serialize chat history: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait HistoryExporter: Send + Sync {
    /// Persist `snapshot` and return where it went.
    fn export(&self, snapshot: &str) -> Result<PathBuf, ExportError>;
}
