//! Chat history export to timestamped JSON files

use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use streamchat_application::{ExportError, HistoryExporter};
use tracing::info;

/// Writes snapshots as `chat_history_YYYYMMDD_HHMMSS.json` into a directory.
///
/// Never overwrites: a second export in the same second gets a numeric
/// suffix (`chat_history_20240101_120000_1.json`).
pub struct FileHistoryExporter {
    directory: PathBuf,
}

impl FileHistoryExporter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn file_name(at: DateTime<Local>) -> String {
        format!("chat_history_{}.json", at.format("%Y%m%d_%H%M%S"))
    }

    fn write_new(&self, snapshot: &str, at: DateTime<Local>) -> Result<PathBuf, ExportError> {
        let write_err = |path: &Path, source: io::Error| ExportError::Write {
            path: path.to_path_buf(),
            source,
        };

        std::fs::create_dir_all(&self.directory).map_err(|e| write_err(&self.directory, e))?;

        let stem = Self::file_name(at);
        let stem = stem.trim_end_matches(".json");
        let mut attempt = 0u32;
        loop {
            let name = match attempt {
                0 => format!("{}.json", stem),
                n => format!("{}_{}.json", stem, n),
            };
            let path = self.directory.join(name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(snapshot.as_bytes())
                        .map_err(|e| write_err(&path, e))?;
                    info!(path = %path.display(), bytes = snapshot.len(), "Chat history exported");
                    return Ok(path);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(write_err(&path, e)),
            }
        }
    }
}

impl HistoryExporter for FileHistoryExporter {
    fn export(&self, snapshot: &str) -> Result<PathBuf, ExportError> {
        self.write_new(snapshot, Local::now())
    }
}
