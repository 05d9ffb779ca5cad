//! Export History use case
//!
//! Snapshots the conversation and hands it to a [`HistoryExporter`].
//! Exporting never mutates the session.

use crate::ports::history_exporter::{ExportError, HistoryExporter};
use std::path::PathBuf;
use std::sync::Arc;
use streamchat_domain::SessionStore;
use tracing::info;

pub struct ExportHistoryUseCase {
    exporter: Arc<dyn HistoryExporter>,
}

impl ExportHistoryUseCase {
    pub fn new(exporter: Arc<dyn HistoryExporter>) -> Self {
        Self { exporter }
    }

    pub fn execute(&self, store: &SessionStore) -> Result<PathBuf, ExportError> {
        let snapshot = store.export()?;
        let path = self.exporter.export(&snapshot)?;
        info!(messages = store.len(), path = %path.display(), "Exported chat history");
        Ok(path)
    }
}
