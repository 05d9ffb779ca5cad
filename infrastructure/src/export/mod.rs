//! Chat history export to disk

mod file_exporter;

pub use file_exporter::FileHistoryExporter;
