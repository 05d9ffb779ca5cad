//! Infrastructure layer for streamchat
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the HTTP completion gateway, configuration
//! file loading, transcript logging and history export.

pub mod completion;
pub mod config;
pub mod export;
pub mod logging;

// Re-export commonly used types
pub use completion::HttpCompletionGateway;
pub use config::{
    ConfigLoader, ConfigValidationError, FileChatConfig, FileConfig, FileExportConfig,
    FileLoggingConfig, FileProviderConfig, FileReplConfig,
};
pub use export::FileHistoryExporter;
pub use logging::JsonlConversationLogger;
