//! Application layer for streamchat
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    completion_gateway::{CompletionError, CompletionGateway, CompletionRequest, StreamHandle},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    history_exporter::{ExportError, HistoryExporter},
    progress::{ChatProgressNotifier, NoChatProgress},
};
pub use use_cases::export_history::ExportHistoryUseCase;
pub use use_cases::submit_message::{
    SubmitError, SubmitMessageInput, SubmitMessageOutput, SubmitMessageUseCase,
};
