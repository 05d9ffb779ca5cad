//! Conversation transcript logging.
//!
//! Provides [`JsonlConversationLogger`], which appends chat events to a JSONL
//! file and implements the
//! [`ConversationLogger`](streamchat_application::ConversationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
