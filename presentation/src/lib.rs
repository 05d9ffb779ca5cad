//! Presentation layer for streamchat
//!
//! This crate contains CLI definitions, output formatters,
//! stream renderers, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, ChatSettings, ReplCommand};
pub use cli::commands::Cli;
pub use cli::prompt::prompt_api_key;
pub use config::ReplConfig;
pub use output::console::{CREDENTIAL_HINT, ConsoleFormatter};
pub use progress::reporter::{PlainStreamPrinter, STREAM_CURSOR, StreamRenderer};
