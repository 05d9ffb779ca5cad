//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface.

mod command;
mod repl;
mod settings;

pub use command::{CommandError, ReplCommand};
pub use repl::ChatRepl;
pub use settings::ChatSettings;
