//! Slash-command parsing for the chat REPL

use thiserror::Error;

/// A parsed slash command
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Help,
    Models,
    /// Switch model, or show the current one when no argument is given
    Model(Option<String>),
    Temperature(Option<f32>),
    TopP(Option<f32>),
    MaxTokens(Option<u32>),
    /// Edit the system prompt, or show it when no argument is given
    System(Option<String>),
    Settings,
    History,
    Export,
    Clear,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("{command} expects a number, got '{value}'")]
    InvalidNumber { command: &'static str, value: String },
}

impl ReplCommand {
    /// Parse a line starting with `/`.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim()).filter(|a| !a.is_empty())),
            None => (line, None),
        };

        let command = match name {
            "/quit" | "/exit" | "/q" => Self::Quit,
            "/help" | "/h" | "/?" => Self::Help,
            "/models" => Self::Models,
            "/model" => Self::Model(arg.map(str::to_string)),
            "/temperature" | "/temp" => Self::Temperature(parse_number("/temperature", arg)?),
            "/top_p" => Self::TopP(parse_number("/top_p", arg)?),
            "/max_tokens" => Self::MaxTokens(parse_number("/max_tokens", arg)?),
            "/system" => Self::System(arg.map(str::to_string)),
            "/settings" => Self::Settings,
            "/history" => Self::History,
            "/export" => Self::Export,
            "/clear" => Self::Clear,
            _ => return Err(CommandError::Unknown(name.to_string())),
        };
        Ok(command)
    }
}

fn parse_number<T: std::str::FromStr>(
    command: &'static str,
    arg: Option<&str>,
) -> Result<Option<T>, CommandError> {
    arg.map(|value| {
        value.parse().map_err(|_| CommandError::InvalidNumber {
            command,
            value: value.to_string(),
        })
    })
    .transpose()
}
