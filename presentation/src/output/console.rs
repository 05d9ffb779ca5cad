//! Console output formatter for chat sessions

use colored::Colorize;
use std::path::Path;
use streamchat_application::SubmitError;
use streamchat_domain::{Message, Model, Role, SamplingConfig};

pub const USER_AVATAR: &str = "🧑‍💻";
pub const ASSISTANT_AVATAR: &str = "🤖";

/// Appended to errors caused by a rejected credential
pub const CREDENTIAL_HINT: &str = "Please check your API key.";

/// Formats chat output for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn avatar(role: Role) -> &'static str {
        match role {
            Role::User => USER_AVATAR,
            Role::Assistant => ASSISTANT_AVATAR,
            Role::System => "⚙️",
        }
    }

    pub fn message(message: &Message) -> String {
        format!("{} {}", Self::avatar(message.role), message.content)
    }

    pub fn assistant_line(text: &str) -> String {
        format!("{} {}", ASSISTANT_AVATAR, text)
    }

    /// Render transcript turns, as yielded by `SessionStore::visible_messages`
    pub fn transcript<'a>(messages: impl IntoIterator<Item = &'a Message>) -> String {
        let lines: Vec<String> = messages.into_iter().map(Self::message).collect();

        if lines.is_empty() {
            return format!("{}", "(no messages yet)".dimmed());
        }
        lines.join("\n\n")
    }

    /// Inline error line, with the credential hint when it applies
    pub fn submit_error(error: &SubmitError) -> String {
        let mut output = format!("{} {}", "Error:".red().bold(), error);
        if error.is_invalid_credential() {
            output.push_str(&format!("\n{}", CREDENTIAL_HINT.yellow()));
        }
        output
    }

    pub fn settings(sampling: &SamplingConfig, system_prompt: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", "Settings".cyan().bold()));
        output.push_str(&format!(
            "  {:<14}{} ({})\n",
            "model",
            sampling.model.display_name(),
            sampling.model.as_str().dimmed()
        ));
        output.push_str(&format!("  {:<14}{}\n", "temperature", sampling.temperature));
        output.push_str(&format!("  {:<14}{}\n", "top_p", sampling.top_p));
        output.push_str(&format!("  {:<14}{}\n", "max_tokens", sampling.max_tokens));
        output.push_str(&format!(
            "  {:<14}{}",
            "system",
            Self::indent(system_prompt, &" ".repeat(16)).trim_start()
        ));
        output
    }

    pub fn model_list(current: &Model) -> String {
        let mut output = format!("{}\n", "Available models:".cyan().bold());
        for model in Model::catalog() {
            let marker = if &model == current { "*" } else { " " };
            output.push_str(&format!(
                " {} {:<24}{}\n",
                marker.green(),
                model.display_name(),
                model.as_str().dimmed()
            ));
        }
        if current.is_custom() {
            output.push_str(&format!(" {} {}\n", "*".green(), current.as_str()));
        }
        output
    }

    pub fn exported(path: &Path) -> String {
        format!("{} {}", "Exported chat history to".green(), path.display())
    }

    pub fn notice(text: &str) -> String {
        format!("{}", text.dimmed())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
