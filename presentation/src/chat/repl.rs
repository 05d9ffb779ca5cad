//! REPL (Read-Eval-Print Loop) for interactive chat

use super::command::ReplCommand;
use super::settings::ChatSettings;
use crate::config::ReplConfig;
use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::{PlainStreamPrinter, StreamRenderer};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;
use streamchat_application::{
    CompletionGateway, ConversationLogger, ExportHistoryUseCase, HistoryExporter,
    SubmitMessageUseCase,
};
use streamchat_domain::SessionStore;
use tracing::debug;

/// What the loop should do after a command
#[derive(Debug, PartialEq)]
enum CommandOutcome {
    Continue(String),
    Quit,
}

/// Interactive chat REPL
pub struct ChatRepl<G: CompletionGateway + 'static> {
    submit: SubmitMessageUseCase<G>,
    export: ExportHistoryUseCase,
    store: SessionStore,
    settings: ChatSettings,
    config: ReplConfig,
}

impl<G: CompletionGateway + 'static> ChatRepl<G> {
    /// Create a new ChatRepl with a session seeded from `settings`
    pub fn new(gateway: Arc<G>, exporter: Arc<dyn HistoryExporter>, settings: ChatSettings) -> Self {
        Self {
            submit: SubmitMessageUseCase::new(gateway),
            export: ExportHistoryUseCase::new(exporter),
            store: SessionStore::with_system_prompt(settings.system_prompt.clone()),
            settings,
            config: ReplConfig::default(),
        }
    }

    /// Record the conversation through a structured logger
    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.submit = self.submit.with_logger(logger);
        self
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = self.config.history_path();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            let readline = rl.readline(">>> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    if line.starts_with('/') {
                        match ReplCommand::parse(line) {
                            Ok(command) => match self.apply_command(command) {
                                CommandOutcome::Continue(output) => {
                                    println!("{}", output);
                                }
                                CommandOutcome::Quit => {
                                    println!("Bye!");
                                    break;
                                }
                            },
                            Err(e) => {
                                println!("{}", e);
                                println!("Type /help for available commands");
                            }
                        }
                        continue;
                    }

                    self.process_message(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│            streamchat - Chat Mode           │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!(
            "Model: {} ({})",
            self.settings.sampling.model.display_name(),
            self.settings.sampling.model.as_str().dimmed()
        );
        println!("Type a message to chat, /help for commands.");
        println!();
    }

    fn help_text() -> String {
        [
            "",
            "Commands:",
            "  /help, /h, /?          - Show this help",
            "  /models                - List available models",
            "  /model [name|id]       - Show or switch the model",
            "  /temperature [0-1]     - Show or set temperature",
            "  /top_p [0-1]           - Show or set top_p",
            "  /max_tokens [100-2048] - Show or set max tokens",
            "  /system [text]         - Show or edit the system prompt",
            "  /settings              - Show current settings",
            "  /history               - Show the conversation",
            "  /export                - Save the conversation as JSON",
            "  /clear                 - Start over with the current system prompt",
            "  /quit, /exit, /q       - Exit chat",
            "",
        ]
        .join("\n")
    }

    fn apply_command(&mut self, command: ReplCommand) -> CommandOutcome {
        debug!(?command, "REPL command");
        let sampling = &self.settings.sampling;

        let output = match command {
            ReplCommand::Quit => return CommandOutcome::Quit,
            ReplCommand::Help => Self::help_text(),
            ReplCommand::Models => ConsoleFormatter::model_list(&sampling.model),
            ReplCommand::Model(None) => format!(
                "Model: {} ({})",
                sampling.model.display_name(),
                sampling.model.as_str()
            ),
            ReplCommand::Model(Some(name)) => match self.settings.set_model(&name) {
                Ok(model) if model.is_custom() => {
                    format!("Model set to custom id {}", model.as_str())
                }
                Ok(model) => format!("Model set to {}", model.display_name()),
                Err(e) => e.to_string(),
            },
            ReplCommand::Temperature(None) => format!("temperature = {}", sampling.temperature),
            ReplCommand::Temperature(Some(value)) => {
                Self::edit_result(self.settings.set_temperature(value), "temperature", value)
            }
            ReplCommand::TopP(None) => format!("top_p = {}", sampling.top_p),
            ReplCommand::TopP(Some(value)) => {
                Self::edit_result(self.settings.set_top_p(value), "top_p", value)
            }
            ReplCommand::MaxTokens(None) => format!("max_tokens = {}", sampling.max_tokens),
            ReplCommand::MaxTokens(Some(value)) => {
                Self::edit_result(self.settings.set_max_tokens(value), "max_tokens", value)
            }
            ReplCommand::System(None) => {
                format!("System prompt: {}", self.settings.system_prompt)
            }
            ReplCommand::System(Some(text)) => {
                self.settings.set_system_prompt(text);
                ConsoleFormatter::notice("System prompt updated; applies to your next message.")
            }
            ReplCommand::Settings => {
                ConsoleFormatter::settings(&self.settings.sampling, &self.settings.system_prompt)
            }
            ReplCommand::History => ConsoleFormatter::transcript(self.store.visible_messages()),
            ReplCommand::Export => match self.export.execute(&self.store) {
                Ok(path) => ConsoleFormatter::exported(&path),
                Err(e) => format!("{} {}", "Error:".red().bold(), e),
            },
            ReplCommand::Clear => {
                self.store.clear(self.settings.system_prompt.clone());
                ConsoleFormatter::notice("Chat history cleared.")
            }
        };

        CommandOutcome::Continue(output)
    }

    fn edit_result<E: std::fmt::Display, V: std::fmt::Display>(
        result: Result<(), E>,
        name: &str,
        value: V,
    ) -> String {
        match result {
            Ok(()) => format!("{} set to {}", name, value),
            Err(e) => e.to_string(),
        }
    }

    async fn process_message(&mut self, text: &str) {
        let input = self.settings.input_for(text);

        let result = if self.config.show_progress {
            let progress = StreamRenderer::new();
            self.submit
                .execute_with_progress(&mut self.store, input, &progress)
                .await
        } else {
            let progress = PlainStreamPrinter::new();
            self.submit
                .execute_with_progress(&mut self.store, input, &progress)
                .await
        };

        if let Err(e) = result {
            eprintln!("{}", ConsoleFormatter::submit_error(&e));
        }
        println!();
    }
}
