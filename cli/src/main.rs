//! CLI entrypoint for streamchat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use streamchat_application::{ConversationLogger, HistoryExporter};
use streamchat_domain::ApiKey;
use streamchat_infrastructure::{
    ConfigLoader, FileConfig, FileHistoryExporter, HttpCompletionGateway,
    JsonlConversationLogger,
};
use streamchat_presentation::{ChatRepl, ChatSettings, Cli, ReplConfig, prompt_api_key};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    if cli.print_default_config {
        print!("{}", ConfigLoader::default_toml()?);
        return Ok(());
    }

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(cli.verbose, cli.log_dir.as_deref());

    info!("Starting streamchat");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;

    let settings = chat_settings(&cli, &config)?;
    let api_key = resolve_api_key(&cli, &config)?;

    // === Dependency Injection ===
    let gateway = Arc::new(HttpCompletionGateway::from_config(&config.provider, api_key)?);

    let export_dir = cli
        .export_dir
        .clone()
        .or_else(|| config.export.directory.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let exporter: Arc<dyn HistoryExporter> = Arc::new(FileHistoryExporter::new(export_dir));

    let repl_config = repl_config(&cli, &config, std::io::stdout().is_terminal());

    info!(
        model = %settings.sampling.model,
        base_url = %config.provider.base_url,
        "Session configured"
    );

    let mut repl = ChatRepl::new(gateway, exporter, settings).with_config(repl_config);
    if let Some(logger) = conversation_logger(&config) {
        repl = repl.with_logger(logger);
    }

    repl.run().await?;
    Ok(())
}

fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Initialize logging based on verbosity level
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "streamchat.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

/// Config-file chat defaults with CLI flags applied on top
fn chat_settings(cli: &Cli, config: &FileConfig) -> Result<ChatSettings> {
    let sampling = config
        .sampling_config()
        .context("Invalid [chat] settings")?;
    let mut settings = ChatSettings::new(sampling, config.chat.system_prompt.clone());

    if let Some(name) = &cli.model {
        settings.set_model(name)?;
    }
    if let Some(temperature) = cli.temperature {
        settings.set_temperature(temperature)?;
    }
    if let Some(top_p) = cli.top_p {
        settings.set_top_p(top_p)?;
    }
    if let Some(max_tokens) = cli.max_tokens {
        settings.set_max_tokens(max_tokens)?;
    }
    if let Some(system_prompt) = &cli.system_prompt {
        settings.set_system_prompt(system_prompt.clone());
    }

    Ok(settings)
}

/// The spinner and cursor need an interactive stdout
fn repl_config(cli: &Cli, config: &FileConfig, stdout_is_terminal: bool) -> ReplConfig {
    ReplConfig {
        show_progress: config.repl.show_progress && !cli.quiet && stdout_is_terminal,
        history_file: config.repl.history_file.as_ref().map(PathBuf::from),
    }
}

/// `--api-key`, then the configured environment variable, then a prompt.
///
/// Fails with the blocking "Please enter your API key." error when all
/// sources come up empty; no request is attempted in that case.
fn resolve_api_key(cli: &Cli, config: &FileConfig) -> Result<ApiKey> {
    let env_var = &config.provider.api_key_env;
    let from_env = std::env::var(env_var).ok();

    if let Ok(key) = ApiKey::resolve([cli.api_key.clone(), from_env]) {
        return Ok(key);
    }

    let prompted = if std::io::stdin().is_terminal() {
        prompt_api_key(env_var)?
    } else {
        None
    };

    Ok(ApiKey::resolve([prompted])?)
}

fn conversation_logger(config: &FileConfig) -> Option<Arc<dyn ConversationLogger>> {
    let path = config.logging.conversation_log.as_ref()?;
    match JsonlConversationLogger::open(path) {
        Ok(logger) => {
            info!(path = %logger.path().display(), "Conversation log enabled");
            Some(Arc::new(logger))
        }
        Err(e) => {
            warn!("Could not open conversation log {}: {}", path, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamchat_domain::Model;

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::parse_from(["streamchat", "-m", "Yi Large", "--max-tokens", "512"]);
        let settings = chat_settings(&cli, &FileConfig::default()).unwrap();

        assert_eq!(settings.sampling.model, Model::YiLarge);
        assert_eq!(settings.sampling.max_tokens, 512);
        assert_eq!(settings.system_prompt, "You are a helpful assistant.");
    }

    #[test]
    fn test_progress_needs_terminal_and_no_quiet() {
        let config = FileConfig::default();
        let cli = Cli::parse_from(["streamchat"]);
        assert!(repl_config(&cli, &config, true).show_progress);
        assert!(!repl_config(&cli, &config, false).show_progress);

        let quiet = Cli::parse_from(["streamchat", "-q"]);
        assert!(!repl_config(&quiet, &config, true).show_progress);
    }

    #[test]
    fn test_blank_model_flag_is_rejected() {
        let cli = Cli::parse_from(["streamchat", "--model", "  "]);
        assert!(chat_settings(&cli, &FileConfig::default()).is_err());
    }

    #[test]
    fn test_out_of_range_flag_is_rejected() {
        let cli = Cli::parse_from(["streamchat", "--temperature", "1.5"]);
        assert!(chat_settings(&cli, &FileConfig::default()).is_err());
    }
}
