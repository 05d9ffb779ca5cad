//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for streamchat
#[derive(Parser, Debug)]
#[command(name = "streamchat")]
#[command(author, version, about = "Streaming chat client for OpenAI-compatible endpoints")]
#[command(long_about = r#"
streamchat is an interactive terminal chat against a hosted chat-completion
service. Responses are streamed and rendered as they arrive.

The API key is taken from (in priority order):
1. --api-key <KEY>
2. The environment variable named by provider.api_key_env (default: nv_token)
3. An interactive prompt

Configuration files are loaded from (in priority order):
1. STREAMCHAT_* environment variables (e.g. STREAMCHAT_CHAT__MODEL)
2. --config <path>     Explicit config file
3. ./streamchat.toml   Project-level config
4. ~/.config/streamchat/config.toml   Global config

Example:
  streamchat
  streamchat -m "Yi Large" --temperature 0.7
  streamchat --system-prompt "You are a terse code reviewer." --export-dir ./exports
"#)]
pub struct Cli {
    /// API key for the completion service
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Model display name or provider id
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Sampling temperature (0.0 - 1.0)
    #[arg(long, value_name = "X")]
    pub temperature: Option<f32>,

    /// Nucleus sampling top_p (0.0 - 1.0)
    #[arg(long, value_name = "X")]
    pub top_p: Option<f32>,

    /// Maximum tokens per response (100 - 2048)
    #[arg(long, value_name = "N")]
    pub max_tokens: Option<u32>,

    /// System prompt for the session
    #[arg(short, long, value_name = "TEXT")]
    pub system_prompt: Option<String>,

    /// Directory for exported chat histories
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Write diagnostic logs to files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the spinner and streaming cursor
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    pub print_default_config: bool,
}
