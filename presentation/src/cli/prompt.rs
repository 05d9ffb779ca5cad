//! Interactive credential prompt

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Ask for an API key on the terminal.
///
/// Returns `None` when the user enters nothing or aborts with Ctrl-C/Ctrl-D.
pub fn prompt_api_key(env_var: &str) -> rustyline::Result<Option<String>> {
    println!(
        "{} {}",
        "No API key found.".yellow(),
        format!("Pass --api-key or set ${}.", env_var).dimmed()
    );

    let mut rl = DefaultEditor::new()?;
    match rl.readline("API key: ") {
        Ok(line) => {
            let line = line.trim().to_string();
            Ok((!line.is_empty()).then_some(line))
        }
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e),
    }
}
