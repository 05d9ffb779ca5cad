//! Progress reporting while a response streams

use crate::output::console::{ASSISTANT_AVATAR, ConsoleFormatter};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;
use streamchat_application::{ChatProgressNotifier, CompletionError};
use streamchat_domain::Model;

/// Shown after the partial response while more text is expected
pub const STREAM_CURSOR: char = '▌';

#[derive(Default)]
struct RenderState {
    spinner: Option<ProgressBar>,
    started: bool,
    cursor_visible: bool,
}

/// Renders a streaming response in place: a "Thinking..." spinner until the
/// first fragment, then the growing text followed by a cursor.
pub struct StreamRenderer {
    state: Mutex<RenderState>,
}

impl StreamRenderer {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RenderState::default()),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Drop the spinner and cursor; returns whether any text was printed.
    fn settle(state: &mut RenderState, out: &mut impl Write) -> bool {
        if let Some(spinner) = state.spinner.take() {
            spinner.finish_and_clear();
        }
        if state.cursor_visible {
            let _ = write!(out, "\u{8} \u{8}");
            state.cursor_visible = false;
        }
        std::mem::take(&mut state.started)
    }
}

impl Default for StreamRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatProgressNotifier for StreamRenderer {
    fn on_stream_start(&self, model: &Model) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.set_message(format!("Thinking... {}", model.display_name().dimmed()));
        spinner.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut state) = self.state.lock() {
            *state = RenderState {
                spinner: Some(spinner),
                ..RenderState::default()
            };
        }
    }

    fn on_fragment(&self, fragment: &str, _partial: &str) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let mut out = io::stdout().lock();

        if !state.started {
            if let Some(spinner) = state.spinner.take() {
                spinner.finish_and_clear();
            }
            let _ = write!(out, "{} ", ASSISTANT_AVATAR);
            state.started = true;
        }
        if state.cursor_visible {
            let _ = write!(out, "\u{8} \u{8}");
        }
        let _ = write!(out, "{}{}", fragment, STREAM_CURSOR);
        state.cursor_visible = true;
        let _ = out.flush();
    }

    fn on_stream_complete(&self, full_text: &str) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let mut out = io::stdout().lock();
        if Self::settle(&mut state, &mut out) {
            let _ = writeln!(out);
        } else {
            // Completed without fragments: print the whole response at once
            let _ = writeln!(out, "{}", ConsoleFormatter::assistant_line(full_text));
        }
        let _ = out.flush();
    }

    fn on_stream_failed(&self, _error: &CompletionError) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let mut out = io::stdout().lock();
        if Self::settle(&mut state, &mut out) {
            let _ = writeln!(out);
        }
        let _ = out.flush();
    }
}

/// Plain streaming output for `--quiet`, `repl.show_progress = false`, and
/// stdout that is not a terminal.
pub struct PlainStreamPrinter {
    started: Mutex<bool>,
}

impl PlainStreamPrinter {
    pub fn new() -> Self {
        Self {
            started: Mutex::new(false),
        }
    }
}

impl Default for PlainStreamPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatProgressNotifier for PlainStreamPrinter {
    fn on_stream_start(&self, _model: &Model) {
        if let Ok(mut started) = self.started.lock() {
            *started = false;
        }
    }

    fn on_fragment(&self, fragment: &str, _partial: &str) {
        let Ok(mut started) = self.started.lock() else {
            return;
        };
        let mut out = io::stdout().lock();
        if !*started {
            let _ = write!(out, "{} ", ASSISTANT_AVATAR);
            *started = true;
        }
        let _ = write!(out, "{}", fragment);
        let _ = out.flush();
    }

    fn on_stream_complete(&self, full_text: &str) {
        let started = self.started.lock().map(|mut s| std::mem::take(&mut *s));
        if matches!(started, Ok(true)) {
            println!();
        } else {
            println!("{}", ConsoleFormatter::assistant_line(full_text));
        }
    }

    fn on_stream_failed(&self, _error: &CompletionError) {
        if let Ok(mut started) = self.started.lock()
            && std::mem::take(&mut *started)
        {
            println!();
        }
    }
}
