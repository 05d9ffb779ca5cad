//! Progress notification port
//!
//! Defines the interface for reporting a submission's progress while its
//! completion streams.

use crate::ports::completion_gateway::CompletionError;
use streamchat_domain::{ExchangeState, Model};

/// Callback for progress updates during one submission
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait ChatProgressNotifier: Send + Sync {
    /// Called on every exchange state transition
    fn on_state_change(&self, _state: ExchangeState) {}

    /// Called once the request is sent and before any fragment arrives
    fn on_stream_start(&self, _model: &Model) {}

    /// Called for each fragment, in arrival order.
    ///
    /// `partial` is the concatenation of all fragments so far.
    fn on_fragment(&self, fragment: &str, partial: &str);

    /// Called with the final response text
    fn on_stream_complete(&self, _full_text: &str) {}

    /// Called when the request or the stream fails
    fn on_stream_failed(&self, _error: &CompletionError) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoChatProgress;

impl ChatProgressNotifier for NoChatProgress {
    fn on_fragment(&self, _fragment: &str, _partial: &str) {}
}
