//! Streaming events for completion responses.
//!
//! [`StreamEvent`] represents individual events in a streaming completion,
//! enabling real-time display of model output as it's generated.

/// An event in a streaming completion response.
///
/// Bridges the transport-level stream (SSE chunks from the completion
/// endpoint) to the application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text fragment from the model.
    Delta(String),
    /// The complete response text (signals stream end).
    Completed(String),
    /// An error reported by the service during streaming.
    Error(String),
}

/// Lifecycle of one submission: Idle → Streaming → (Completed | Failed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExchangeState {
    #[default]
    Idle,
    Streaming,
    Completed,
    Failed,
}

impl ExchangeState {
    /// Whether moving to `next` is a legal transition.
    pub fn can_transition_to(&self, next: ExchangeState) -> bool {
        matches!(
            (self, next),
            (ExchangeState::Idle, ExchangeState::Streaming)
                | (ExchangeState::Streaming, ExchangeState::Completed)
                | (ExchangeState::Streaming, ExchangeState::Failed)
        )
    }
}
