//! Completion Gateway port
//!
//! Defines the interface for talking to a streaming completion service.

use async_trait::async_trait;
use streamchat_domain::{Message, SamplingConfig, StreamEvent};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur while requesting or streaming a completion.
///
/// Every variant carries the raw message reported by the service or the
/// transport so the UI can show it verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionError {
    #[error("{0}")]
    InvalidCredential(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Stream(String),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}

impl CompletionError {
    /// The raw message, without the variant prefix.
    pub fn raw_message(&self) -> &str {
        match self {
            CompletionError::InvalidCredential(m)
            | CompletionError::Connection(m)
            | CompletionError::Stream(m)
            | CompletionError::MalformedRequest(m) => m,
            CompletionError::Api { message, .. } => message,
        }
    }

    /// Whether the failure points at a rejected credential.
    pub fn is_invalid_credential(&self) -> bool {
        if matches!(self, CompletionError::InvalidCredential(_)) {
            return true;
        }
        if matches!(self, CompletionError::Api { status: 401 | 403, .. }) {
            return true;
        }
        let raw = self.raw_message();
        if raw.contains("Invalid token") {
            return true;
        }
        let lower = raw.to_lowercase();
        lower.contains("invalid api key") || lower.contains("unauthorized")
    }
}

/// One completion request: the full conversation plus sampling settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub sampling: SamplingConfig,
}

impl CompletionRequest {
    pub fn new(messages: &[Message], sampling: &SamplingConfig) -> Self {
        Self {
            messages: messages.to_vec(),
            sampling: sampling.clone(),
        }
    }
}

/// Handle for receiving the fragments of one streaming completion.
///
/// Lazy, finite and non-restartable: events arrive as the service produces
/// them and are never replayed.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Next event in arrival order, or `None` once the sender is gone.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        self.receiver.recv().await
    }
}

/// Gateway to a streaming completion service
///
/// This port defines how the application layer opens completion streams.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Open a streaming completion for the given request.
    ///
    /// Errors returned here happen before any fragment is produced
    /// (transport failure, rejected credential, bad request).
    async fn stream_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<StreamHandle, CompletionError>;
}
