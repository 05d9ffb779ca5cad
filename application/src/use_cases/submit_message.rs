//! Submit Message use case
//!
//! Runs one chat exchange: syncs the system prompt, appends the user turn,
//! streams the completion and appends the assistant turn on success.

use crate::ports::completion_gateway::{CompletionError, CompletionGateway, CompletionRequest};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{ChatProgressNotifier, NoChatProgress};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use streamchat_domain::{DomainError, ExchangeState, SamplingConfig, SessionStore, StreamEvent};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during a submission
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("A response is still streaming; wait for it to finish")]
    SubmissionInFlight,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Completion(#[from] CompletionError),
}

impl SubmitError {
    /// Whether the UI should add the "check your API key" hint
    pub fn is_invalid_credential(&self) -> bool {
        match self {
            SubmitError::Completion(e) => e.is_invalid_credential(),
            _ => false,
        }
    }
}

/// Input for the SubmitMessage use case
#[derive(Debug, Clone)]
pub struct SubmitMessageInput {
    /// The user's message
    pub text: String,
    /// Current value of the system-prompt field
    pub system_prompt: String,
    /// Sampling settings read at submission time
    pub sampling: SamplingConfig,
}

impl SubmitMessageInput {
    pub fn new(
        text: impl Into<String>,
        system_prompt: impl Into<String>,
        sampling: SamplingConfig,
    ) -> Self {
        Self {
            text: text.into(),
            system_prompt: system_prompt.into(),
            sampling,
        }
    }
}

/// Result of a successful exchange
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitMessageOutput {
    /// Final assistant response (also appended to the store)
    pub response: String,
    /// Number of non-empty fragments received
    pub fragments: usize,
    /// Whether the system message was rewritten before the request
    pub system_prompt_changed: bool,
}

/// Clears the in-flight flag when the exchange ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Use case for running one chat exchange
pub struct SubmitMessageUseCase<G: CompletionGateway + 'static> {
    gateway: Arc<G>,
    logger: Arc<dyn ConversationLogger>,
    in_flight: AtomicBool,
}

impl<G: CompletionGateway + 'static> SubmitMessageUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            logger: Arc::new(NoConversationLogger),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Record the conversation through a structured logger
    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// True while an exchange is streaming
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        store: &mut SessionStore,
        input: SubmitMessageInput,
    ) -> Result<SubmitMessageOutput, SubmitError> {
        self.execute_with_progress(store, input, &NoChatProgress)
            .await
    }

    /// Execute the use case with progress callbacks
    ///
    /// On failure the store keeps the user turn and gains no assistant turn.
    pub async fn execute_with_progress(
        &self,
        store: &mut SessionStore,
        input: SubmitMessageInput,
        progress: &dyn ChatProgressNotifier,
    ) -> Result<SubmitMessageOutput, SubmitError> {
        if input.text.trim().is_empty() {
            return Err(SubmitError::EmptyMessage);
        }
        input.sampling.validate()?;

        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or_else(|| {
            warn!("Rejected submission while another response is streaming");
            SubmitError::SubmissionInFlight
        })?;

        let system_prompt_changed = store.sync_system_prompt(&input.system_prompt);
        if system_prompt_changed {
            debug!("System prompt updated before request");
            self.logger.log(ConversationEvent::new(
                "system_prompt_changed",
                json!({ "content": input.system_prompt }),
            ));
        }

        store.append_user(input.text.as_str())?;
        self.logger.log(ConversationEvent::new(
            "user_message",
            json!({ "content": input.text }),
        ));

        let mut state = ExchangeState::Idle;
        Self::transition(&mut state, ExchangeState::Streaming, progress);

        let model = input.sampling.model.clone();
        info!(
            model = %model,
            messages = store.len(),
            "Requesting streaming completion"
        );
        let request = CompletionRequest::new(store.messages(), &input.sampling);
        progress.on_stream_start(&model);

        match self.consume_stream(request, progress).await {
            Ok((response, fragments)) => {
                store.append_assistant(response.as_str())?;
                Self::transition(&mut state, ExchangeState::Completed, progress);
                progress.on_stream_complete(&response);
                info!(fragments, bytes = response.len(), "Completion finished");
                self.logger.log(ConversationEvent::new(
                    "assistant_response",
                    json!({
                        "model": model.as_str(),
                        "fragments": fragments,
                        "content": response,
                    }),
                ));
                Ok(SubmitMessageOutput {
                    response,
                    fragments,
                    system_prompt_changed,
                })
            }
            Err(e) => {
                Self::transition(&mut state, ExchangeState::Failed, progress);
                progress.on_stream_failed(&e);
                warn!("Completion failed: {}", e);
                self.logger.log(ConversationEvent::new(
                    "completion_error",
                    json!({
                        "model": model.as_str(),
                        "error": e.raw_message(),
                        "invalid_credential": e.is_invalid_credential(),
                    }),
                ));
                Err(e.into())
            }
        }
    }

    /// Drain the stream in arrival order, accumulating the response.
    async fn consume_stream(
        &self,
        request: CompletionRequest,
        progress: &dyn ChatProgressNotifier,
    ) -> Result<(String, usize), CompletionError> {
        let mut handle = self.gateway.stream_completion(request).await?;
        let mut response = String::new();
        let mut fragments = 0usize;

        while let Some(event) = handle.next_event().await {
            match event {
                StreamEvent::Delta(fragment) => {
                    if fragment.is_empty() {
                        continue;
                    }
                    response.push_str(&fragment);
                    fragments += 1;
                    progress.on_fragment(&fragment, &response);
                }
                StreamEvent::Completed(full) => {
                    if fragments == 0 {
                        response = full;
                    }
                    break;
                }
                StreamEvent::Error(message) => {
                    return Err(CompletionError::Stream(message));
                }
            }
        }

        Ok((response, fragments))
    }

    fn transition(
        state: &mut ExchangeState,
        next: ExchangeState,
        progress: &dyn ChatProgressNotifier,
    ) {
        debug_assert!(state.can_transition_to(next));
        *state = next;
        progress.on_state_change(next);
    }
}
