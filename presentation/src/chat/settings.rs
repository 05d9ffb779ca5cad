//! Sidebar-equivalent settings for the chat REPL
//!
//! Edits are validated here and take effect at the next submission; the
//! system prompt is only synced into the session when a message is sent.

use streamchat_application::SubmitMessageInput;
use streamchat_domain::{DomainError, Model, SamplingConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub sampling: SamplingConfig,
    pub system_prompt: String,
}

impl ChatSettings {
    pub fn new(sampling: SamplingConfig, system_prompt: impl Into<String>) -> Self {
        Self {
            sampling,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn set_model(&mut self, name: &str) -> Result<&Model, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidModel(name.to_string()));
        }
        // FromStr is infallible; unknown names pass through as custom ids
        let model: Model = name.parse().unwrap_or_default();
        self.sampling = self.sampling.clone().with_model(model);
        Ok(&self.sampling.model)
    }

    pub fn set_temperature(&mut self, value: f32) -> Result<(), DomainError> {
        self.sampling = self.sampling.clone().with_temperature(value)?;
        Ok(())
    }

    pub fn set_top_p(&mut self, value: f32) -> Result<(), DomainError> {
        self.sampling = self.sampling.clone().with_top_p(value)?;
        Ok(())
    }

    pub fn set_max_tokens(&mut self, value: u32) -> Result<(), DomainError> {
        self.sampling = self.sampling.clone().with_max_tokens(value)?;
        Ok(())
    }

    pub fn set_system_prompt(&mut self, text: impl Into<String>) {
        self.system_prompt = text.into();
    }

    /// Snapshot the current settings for one submission
    pub fn input_for(&self, text: impl Into<String>) -> SubmitMessageInput {
        SubmitMessageInput::new(text, self.system_prompt.clone(), self.sampling.clone())
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self::new(SamplingConfig::default(), "You are a helpful assistant.")
    }
}
