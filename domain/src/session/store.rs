//! Session store: the ordered conversation for one chat session.
//!
//! The store starts unset. Once initialized it always holds exactly one
//! system message, at index 0, followed by user and assistant turns in
//! conversation order.

use super::entities::{Message, Role};
use crate::core::error::DomainError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStore {
    messages: Vec<Message>,
}

impl SessionStore {
    /// An unset store. Call [`initialize`](Self::initialize) before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with a single system message.
    pub fn with_system_prompt(system_prompt: impl Into<String>) -> Self {
        let mut store = Self::new();
        store.initialize(system_prompt);
        store
    }

    pub fn is_initialized(&self) -> bool {
        !self.messages.is_empty()
    }

    /// Seed the system message if the store is unset; no-op otherwise.
    pub fn initialize(&mut self, system_prompt: impl Into<String>) {
        if self.messages.is_empty() {
            self.messages.push(Message::system(system_prompt));
        }
    }

    /// Overwrite the system message when `new_text` differs from it.
    ///
    /// Returns `true` if the content changed. An unset store is initialized.
    pub fn sync_system_prompt(&mut self, new_text: &str) -> bool {
        match self.messages.first_mut() {
            Some(system) if system.content == new_text => false,
            Some(system) => {
                system.content = new_text.to_string();
                true
            }
            None => {
                self.messages.push(Message::system(new_text));
                true
            }
        }
    }

    pub fn append_user(&mut self, text: impl Into<String>) -> Result<(), DomainError> {
        self.append(Message::user(text))
    }

    pub fn append_assistant(&mut self, text: impl Into<String>) -> Result<(), DomainError> {
        self.append(Message::assistant(text))
    }

    fn append(&mut self, message: Message) -> Result<(), DomainError> {
        if !self.is_initialized() {
            return Err(DomainError::SessionNotInitialized);
        }
        self.messages.push(message);
        Ok(())
    }

    /// Replace the whole conversation with one fresh system message.
    pub fn clear(&mut self, system_prompt: impl Into<String>) {
        self.messages = vec![Message::system(system_prompt)];
    }

    /// Serialized snapshot of the full sequence, system message included.
    pub fn export(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.messages)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .first()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
    }

    /// Messages shown in a transcript (everything but the system message).
    pub fn visible_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| !m.is_system())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
