//! Domain layer for streamchat
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Session**: the ordered conversation (one system message at index 0,
//!   then user and assistant turns)
//! - **Sampling Config**: model plus generation parameters, read per request
//! - **Fragment**: an incremental piece of generated text

pub mod core;
pub mod session;

// Re-export commonly used types
pub use core::{
    credential::ApiKey,
    error::DomainError,
    model::Model,
    sampling::{MAX_TOKENS_RANGE, SamplingConfig, TEMPERATURE_RANGE, TOP_P_RANGE},
};
pub use session::{
    entities::{Message, Role},
    store::SessionStore,
    stream::{ExchangeState, StreamEvent},
};
