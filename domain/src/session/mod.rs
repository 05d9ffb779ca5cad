//! Chat session domain.
//!
//! - [`entities::Message`]: a single turn within a session
//! - [`store::SessionStore`]: the ordered conversation
//! - [`stream::StreamEvent`]: events of a streaming completion

pub mod entities;
pub mod store;
pub mod stream;
