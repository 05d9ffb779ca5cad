//! Live rendering of streamed responses

pub mod reporter;
