//! Streaming chat completion over HTTP

mod gateway;
mod protocol;
mod sse;

pub use gateway::HttpCompletionGateway;
pub use sse::{ChunkEvent, DONE_SENTINEL, SseLineDecoder, parse_data_line};
