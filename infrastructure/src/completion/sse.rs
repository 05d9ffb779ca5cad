//! Server-sent event decoding for streamed completions.
//!
//! The body arrives in arbitrary byte chunks; [`SseLineDecoder`] reassembles
//! complete lines (a chunk boundary may split a line or a UTF-8 sequence)
//! and [`parse_data_line`] turns each `data:` payload into a [`ChunkEvent`].

use super::protocol::ChatCompletionChunk;

/// Sentinel that ends an OpenAI-compatible stream
pub const DONE_SENTINEL: &str = "[DONE]";

/// What one `data:` line means for the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkEvent {
    /// New content characters
    Content(String),
    /// A chunk with no new content (role header, finish reason, keep-alive)
    Empty,
    /// End of stream
    Done,
    /// The service reported an error inside the stream
    Error(String),
}

/// Reassembles lines from a byte stream.
#[derive(Debug, Default)]
pub struct SseLineDecoder {
    buffer: Vec<u8>,
    /// Bytes of `buffer` already known to contain no newline
    scanned: usize,
}

impl SseLineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes and return every line it completed.
    ///
    /// Lines are returned without their terminator (`\n` or `\r\n`).
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut lines = Vec::new();
        let mut start = 0;
        let mut from = self.scanned;
        while let Some(offset) = self.buffer[from..].iter().position(|b| *b == b'\n') {
            let end = from + offset;
            let mut line = &self.buffer[start..end];
            if line.last() == Some(&b'\r') {
                line = &line[..line.len() - 1];
            }
            lines.push(String::from_utf8_lossy(line).into_owned());
            start = end + 1;
            from = start;
        }
        self.buffer.drain(..start);
        self.scanned = self.buffer.len();
        lines
    }

    /// Whatever is left once the body ends without a final newline.
    pub fn finish(self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.buffer).trim_end().to_string();
        (!line.is_empty()).then_some(line)
    }
}

/// Interpret one SSE line. Non-`data:` lines (comments, `event:`, blank
/// separators) yield `None`.
pub fn parse_data_line(line: &str) -> Option<ChunkEvent> {
    let data = line.strip_prefix("data:")?.trim();
    if data.is_empty() {
        return Some(ChunkEvent::Empty);
    }
    if data == DONE_SENTINEL {
        return Some(ChunkEvent::Done);
    }

    let chunk: ChatCompletionChunk = match serde_json::from_str(data) {
        Ok(chunk) => chunk,
        Err(e) => return Some(ChunkEvent::Error(format!("Malformed stream chunk: {}", e))),
    };

    if let Some(error) = chunk.error {
        return Some(ChunkEvent::Error(error.into_message()));
    }

    let content = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|c| !c.is_empty());

    Some(match content {
        Some(text) => ChunkEvent::Content(text),
        None => ChunkEvent::Empty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_reassembles_split_lines() {
        let mut decoder = SseLineDecoder::new();
        assert!(decoder.push(b"data: {\"cho").is_empty());
        let lines = decoder.push(b"ices\":[]}\r\n\r\ndata: [DONE]\n");
        assert_eq!(lines, vec!["data: {\"choices\":[]}", "", "data: [DONE]"]);
        assert!(decoder.finish().is_none());
    }

    #[test]
    fn test_decoder_keeps_split_utf8_intact() {
        let text = "data: héllo\n".as_bytes();
        // Split inside the two-byte 'é'
        let (a, b) = text.split_at(8);
        let mut decoder = SseLineDecoder::new();
        assert!(decoder.push(a).is_empty());
        assert_eq!(decoder.push(b), vec!["data: héllo"]);
    }

    #[test]
    fn test_decoder_long_line_across_many_chunks() {
        let mut decoder = SseLineDecoder::new();
        let payload = "x".repeat(10_000);
        for chunk in format!("data: {}", payload).as_bytes().chunks(7) {
            assert!(decoder.push(chunk).is_empty());
        }
        assert_eq!(decoder.scanned, decoder.buffer.len());

        let lines = decoder.push(b"\r\ndata: [DONE]\n");
        assert_eq!(lines, vec![format!("data: {}", payload), "data: [DONE]".to_string()]);
        assert!(decoder.buffer.is_empty());
        assert_eq!(decoder.scanned, 0);
    }

    #[test]
    fn test_decoder_finish_returns_trailing_line() {
        let mut decoder = SseLineDecoder::new();
        decoder.push(b"data: [DONE]");
        assert_eq!(decoder.finish().as_deref(), Some("data: [DONE]"));
    }

    #[test]
    fn test_parse_content_chunk() {
        let line = r#"data: {"id":"1","choices":[{"index":0,"delta":{"content":"Hel"},"finish_reason":null}]}"#;
        assert_eq!(
            parse_data_line(line),
            Some(ChunkEvent::Content("Hel".to_string()))
        );
    }

    #[test]
    fn test_parse_role_only_chunk_is_empty() {
        let line = r#"data: {"choices":[{"index":0,"delta":{"role":"assistant","content":""}}]}"#;
        assert_eq!(parse_data_line(line), Some(ChunkEvent::Empty));

        let line = r#"data: {"choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#;
        assert_eq!(parse_data_line(line), Some(ChunkEvent::Empty));
    }

    #[test]
    fn test_parse_done_and_non_data_lines() {
        assert_eq!(parse_data_line("data: [DONE]"), Some(ChunkEvent::Done));
        assert_eq!(parse_data_line("data:[DONE]"), Some(ChunkEvent::Done));
        assert_eq!(parse_data_line(": keep-alive"), None);
        assert_eq!(parse_data_line(""), None);
        assert_eq!(parse_data_line("event: message"), None);
    }

    #[test]
    fn test_parse_error_chunk() {
        let line = r#"data: {"error":{"message":"Invalid token"}}"#;
        assert_eq!(
            parse_data_line(line),
            Some(ChunkEvent::Error("Invalid token".to_string()))
        );
    }

    #[test]
    fn test_parse_malformed_chunk() {
        let event = parse_data_line("data: {not json").unwrap();
        assert!(matches!(event, ChunkEvent::Error(msg) if msg.starts_with("Malformed stream chunk")));
    }
}
