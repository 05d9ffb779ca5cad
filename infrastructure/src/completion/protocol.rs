//! Wire types for the OpenAI-compatible `/chat/completions` endpoint.

use serde::{Deserialize, Serialize};
use streamchat_application::CompletionRequest;
use streamchat_domain::Message;

/// Streaming request body
#[derive(Debug, Serialize)]
pub struct ChatCompletionBody<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

impl<'a> From<&'a CompletionRequest> for ChatCompletionBody<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        Self {
            model: request.sampling.model.as_str(),
            messages: &request.messages,
            temperature: request.sampling.temperature,
            top_p: request.sampling.top_p,
            max_tokens: request.sampling.max_tokens,
            stream: true,
        }
    }
}

/// One `data:` payload of the event stream
#[derive(Debug, Default, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

/// Error object as returned by the service, in a stream or a response body
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ApiErrorBody {
    pub fn into_message(self) -> String {
        self.message
            .or(self.detail)
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

/// Error envelope of a non-2xx response body
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: Option<ErrorField>,
    pub detail: Option<String>,
    pub message: Option<String>,
}

/// Some providers send `"error": "text"`, others `"error": {"message": ...}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ErrorField {
    Text(String),
    Object(ApiErrorBody),
}

/// Best-effort extraction of a readable message from an error body.
pub fn error_message_from_body(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match (envelope.error, envelope.detail, envelope.message) {
            (Some(ErrorField::Text(text)), _, _) => text,
            (Some(ErrorField::Object(obj)), _, _) => obj.into_message(),
            (None, Some(detail), _) => detail,
            (None, None, Some(message)) => message,
            (None, None, None) => body.trim().to_string(),
        },
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamchat_domain::{Model, SamplingConfig};

    #[test]
    fn test_body_serializes_with_stream_flag() {
        let request = CompletionRequest::new(
            &[Message::system("sys"), Message::user("Hi")],
            &SamplingConfig::default().with_model(Model::YiLarge),
        );
        let json = serde_json::to_string(&ChatCompletionBody::from(&request)).unwrap();

        assert!(json.contains(r#""model":"01-ai/yi-large""#));
        assert!(json.contains(r#""temperature":0.3,"top_p":0.95,"max_tokens":1024,"stream":true"#));
        assert!(json.contains(r#"{"role":"system","content":"sys"}"#));
        assert!(json.contains(r#"{"role":"user","content":"Hi"}"#));
    }

    #[test]
    fn test_body_keeps_small_sampling_values() {
        let sampling = SamplingConfig::default()
            .with_temperature(0.00004)
            .unwrap()
            .with_top_p(0.12345)
            .unwrap();
        let request = CompletionRequest::new(&[Message::user("Hi")], &sampling);
        let json = serde_json::to_string(&ChatCompletionBody::from(&request)).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["temperature"].as_f64().unwrap() as f32, 0.00004f32);
        assert_eq!(value["top_p"].as_f64().unwrap() as f32, 0.12345f32);
    }

    #[test]
    fn test_error_message_from_object_body() {
        let body = r#"{"error":{"message":"Invalid token","type":"auth"}}"#;
        assert_eq!(error_message_from_body(body), "Invalid token");
    }

    #[test]
    fn test_error_message_from_text_error_field() {
        let body = r#"{"error":"Invalid token"}"#;
        assert_eq!(error_message_from_body(body), "Invalid token");
    }

    #[test]
    fn test_error_message_from_empty_body() {
        assert_eq!(error_message_from_body(""), "");
    }

    #[test]
    fn test_error_message_from_detail_body() {
        let body = r#"{"status":401,"title":"Unauthorized","detail":"Authentication failed"}"#;
        assert_eq!(error_message_from_body(body), "Authentication failed");
    }

    #[test]
    fn test_error_message_from_plain_body() {
        assert_eq!(error_message_from_body(" Bad Gateway \n"), "Bad Gateway");
    }
}
