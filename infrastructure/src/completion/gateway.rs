//! HTTP completion gateway
//!
//! Implements [`CompletionGateway`] against an OpenAI-compatible
//! `/chat/completions` endpoint with `stream: true`. The response body is
//! read by a background task that forwards fragments over a bounded channel.

use super::protocol::{ChatCompletionBody, error_message_from_body};
use super::sse::{ChunkEvent, SseLineDecoder, parse_data_line};
use crate::config::FileProviderConfig;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use reqwest::Client;
use reqwest::header::ACCEPT;
use std::fmt::Display;
use std::time::Duration;
use streamchat_application::{CompletionError, CompletionGateway, CompletionRequest, StreamHandle};
use streamchat_domain::{ApiKey, StreamEvent};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Fragments buffered between the reader task and the consumer
const STREAM_CHANNEL_CAPACITY: usize = 64;

pub struct HttpCompletionGateway {
    client: Client,
    base_url: String,
    api_key: ApiKey,
}

impl HttpCompletionGateway {
    /// Create a gateway with a 10 second connect timeout and no overall limit
    pub fn new(base_url: impl Into<String>, api_key: ApiKey) -> Result<Self, CompletionError> {
        Self::with_timeouts(base_url, api_key, Duration::from_secs(10), None)
    }

    pub fn from_config(
        config: &FileProviderConfig,
        api_key: ApiKey,
    ) -> Result<Self, CompletionError> {
        Self::with_timeouts(
            config.base_url.clone(),
            api_key,
            Duration::from_secs(config.connect_timeout_seconds),
            config.timeout_seconds.map(Duration::from_secs),
        )
    }

    pub fn with_timeouts(
        base_url: impl Into<String>,
        api_key: ApiKey,
        connect_timeout: Duration,
        timeout: Option<Duration>,
    ) -> Result<Self, CompletionError> {
        let mut builder = Client::builder().connect_timeout(connect_timeout);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CompletionError::Connection(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = base_url.into();
        info!(base_url = %base_url, "HttpCompletionGateway initialized");

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionGateway for HttpCompletionGateway {
    async fn stream_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<StreamHandle, CompletionError> {
        let url = self.endpoint();
        let body = ChatCompletionBody::from(&request);

        debug!(
            url = %url,
            model = %body.model,
            messages = body.messages.len(),
            "Sending streaming completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .header(ACCEPT, "text/event-stream")
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let mut message = error_message_from_body(&text);
            if message.is_empty() {
                message = status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string();
            }
            warn!(status = status.as_u16(), "Completion request rejected: {}", message);
            return Err(match status.as_u16() {
                401 | 403 => CompletionError::InvalidCredential(message),
                400 | 422 => CompletionError::MalformedRequest(message),
                code => CompletionError::Api {
                    status: code,
                    message,
                },
            });
        }

        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        tokio::spawn(pump_stream(response.bytes_stream(), tx));
        Ok(StreamHandle::new(rx))
    }
}

fn transport_error(e: reqwest::Error) -> CompletionError {
    if e.is_timeout() {
        CompletionError::Connection(format!("Request timed out: {}", e))
    } else {
        CompletionError::Connection(e.to_string())
    }
}

/// Read the SSE body to the end, forwarding events in arrival order.
///
/// Always ends the channel with exactly one terminal event unless the
/// receiver has gone away.
pub(crate) async fn pump_stream<S, B, E>(body: S, tx: mpsc::Sender<StreamEvent>)
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let mut body = std::pin::pin!(body);
    let mut decoder = SseLineDecoder::new();
    let mut full_text = String::new();

    while let Some(chunk) = body.next().await {
        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = tx
                    .send(StreamEvent::Error(format!("Stream read error: {}", e)))
                    .await;
                return;
            }
        };

        for line in decoder.push(bytes.as_ref()) {
            if !forward_line(&line, &mut full_text, &tx).await {
                return;
            }
        }
    }

    if let Some(line) = decoder.finish()
        && !forward_line(&line, &mut full_text, &tx).await
    {
        return;
    }

    // Body ended without [DONE]
    let _ = tx.send(StreamEvent::Completed(full_text)).await;
}

/// Returns false once the stream is finished or the receiver is gone.
async fn forward_line(line: &str, full_text: &mut String, tx: &mpsc::Sender<StreamEvent>) -> bool {
    match parse_data_line(line) {
        None | Some(ChunkEvent::Empty) => true,
        Some(ChunkEvent::Content(text)) => {
            full_text.push_str(&text);
            tx.send(StreamEvent::Delta(text)).await.is_ok()
        }
        Some(ChunkEvent::Done) => {
            let _ = tx
                .send(StreamEvent::Completed(std::mem::take(full_text)))
                .await;
            false
        }
        Some(ChunkEvent::Error(message)) => {
            warn!("Completion stream reported an error: {}", message);
            let _ = tx.send(StreamEvent::Error(message)).await;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamchat_domain::{Message, SamplingConfig};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn request() -> CompletionRequest {
        CompletionRequest::new(
            &[
                Message::system("You are a helpful assistant."),
                Message::user("Hi"),
            ],
            &SamplingConfig::default(),
        )
    }

    fn key() -> ApiKey {
        ApiKey::new("test-key").unwrap()
    }

    fn sse_response(lines: &[&str]) -> String {
        let mut body = String::new();
        for line in lines {
            body.push_str(line);
            body.push_str("\n\n");
        }
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nConnection: close\r\n\r\n{}",
            body
        )
    }

    fn json_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
                let content_length = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Serve one canned response; the handle yields the raw request.
    async fn serve_once(response: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });
        (format!("http://{}/v1/", addr), handle)
    }

    async fn drain(mut handle: StreamHandle) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        while let Some(event) = handle.next_event().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_streams_fragments_in_order() {
        let (base_url, server) = serve_once(sse_response(&[
            r#"data: {"choices":[{"index":0,"delta":{"role":"assistant","content":""}}]}"#,
            r#"data: {"choices":[{"index":0,"delta":{"content":"Hel"}}]}"#,
            r#"data: {"choices":[{"index":0,"delta":{"content":"lo!"}}]}"#,
            r#"data: {"choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#,
            "data: [DONE]",
        ]))
        .await;

        let gateway = HttpCompletionGateway::new(base_url, key()).unwrap();
        let handle = gateway.stream_completion(request()).await.unwrap();
        let events = drain(handle).await;

        assert_eq!(
            events,
            vec![
                StreamEvent::Delta("Hel".to_string()),
                StreamEvent::Delta("lo!".to_string()),
                StreamEvent::Completed("Hello!".to_string()),
            ]
        );

        let raw_request = server.await.unwrap();
        assert!(raw_request.starts_with("POST /v1/chat/completions HTTP/1.1"));
        let lower = raw_request.to_lowercase();
        assert!(lower.contains("authorization: bearer test-key"));
        assert!(raw_request.contains(r#""stream":true"#));
        assert!(raw_request.contains(r#""role":"system""#));
    }

    #[tokio::test]
    async fn test_unauthorized_status_is_invalid_credential() {
        let (base_url, _server) = serve_once(json_response(
            "401 Unauthorized",
            r#"{"error":{"message":"Invalid token"}}"#,
        ))
        .await;

        let gateway = HttpCompletionGateway::new(base_url, key()).unwrap();
        let err = gateway.stream_completion(request()).await.err().unwrap();

        assert_eq!(
            err,
            CompletionError::InvalidCredential("Invalid token".to_string())
        );
        assert!(err.is_invalid_credential());
    }

    #[tokio::test]
    async fn test_empty_unauthorized_body_uses_status_reason() {
        let (base_url, _server) = serve_once(json_response("401 Unauthorized", "")).await;

        let gateway = HttpCompletionGateway::new(base_url, key()).unwrap();
        let err = gateway.stream_completion(request()).await.err().unwrap();

        assert_eq!(
            err,
            CompletionError::InvalidCredential("Unauthorized".to_string())
        );
    }

    #[tokio::test]
    async fn test_unprocessable_status_is_malformed_request() {
        let (base_url, _server) = serve_once(json_response(
            "422 Unprocessable Entity",
            r#"{"detail":"max_tokens must be <= 2048"}"#,
        ))
        .await;

        let gateway = HttpCompletionGateway::new(base_url, key()).unwrap();
        let err = gateway.stream_completion(request()).await.err().unwrap();

        assert_eq!(
            err,
            CompletionError::MalformedRequest("max_tokens must be <= 2048".to_string())
        );
        assert!(!err.is_invalid_credential());
    }

    #[tokio::test]
    async fn test_server_error_status_keeps_raw_message() {
        let (base_url, _server) = serve_once(json_response(
            "503 Service Unavailable",
            r#"{"detail":"model is overloaded"}"#,
        ))
        .await;

        let gateway = HttpCompletionGateway::new(base_url, key()).unwrap();
        let err = gateway.stream_completion(request()).await.err().unwrap();

        assert_eq!(
            err,
            CompletionError::Api {
                status: 503,
                message: "model is overloaded".to_string()
            }
        );
        assert!(!err.is_invalid_credential());
    }

    #[tokio::test]
    async fn test_error_inside_stream_ends_with_error_event() {
        let (base_url, _server) = serve_once(sse_response(&[
            r#"data: {"choices":[{"index":0,"delta":{"content":"Hel"}}]}"#,
            r#"data: {"error":{"message":"Invalid token"}}"#,
            r#"data: {"choices":[{"index":0,"delta":{"content":"ignored"}}]}"#,
        ]))
        .await;

        let gateway = HttpCompletionGateway::new(base_url, key()).unwrap();
        let handle = gateway.stream_completion(request()).await.unwrap();
        let events = drain(handle).await;

        assert_eq!(
            events,
            vec![
                StreamEvent::Delta("Hel".to_string()),
                StreamEvent::Error("Invalid token".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gateway = HttpCompletionGateway::new(format!("http://{}/v1", addr), key()).unwrap();
        let err = gateway.stream_completion(request()).await.err().unwrap();
        assert!(matches!(err, CompletionError::Connection(_)));
    }

    #[tokio::test]
    async fn test_pump_completes_when_body_ends_without_done() {
        let chunks: Vec<Result<Vec<u8>, std::io::Error>> = vec![
            Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\ndata: {\"choi".to_vec()),
            Ok(b"ces\":[{\"delta\":{\"content\":\"b\"}}]}".to_vec()),
        ];
        let (tx, rx) = mpsc::channel(8);
        pump_stream(futures::stream::iter(chunks), tx).await;

        let events = drain(StreamHandle::new(rx)).await;
        assert_eq!(
            events,
            vec![
                StreamEvent::Delta("a".to_string()),
                StreamEvent::Delta("b".to_string()),
                StreamEvent::Completed("ab".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_pump_surfaces_read_errors() {
        let chunks: Vec<Result<Vec<u8>, std::io::Error>> = vec![
            Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n".to_vec()),
            Err(std::io::Error::other("connection reset")),
        ];
        let (tx, rx) = mpsc::channel(8);
        pump_stream(futures::stream::iter(chunks), tx).await;

        let events = drain(StreamHandle::new(rx)).await;
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            StreamEvent::Error("Stream read error: connection reset".to_string())
        );
    }
}
