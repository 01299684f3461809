//! Streaming client for the hosted inference API.

use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::ChatConfig;
use crate::types::{ChatTurn, SamplingParams};

/// Default remote model id.
pub const DEFAULT_REMOTE_MODEL: &str = "openai/gpt-oss-20b";

/// Default base URL of the OpenAI-compatible inference router.
pub const DEFAULT_REMOTE_URL: &str = "https://router.huggingface.co/v1";

/// Capacity of the fragment channel between the reader task and the caller.
const FRAGMENT_CHANNEL_CAPACITY: usize = 32;

/// Errors from the remote client.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing API token")]
    MissingToken,
    #[error("API token is not a valid header value")]
    InvalidToken,
}

/// Streaming chat completion request.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    stream: bool,
}

/// One server-sent chunk of a streamed completion.
#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Parsed form of one SSE line.
#[derive(Debug, PartialEq)]
enum SseEvent {
    /// A content fragment (possibly empty).
    Fragment(String),
    /// End-of-stream marker.
    Done,
}

/// Parse one line of a server-sent event stream.
///
/// Non-data lines (blank lines, comments, event fields) and malformed
/// payloads yield `None`.
fn parse_sse_line(line: &str) -> Option<SseEvent> {
    let data = line.strip_prefix("data:")?.trim_start();
    if data == "[DONE]" {
        return Some(SseEvent::Done);
    }
    if data.is_empty() {
        return None;
    }
    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => {
            let fragment = chunk
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta.content)
                .unwrap_or_default();
            Some(SseEvent::Fragment(fragment))
        }
        Err(e) => {
            warn!("Skipping malformed stream line: {}", e);
            None
        }
    }
}

/// Client for the hosted OpenAI-compatible chat completion API.
///
/// Stateless per call: every invocation issues its own request and owns its
/// own response stream.
pub struct InferenceApiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl InferenceApiClient {
    /// Create a new client from configuration.
    pub fn new(config: &ChatConfig) -> Result<Self, RemoteError> {
        if config.api_token.is_empty() {
            return Err(RemoteError::MissingToken);
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_token))
            .map_err(|_| RemoteError::InvalidToken)?;
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.remote_url.clone(),
            model: config.remote_model.clone(),
        })
    }

    /// Get the model id this client targets.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Submit a streaming chat completion.
    ///
    /// Returns a channel of content fragments in arrival order. A transport
    /// error mid-stream arrives as the channel's final item; a non-success
    /// HTTP status fails the call before any fragment is produced.
    pub async fn stream_chat_completion(
        &self,
        turns: Vec<ChatTurn>,
        params: SamplingParams,
    ) -> Result<mpsc::Receiver<Result<String, RemoteError>>, RemoteError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: &turns,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
            stream: true,
        };

        let url = format!("{}/chat/completions", self.base_url);

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let (tx, rx) = mpsc::channel(FRAGMENT_CHANNEL_CAPACITY);

        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            // Lines can split across network chunks; buffer the tail bytes
            // until the next newline arrives.
            let mut buffer: Vec<u8> = Vec::new();

            'read: while let Some(chunk) = stream.next().await {
                let bytes = match chunk {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        let _ = tx.send(Err(RemoteError::Http(e))).await;
                        return;
                    }
                };
                buffer.extend_from_slice(&bytes);

                while let Some(newline) = buffer.iter().position(|&b| b == b'\n') {
                    let line_bytes: Vec<u8> = buffer.drain(..=newline).collect();
                    let line = String::from_utf8_lossy(&line_bytes);
                    match parse_sse_line(line.trim_end()) {
                        Some(SseEvent::Done) => break 'read,
                        Some(SseEvent::Fragment(fragment)) => {
                            if tx.send(Ok(fragment)).await.is_err() {
                                // Caller dropped the receiver; stop reading.
                                return;
                            }
                        }
                        None => {}
                    }
                }
            }

            debug!("remote stream closed");
        });

        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token() {
        let config = ChatConfig::default();
        let result = InferenceApiClient::new(&config);
        assert!(matches!(result, Err(RemoteError::MissingToken)));
    }

    #[test]
    fn test_client_with_token() {
        let config = ChatConfig::builder().api_token("hf_test").build();
        let client = InferenceApiClient::new(&config).unwrap();
        assert_eq!(client.model(), DEFAULT_REMOTE_MODEL);
    }

    #[test]
    fn test_parse_content_fragment() {
        let line = r#"data: {"choices":[{"delta":{"content":"Hel"}}]}"#;
        assert_eq!(
            parse_sse_line(line),
            Some(SseEvent::Fragment("Hel".to_string()))
        );
    }

    #[test]
    fn test_parse_done_marker() {
        assert_eq!(parse_sse_line("data: [DONE]"), Some(SseEvent::Done));
    }

    #[test]
    fn test_parse_empty_delta_is_empty_fragment() {
        let line = r#"data: {"choices":[{"delta":{}}]}"#;
        assert_eq!(
            parse_sse_line(line),
            Some(SseEvent::Fragment(String::new()))
        );
    }

    #[test]
    fn test_parse_missing_choices_is_empty_fragment() {
        let line = r#"data: {"object":"chat.completion.chunk"}"#;
        assert_eq!(
            parse_sse_line(line),
            Some(SseEvent::Fragment(String::new()))
        );
    }

    #[test]
    fn test_non_data_lines_skipped() {
        assert_eq!(parse_sse_line(""), None);
        assert_eq!(parse_sse_line(": keep-alive"), None);
        assert_eq!(parse_sse_line("event: ping"), None);
        assert_eq!(parse_sse_line("data:"), None);
    }

    #[test]
    fn test_malformed_payload_skipped() {
        assert_eq!(parse_sse_line("data: {not json"), None);
    }

    #[test]
    fn test_request_serializes_wire_shape() {
        let turns = vec![ChatTurn::system("sys"), ChatTurn::user("hi")];
        let request = ChatCompletionRequest {
            model: "openai/gpt-oss-20b",
            messages: &turns,
            max_tokens: 3000,
            temperature: 0.7,
            top_p: 0.95,
            stream: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "openai/gpt-oss-20b");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert_eq!(json["stream"], true);
    }
}
