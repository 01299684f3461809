//! HTTP client for llama-server's native completion API.

use serde::{Deserialize, Serialize};

use crate::error::LocalLlmError;
use crate::DEFAULT_PORT;

/// Client for communicating with llama-server.
///
/// The server holds the one loaded model instance, so every request issued
/// through this client contends for the same resource.
pub struct LocalLlmClient {
    client: reqwest::Client,
    base_url: String,
}

/// Request to the `/completion` endpoint.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    n_predict: u32,
}

/// Response from the `/completion` endpoint.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: String,
    #[allow(dead_code)]
    #[serde(default)]
    stop: bool,
}

impl LocalLlmClient {
    /// Create a new client with the default URL (localhost:11436).
    pub fn new() -> Self {
        Self::with_url(format!("http://127.0.0.1:{}", DEFAULT_PORT))
    }

    /// Create a new client with a custom URL.
    pub fn with_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Create a new client with a custom port on localhost.
    pub fn with_port(port: u16) -> Self {
        Self::with_url(format!("http://127.0.0.1:{}", port))
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the server is running and healthy.
    pub async fn check_health(&self) -> Result<(), LocalLlmError> {
        let url = format!("{}/health", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(std::time::Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    LocalLlmError::ServerNotRunning(self.base_url.clone())
                } else {
                    LocalLlmError::Http(e)
                }
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(LocalLlmError::ServerNotRunning(self.base_url.clone()))
        }
    }

    /// Generate a completion for a raw prompt string.
    ///
    /// One synchronous full-text result per call; there is no streaming on
    /// this path. Uses llama-server's native `/completion` endpoint, which
    /// takes the prompt as-is without applying a chat template.
    pub async fn generate(
        &self,
        prompt: &str,
        max_new_tokens: u32,
    ) -> Result<String, LocalLlmError> {
        let request = CompletionRequest {
            prompt,
            n_predict: max_new_tokens,
        };

        let url = format!("{}/completion", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    LocalLlmError::ServerNotRunning(self.base_url.clone())
                } else {
                    LocalLlmError::Http(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LocalLlmError::Api(format!("{}: {}", status, text)));
        }

        let completion: CompletionResponse = response.json().await?;

        Ok(completion.content)
    }
}

impl Default for LocalLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        let client = LocalLlmClient::new();
        assert_eq!(client.base_url(), "http://127.0.0.1:11436");
    }

    #[test]
    fn test_custom_url() {
        let client = LocalLlmClient::with_url("http://192.168.1.100:8080");
        assert_eq!(client.base_url(), "http://192.168.1.100:8080");
    }

    #[test]
    fn test_custom_port() {
        let client = LocalLlmClient::with_port(9000);
        assert_eq!(client.base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_completion_request_serializes() {
        let request = CompletionRequest {
            prompt: "USER: hi\nASSISTANT:",
            n_predict: 300,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["prompt"], "USER: hi\nASSISTANT:");
        assert_eq!(json["n_predict"], 300);
    }
}
