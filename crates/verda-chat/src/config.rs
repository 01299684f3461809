//! Chat configuration.

use thiserror::Error;

use crate::remote::{DEFAULT_REMOTE_MODEL, DEFAULT_REMOTE_URL};
use crate::types::SamplingParams;

/// Default cap on newly generated tokens for the local model.
const DEFAULT_LOCAL_MAX_NEW_TOKENS: u32 = 300;

/// Errors raised while assembling configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The required inference API credential is absent.
    #[error("HF_TOKEN not found. Set it in the environment (or a .env file) before starting")]
    MissingToken,
}

/// Configuration for the conversation orchestrator.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Hugging Face API token used by the remote backend.
    pub api_token: String,
    /// Remote model id (default: openai/gpt-oss-20b).
    pub remote_model: String,
    /// Base URL of the remote chat-completion API.
    pub remote_url: String,
    /// Base URL of the local llama-server instance.
    pub local_url: String,
    /// Cap on newly generated tokens for the local model.
    pub local_max_new_tokens: u32,
    /// Sampling parameters for the remote backend.
    pub sampling: SamplingParams,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            remote_model: DEFAULT_REMOTE_MODEL.to_string(),
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            local_url: format!("http://127.0.0.1:{}", verda_local_llm::DEFAULT_PORT),
            local_max_new_tokens: DEFAULT_LOCAL_MAX_NEW_TOKENS,
            sampling: SamplingParams::default(),
        }
    }
}

impl ChatConfig {
    /// Create config from environment variables.
    ///
    /// `HF_TOKEN` is required; without it the process must not come up.
    /// The `VERDA_*` variables override individual defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_token = std::env::var("HF_TOKEN")
            .ok()
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let remote_model = std::env::var("VERDA_REMOTE_MODEL")
            .unwrap_or_else(|_| DEFAULT_REMOTE_MODEL.to_string());

        let remote_url =
            std::env::var("VERDA_REMOTE_URL").unwrap_or_else(|_| DEFAULT_REMOTE_URL.to_string());

        let local_url = std::env::var("VERDA_LOCAL_URL")
            .unwrap_or_else(|_| format!("http://127.0.0.1:{}", verda_local_llm::DEFAULT_PORT));

        let local_max_new_tokens = std::env::var("VERDA_LOCAL_MAX_NEW_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_LOCAL_MAX_NEW_TOKENS);

        Ok(Self {
            api_token,
            remote_model,
            remote_url,
            local_url,
            local_max_new_tokens,
            sampling: SamplingParams::default(),
        })
    }

    /// Check if the config carries the required credential.
    pub fn is_valid(&self) -> bool {
        !self.api_token.is_empty()
    }

    /// Create a builder for configuration.
    pub fn builder() -> ChatConfigBuilder {
        ChatConfigBuilder::default()
    }
}

/// Builder for chat configuration.
#[derive(Debug, Default)]
pub struct ChatConfigBuilder {
    config: ChatConfig,
}

impl ChatConfigBuilder {
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.config.api_token = token.into();
        self
    }

    pub fn remote_model(mut self, model: impl Into<String>) -> Self {
        self.config.remote_model = model.into();
        self
    }

    pub fn remote_url(mut self, url: impl Into<String>) -> Self {
        self.config.remote_url = url.into();
        self
    }

    pub fn local_url(mut self, url: impl Into<String>) -> Self {
        self.config.local_url = url.into();
        self
    }

    pub fn local_max_new_tokens(mut self, tokens: u32) -> Self {
        self.config.local_max_new_tokens = tokens;
        self
    }

    pub fn sampling(mut self, sampling: SamplingParams) -> Self {
        self.config.sampling = sampling;
        self
    }

    pub fn build(self) -> ChatConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_token() {
        let config = ChatConfig::default();
        assert!(!config.is_valid());
        assert_eq!(config.remote_model, DEFAULT_REMOTE_MODEL);
        assert_eq!(config.local_max_new_tokens, 300);
    }

    #[test]
    fn test_builder() {
        let config = ChatConfig::builder()
            .api_token("hf_test")
            .remote_model("some-org/some-model")
            .local_max_new_tokens(64)
            .build();
        assert!(config.is_valid());
        assert_eq!(config.remote_model, "some-org/some-model");
        assert_eq!(config.local_max_new_tokens, 64);
    }

    #[test]
    fn test_from_env_requires_token() {
        // Sequential set/remove within one test; no other test touches HF_TOKEN.
        std::env::remove_var("HF_TOKEN");
        assert!(matches!(
            ChatConfig::from_env(),
            Err(ConfigError::MissingToken)
        ));

        std::env::set_var("HF_TOKEN", "");
        assert!(matches!(
            ChatConfig::from_env(),
            Err(ConfigError::MissingToken)
        ));

        std::env::set_var("HF_TOKEN", "hf_test");
        let config = ChatConfig::from_env().unwrap();
        assert_eq!(config.api_token, "hf_test");
        std::env::remove_var("HF_TOKEN");
    }
}
