//! Error types for the conversation orchestrator.

use thiserror::Error;

use crate::config::ConfigError;
use crate::remote::RemoteError;
use verda_local_llm::LocalLlmError;

/// Errors surfaced to the chat host.
///
/// Backend failures are delivered unmodified as the final item of the reply
/// stream; nothing here is retried or suppressed.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Startup configuration problem; the orchestrator never comes up.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The local model call failed.
    #[error("local inference failed: {0}")]
    Local(#[from] LocalLlmError),

    /// The remote streaming call failed.
    #[error("remote inference failed: {0}")]
    Remote(#[from] RemoteError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_error_display() {
        let err = ChatError::Local(LocalLlmError::Api("500: overloaded".to_string()));
        assert_eq!(
            err.to_string(),
            "local inference failed: API error: 500: overloaded"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ChatError::Config(ConfigError::MissingToken);
        assert!(err.to_string().starts_with("configuration error"));
    }
}
