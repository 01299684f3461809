//! Conversation and request types.

use serde::{Deserialize, Serialize};
use verda_footprint::ActivityInput;

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Upper-case tag used when rendering a transcript line.
    pub fn tag(&self) -> &'static str {
        match self {
            Role::System => "SYSTEM",
            Role::User => "USER",
            Role::Assistant => "ASSISTANT",
        }
    }
}

/// One turn of a conversation.
///
/// Serializes to the `{"role": ..., "content": ...}` wire shape chat
/// completion APIs expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Which backend handles a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// The managed local model; one full-text result per call.
    Local,
    /// The hosted streaming inference API.
    Remote,
}

impl BackendKind {
    /// Label used on usage metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Local => "local",
            BackendKind::Remote => "remote",
        }
    }
}

/// Sampling parameters for the remote backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_tokens: 3000,
            temperature: 0.7,
            top_p: 0.95,
        }
    }
}

/// One user turn, complete with the context needed to answer it.
///
/// History is supplied by the host on every call; the orchestrator retains
/// nothing between requests.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<ChatTurn>,
    pub activity: ActivityInput,
    pub backend: BackendKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_tags() {
        assert_eq!(Role::System.tag(), "SYSTEM");
        assert_eq!(Role::User.tag(), "USER");
        assert_eq!(Role::Assistant.tag(), "ASSISTANT");
    }

    #[test]
    fn test_turn_serializes_lowercase_role() {
        let turn = ChatTurn::user("hello");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn test_backend_labels() {
        assert_eq!(BackendKind::Local.as_str(), "local");
        assert_eq!(BackendKind::Remote.as_str(), "remote");
    }

    #[test]
    fn test_default_sampling() {
        let params = SamplingParams::default();
        assert_eq!(params.max_tokens, 3000);
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.top_p, 0.95);
    }
}
