//! Backend seams for the orchestrator.
//!
//! Two capabilities, matching the two dispatch paths: a one-shot completion
//! over a raw prompt (local model) and a streaming chat completion over
//! structured turns (hosted API). Trait objects keep the orchestrator
//! testable against scripted fakes.

use async_trait::async_trait;
use tokio::sync::mpsc;

use verda_local_llm::LocalLlmClient;

use crate::error::ChatError;
use crate::remote::InferenceApiClient;
use crate::types::{ChatTurn, SamplingParams};

/// One-shot text generation over a raw prompt string.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Generate at most `max_new_tokens` of text continuing `prompt`.
    async fn complete(&self, prompt: &str, max_new_tokens: u32) -> Result<String, ChatError>;
}

/// Streaming chat completion over structured turns.
///
/// Implementations deliver raw fragments in arrival order; accumulation into
/// prefix-complete snapshots is the orchestrator's job.
#[async_trait]
pub trait StreamingChat: Send + Sync {
    async fn stream_chat(
        &self,
        turns: Vec<ChatTurn>,
        params: SamplingParams,
    ) -> Result<mpsc::Receiver<Result<String, ChatError>>, ChatError>;
}

#[async_trait]
impl TextCompletion for LocalLlmClient {
    async fn complete(&self, prompt: &str, max_new_tokens: u32) -> Result<String, ChatError> {
        Ok(self.generate(prompt, max_new_tokens).await?)
    }
}

#[async_trait]
impl StreamingChat for InferenceApiClient {
    async fn stream_chat(
        &self,
        turns: Vec<ChatTurn>,
        params: SamplingParams,
    ) -> Result<mpsc::Receiver<Result<String, ChatError>>, ChatError> {
        let mut fragments = self.stream_chat_completion(turns, params).await?;

        // Re-wrap the client's channel into the orchestrator's error type.
        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(async move {
            while let Some(item) = fragments.recv().await {
                if tx.send(item.map_err(ChatError::from)).await.is_err() {
                    return;
                }
            }
        });

        Ok(rx)
    }
}
