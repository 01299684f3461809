//! # Verda Chat Orchestration
//!
//! This crate coordinates one user turn of the sustainability assistant:
//! estimate the footprint, assemble the prompt, dispatch to a backend, and
//! relay the reply progressively.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │  Message +      │ --> │  Orchestrator   │ --> │  Reply stream   │
//! │  Activity       │     │ (Local/Remote)  │     │  (snapshots)    │
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//!                               │
//!                         ┌─────┴─────┐
//!                         │  Metrics  │
//!                         └───────────┘
//! ```
//!
//! ## Backends
//!
//! - **Local** - a managed llama.cpp server; one full-text reply per call
//! - **Remote** - a hosted streaming chat-completion API; the reply grows
//!   snapshot by snapshot as fragments arrive
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use verda_chat::{ChatConfig, ChatRequest, Orchestrator, UsageMetrics};
//!
//! let config = ChatConfig::from_env()?;
//! let metrics = Arc::new(UsageMetrics::new());
//! let orchestrator = Orchestrator::new(&config, metrics)?;
//!
//! let mut reply = orchestrator.respond(request);
//! while let Some(snapshot) = reply.recv().await {
//!     print!("{}", snapshot?);
//! }
//! ```

mod backend;
mod config;
mod error;
mod metrics;
mod orchestrator;
pub mod prompt;
mod remote;
mod types;

pub use backend::{StreamingChat, TextCompletion};
pub use config::{ChatConfig, ChatConfigBuilder, ConfigError};
pub use error::ChatError;
pub use metrics::{MetricsSink, NoopMetrics, UsageMetrics};
pub use orchestrator::Orchestrator;
pub use remote::{InferenceApiClient, RemoteError, DEFAULT_REMOTE_MODEL, DEFAULT_REMOTE_URL};
pub use types::{BackendKind, ChatRequest, ChatTurn, Role, SamplingParams};

// Re-export estimator types for hosts
pub use verda_footprint::{estimate, ActivityInput, EmissionsFactors, FootprintResult};

// Re-export local backend types
pub use verda_local_llm::{
    paths as local_llm_paths, LlamaServer, LocalLlmClient, LocalLlmError, ModelInfo, ModelManager,
    DEFAULT_MODEL_FILENAME, DEFAULT_MODEL_NAME, DEFAULT_PORT as DEFAULT_LOCAL_PORT,
};
