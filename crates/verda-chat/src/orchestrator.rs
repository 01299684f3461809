//! Conversation orchestrator: estimate, compose, dispatch, relay.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use verda_footprint::estimate;
use verda_local_llm::LocalLlmClient;

use crate::backend::{StreamingChat, TextCompletion};
use crate::config::ChatConfig;
use crate::error::ChatError;
use crate::metrics::{ActiveUserGuard, MetricsSink};
use crate::prompt;
use crate::remote::InferenceApiClient;
use crate::types::{BackendKind, ChatRequest, ChatTurn, SamplingParams};

/// Capacity of the reply channel between the orchestrator task and the host.
const REPLY_CHANNEL_CAPACITY: usize = 32;

/// Coordinates one user turn: footprint estimate, prompt assembly, backend
/// dispatch, and progressive relay of the reply.
///
/// Re-entrant; every [`respond`](Orchestrator::respond) call is an
/// independent unit of work. The local model is the one shared resource and
/// is guarded by a mutex, so concurrent local requests queue.
pub struct Orchestrator {
    local: Arc<Mutex<Box<dyn TextCompletion>>>,
    remote: Arc<dyn StreamingChat>,
    metrics: Arc<dyn MetricsSink>,
    sampling: SamplingParams,
    local_max_new_tokens: u32,
}

impl Orchestrator {
    /// Build an orchestrator with the concrete backends from configuration.
    pub fn new(config: &ChatConfig, metrics: Arc<dyn MetricsSink>) -> Result<Self, ChatError> {
        let local = LocalLlmClient::with_url(config.local_url.clone());
        let remote = InferenceApiClient::new(config)?;
        Ok(Self::with_backends(
            Box::new(local),
            Arc::new(remote),
            metrics,
            config.sampling,
            config.local_max_new_tokens,
        ))
    }

    /// Build an orchestrator from explicit backend implementations.
    pub fn with_backends(
        local: Box<dyn TextCompletion>,
        remote: Arc<dyn StreamingChat>,
        metrics: Arc<dyn MetricsSink>,
        sampling: SamplingParams,
        local_max_new_tokens: u32,
    ) -> Self {
        Self {
            local: Arc::new(Mutex::new(local)),
            remote,
            metrics,
            sampling,
            local_max_new_tokens,
        }
    }

    /// Handle one user turn.
    ///
    /// Returns a finite sequence of growing snapshots of the assistant's
    /// reply; every received value extends the previous one. The local path
    /// yields exactly one value. A backend failure arrives unmodified as the
    /// final item. Dropping the receiver stops the work at its next
    /// emission.
    pub fn respond(&self, request: ChatRequest) -> mpsc::Receiver<Result<String, ChatError>> {
        let (tx, rx) = mpsc::channel(REPLY_CHANNEL_CAPACITY);
        let local = Arc::clone(&self.local);
        let remote = Arc::clone(&self.remote);
        let metrics = Arc::clone(&self.metrics);
        let sampling = self.sampling;
        let local_max_new_tokens = self.local_max_new_tokens;

        tokio::spawn(async move {
            // The gauge guard lowers the count on every exit path.
            let _active = ActiveUserGuard::enter(Arc::clone(&metrics));

            let outcome = drive(
                request,
                local,
                remote,
                metrics,
                sampling,
                local_max_new_tokens,
                &tx,
            )
            .await;

            if let Err(e) = outcome {
                let _ = tx.send(Err(e)).await;
            }
        });

        rx
    }
}

async fn drive(
    request: ChatRequest,
    local: Arc<Mutex<Box<dyn TextCompletion>>>,
    remote: Arc<dyn StreamingChat>,
    metrics: Arc<dyn MetricsSink>,
    sampling: SamplingParams,
    local_max_new_tokens: u32,
    tx: &mpsc::Sender<Result<String, ChatError>>,
) -> Result<(), ChatError> {
    metrics.record_message_length(request.message.chars().count());

    let footprint = estimate(&request.activity);
    metrics.record_footprint(footprint.total_kg);

    let system_prompt = prompt::build_system_prompt(&footprint);

    match request.backend {
        BackendKind::Local => {
            metrics.record_model_usage(BackendKind::Local);
            let transcript =
                prompt::render_transcript(&system_prompt, &request.history, &request.message);

            let started = Instant::now();
            // One loaded model serves every local request; hold the lock for
            // the whole call so they run one at a time.
            let generator = local.lock().await;
            let reply = generator
                .complete(&transcript, local_max_new_tokens)
                .await?;
            drop(generator);
            metrics.record_inference_time(started.elapsed().as_secs_f64());

            debug!("local completion finished ({} chars)", reply.len());
            let _ = tx.send(Ok(reply)).await;
        }
        BackendKind::Remote => {
            metrics.record_model_usage(BackendKind::Remote);
            let mut turns = Vec::with_capacity(request.history.len() + 2);
            turns.push(ChatTurn::system(system_prompt));
            turns.extend(request.history.iter().cloned());
            turns.push(ChatTurn::user(request.message.clone()));

            let started = Instant::now();
            let mut fragments = remote.stream_chat(turns, sampling).await?;

            let mut reply = String::new();
            while let Some(fragment) = fragments.recv().await {
                let fragment = fragment?;
                if fragment.is_empty() {
                    continue;
                }
                metrics.record_stream_chunk();
                reply.push_str(&fragment);
                if tx.send(Ok(reply.clone())).await.is_err() {
                    // Receiver gone; stop relaying.
                    return Ok(());
                }
            }
            metrics.record_inference_time(started.elapsed().as_secs_f64());

            debug!("remote stream finished ({} chars)", reply.len());
        }
    }

    Ok(())
}
