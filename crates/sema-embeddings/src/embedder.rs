//! The embedding contract and session lifecycle.
//!
//! [`Embedder`] owns the loaded model for the process lifetime, orchestrates
//! tensor building, input binding, the single model run, and output
//! resolution, and exposes one explicit release. The session state is
//! `Ready | Disposed`; the underlying runtime requires exclusive access for
//! a run, so concurrent callers queue on an async mutex while execution
//! itself happens on the blocking thread pool.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::backend::InferenceBackend;
use crate::binding::InputBinding;
use crate::config::EmbedderConfig;
use crate::errors::{EmbedError, Result};
use crate::resolver::resolve_embedding;
use crate::tensors::InputTensorSet;

/// Lifecycle states of the shared inference session.
enum SessionState {
    /// Model loaded and available for runs.
    Ready(Box<dyn InferenceBackend>),
    /// Session released; all further calls fail.
    Disposed,
}

/// Token-sequence embedder backed by a loaded inference session.
///
/// Construct once per process (the load cost is paid once), share across
/// tasks, and release exactly once on shutdown. The caller must ensure no
/// `embed` call is in flight during or after [`Embedder::release`].
pub struct Embedder {
    config: EmbedderConfig,
    binding: InputBinding,
    state: Arc<Mutex<SessionState>>,
}

impl Embedder {
    /// Load the configured ONNX model and wrap it in an embedder.
    ///
    /// Session creation is blocking I/O and runs on the blocking thread pool.
    #[cfg(feature = "ort")]
    pub async fn load(config: EmbedderConfig) -> Result<Self> {
        let backend = tokio::task::spawn_blocking({
            let config = config.clone();
            move || crate::onnx::OnnxBackend::load(&config)
        })
        .await
        .map_err(|e| EmbedError::Internal(format!("join: {e}")))??;

        info!(model = %config.model_path.display(), "inference session ready");
        Ok(Self::from_backend(config, Box::new(backend)))
    }

    /// Wrap an already-constructed backend.
    ///
    /// The input binding is resolved here, once; the model's input signature
    /// is fixed at load time.
    pub fn from_backend(config: EmbedderConfig, backend: Box<dyn InferenceBackend>) -> Self {
        let binding = InputBinding::resolve(backend.input_names());
        Self {
            config,
            binding,
            state: Arc::new(Mutex::new(SessionState::Ready(backend))),
        }
    }

    /// The configuration this embedder was built with.
    pub fn config(&self) -> &EmbedderConfig {
        &self.config
    }

    /// Embed a token-id sequence into a dense vector.
    ///
    /// Empty input returns an empty vector immediately, without invoking the
    /// model. Non-empty input returns a vector whose length equals the
    /// model's hidden dimension; identical input on the same session yields
    /// an identical vector.
    pub async fn embed(&self, token_ids: &[i64]) -> Result<Vec<f32>> {
        self.embed_cancellable(token_ids, &CancellationToken::new())
            .await
    }

    /// [`Embedder::embed`] with cooperative cancellation.
    ///
    /// The token is checked only before the run starts; once a run is in
    /// flight, cancellation is a no-op for that call.
    pub async fn embed_cancellable(
        &self,
        token_ids: &[i64],
        cancel: &CancellationToken,
    ) -> Result<Vec<f32>> {
        if let Some(&id) = token_ids.iter().find(|&&id| id < 0) {
            return Err(EmbedError::InvalidArgument(format!(
                "negative token id {id}"
            )));
        }

        let mut guard = Arc::clone(&self.state).lock_owned().await;
        if matches!(*guard, SessionState::Disposed) {
            return Err(EmbedError::Disposed);
        }

        if token_ids.is_empty() {
            debug!("empty token sequence; returning empty embedding");
            return Ok(Vec::new());
        }

        if cancel.is_cancelled() {
            return Err(EmbedError::Cancelled);
        }

        let tensors = InputTensorSet::build(token_ids, self.config.pad_token_id);
        let binding = self.binding.clone();

        // The runtime needs &mut for the run, so the owned guard travels to
        // the blocking thread and unlocks there when the run finishes.
        let outputs = tokio::task::spawn_blocking(move || {
            let SessionState::Ready(backend) = &mut *guard else {
                return Err(EmbedError::Disposed);
            };
            backend.run(&tensors, &binding)
        })
        .await
        .map_err(|e| EmbedError::Internal(format!("join: {e}")))??;

        Ok(resolve_embedding(&outputs))
    }

    /// Release the inference session, freeing the underlying resources.
    ///
    /// Idempotent; only the first call drops the session. Any `embed` call
    /// after release fails with [`EmbedError::Disposed`].
    pub async fn release(&self) {
        let mut guard = self.state.lock().await;
        match std::mem::replace(&mut *guard, SessionState::Disposed) {
            SessionState::Ready(_) => info!("inference session released"),
            SessionState::Disposed => debug!("release called on already-disposed session"),
        }
    }

    /// Whether the session has been released.
    pub async fn is_disposed(&self) -> bool {
        matches!(*self.state.lock().await, SessionState::Disposed)
    }
}
