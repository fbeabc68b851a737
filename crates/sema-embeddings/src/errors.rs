//! Embedding error types.
//!
//! Every failure propagates unchanged to the caller. The only
//! degrade-to-empty paths live in the embedder itself (empty input,
//! no extraction strategy matched) and never produce an error.

use thiserror::Error;

/// Errors from embedding operations.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// The token sequence argument is invalid (e.g. a negative id).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The configured model could not be loaded. Fatal, surfaces at startup.
    #[error("Model load failed: {0}")]
    ModelLoad(String),

    /// A single call's model run failed. Recoverable per call, no retry.
    #[error("Inference failed: {0}")]
    Inference(String),

    /// `embed` was called after the session was released.
    #[error("Inference session already released")]
    Disposed,

    /// The call was cancelled before the model run started.
    #[error("Embedding request cancelled")]
    Cancelled,

    /// Generic internal error (runtime plumbing such as task joins).
    #[error("{0}")]
    Internal(String),
}

/// Result alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbedError>;
