//! # sema-embeddings
//!
//! `ONNX`-based token-sequence embedding engine.
//!
//! Turns a tokenized sequence into a dense vector via a locally loaded model:
//!
//! - **Tensor building**: ids, attention mask, and segment ids as `[1, seqLen]` arrays
//! - **Input binding**: case-insensitive mapping onto the model's declared input names
//! - **Inference**: one run per call on the blocking thread pool, via `ort`
//! - **Output resolution**: pooled output, then mean-pooled hidden states, then a flatten fallback
//! - **Lifecycle**: explicit idempotent release; use-after-release is an error
//!
//! The ONNX Runtime backend is behind the `ort` feature; [`mock::MockBackend`]
//! provides a deterministic stand-in for tests and model-free environments.

#![deny(unsafe_code)]

pub mod backend;
pub mod binding;
pub mod config;
pub mod embedder;
pub mod errors;
pub mod mock;
#[cfg(feature = "ort")]
pub mod onnx;
pub mod resolver;
pub mod tensors;

pub use backend::{InferenceBackend, NamedTensor};
pub use binding::InputBinding;
pub use config::EmbedderConfig;
pub use embedder::Embedder;
pub use errors::{EmbedError, Result};
pub use mock::MockBackend;
pub use tensors::InputTensorSet;
