//! Embedder configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_pad_token_id() -> i64 {
    0
}

fn default_intra_threads() -> usize {
    2
}

/// Configuration for the embedding engine.
///
/// The model path is the only required value; everything else has a
/// conventional default.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedderConfig {
    /// Path to the ONNX model file.
    pub model_path: PathBuf,
    /// Token id the tokenizer uses for padding. Positions holding this id
    /// get a 0 in the attention mask.
    #[serde(default = "default_pad_token_id")]
    pub pad_token_id: i64,
    /// Intra-op thread count for the inference session.
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,
}

impl EmbedderConfig {
    /// Create a config for the given model file with default tunables.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            pad_token_id: default_pad_token_id(),
            intra_threads: default_intra_threads(),
        }
    }
}
