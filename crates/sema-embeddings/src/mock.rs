//! Deterministic mock backend for testing without a model file.
//!
//! Hashes the token ids with SHA-256 and uses the digest bytes as vector
//! components, published as a `pooler_output` tensor so the full resolution
//! path is exercised.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use sha2::{Digest, Sha256};

use crate::backend::{InferenceBackend, NamedTensor};
use crate::binding::{ATTENTION_MASK_INPUT, IDS_INPUT, InputBinding, TOKEN_TYPE_IDS_INPUT};
use crate::errors::Result;
use crate::tensors::InputTensorSet;

/// Mock inference backend with a fixed hidden dimension.
pub struct MockBackend {
    dims: usize,
    input_names: Vec<String>,
    invocations: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Create a mock backend producing vectors of the given dimension.
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            input_names: vec![
                IDS_INPUT.to_string(),
                ATTENTION_MASK_INPUT.to_string(),
                TOKEN_TYPE_IDS_INPUT.to_string(),
            ],
            invocations: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times the model has been run.
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    /// Shared handle to the invocation counter, for use after the backend
    /// has been moved into an embedder.
    pub fn invocation_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.invocations)
    }

    fn hash_to_vector(&self, ids: &[i64]) -> Vec<f32> {
        let mut hasher = Sha256::new();
        for id in ids {
            hasher.update(id.to_le_bytes());
        }
        let hash = hasher.finalize();

        (0..self.dims)
            .map(|i| {
                let byte = hash[i % hash.len()];
                // Map byte to [-1, 1] range
                (f32::from(byte) / 127.5) - 1.0
            })
            .collect()
    }
}

impl InferenceBackend for MockBackend {
    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn run(&mut self, tensors: &InputTensorSet, _binding: &InputBinding) -> Result<Vec<NamedTensor>> {
        let _ = self.invocations.fetch_add(1, Ordering::SeqCst);
        let data = self.hash_to_vector(&tensors.ids);
        Ok(vec![NamedTensor {
            name: "pooler_output".to_string(),
            shape: vec![1, self.dims as i64],
            data,
        }])
    }
}
