//! Inference backend seam.
//!
//! The embedder talks to the model runtime through [`InferenceBackend`] so
//! the pipeline can be exercised without a real model. The ONNX Runtime
//! implementation lives in the feature-gated [`crate::onnx`] module; a
//! deterministic test double lives in [`crate::mock`].

use crate::binding::InputBinding;
use crate::errors::Result;
use crate::tensors::InputTensorSet;

/// One named output tensor from a model run.
///
/// Only float-extractable outputs are collected; integer-valued outputs are
/// skipped by the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedTensor {
    /// Output name as declared by the model.
    pub name: String,
    /// Tensor dimensions.
    pub shape: Vec<i64>,
    /// Row-major element data.
    pub data: Vec<f32>,
}

impl NamedTensor {
    /// Tensor rank (number of dimensions).
    pub fn rank(&self) -> usize {
        self.shape.len()
    }
}

/// A loaded model that can run one inference per call.
///
/// Implementations execute the model exactly once per `run` and return the
/// full named output set, in declaration order. No retry, no timeout.
pub trait InferenceBackend: Send {
    /// Input names the model declares, fixed at load time.
    fn input_names(&self) -> &[String];

    /// Run the model once against the bound inputs.
    fn run(&mut self, tensors: &InputTensorSet, binding: &InputBinding) -> Result<Vec<NamedTensor>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_follows_shape() {
        let tensor = NamedTensor {
            name: "out".into(),
            shape: vec![1, 3, 4],
            data: vec![0.0; 12],
        };
        assert_eq!(tensor.rank(), 3);
    }

    #[test]
    fn backend_trait_is_object_safe() {
        fn assert_object_safe(_: &dyn InferenceBackend) {}
        let _ = assert_object_safe;
    }
}
