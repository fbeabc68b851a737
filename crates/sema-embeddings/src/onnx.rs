//! ONNX Runtime backend.
//!
//! Wraps an `ort` [`Session`] behind [`InferenceBackend`]. Input and output
//! names are read from the model signature at load time; each run binds the
//! prepared arrays to the resolved input names and collects every
//! float-extractable output.

use std::borrow::Cow;

use ort::session::{Session, SessionInputValue, SessionInputs};
use ort::value::TensorRef;
use tracing::{debug, warn};

use crate::backend::{InferenceBackend, NamedTensor};
use crate::binding::InputBinding;
use crate::config::EmbedderConfig;
use crate::errors::{EmbedError, Result};
use crate::tensors::InputTensorSet;

/// Inference backend backed by an ONNX Runtime session.
pub struct OnnxBackend {
    session: Session,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl OnnxBackend {
    /// Load the model at the configured path into a new session.
    pub fn load(config: &EmbedderConfig) -> Result<Self> {
        let session = Session::builder()
            .map_err(load_error)?
            .with_intra_threads(config.intra_threads)
            .map_err(load_error)?
            .with_log_level(ort::logging::LogLevel::Warning)
            .map_err(load_error)?
            .commit_from_file(&config.model_path)
            .map_err(load_error)?;

        let input_names: Vec<String> = session
            .inputs()
            .iter()
            .map(|outlet| outlet.name().to_owned())
            .collect();
        let output_names: Vec<String> = session
            .outputs()
            .iter()
            .map(|outlet| outlet.name().to_owned())
            .collect();

        debug!(
            inputs = ?input_names,
            outputs = ?output_names,
            "onnx session loaded"
        );

        Ok(Self {
            session,
            input_names,
            output_names,
        })
    }
}

impl InferenceBackend for OnnxBackend {
    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn run(&mut self, tensors: &InputTensorSet, binding: &InputBinding) -> Result<Vec<NamedTensor>> {
        let shape = tensors.shape();
        let mut inputs: Vec<(Cow<'_, str>, SessionInputValue<'_>)> = Vec::with_capacity(3);

        if let Some(name) = binding.ids() {
            let tensor =
                TensorRef::from_array_view((shape, tensors.ids.as_slice())).map_err(run_error)?;
            inputs.push((Cow::Owned(name.to_owned()), tensor.into()));
        }
        if let Some(name) = binding.attention_mask() {
            let tensor = TensorRef::from_array_view((shape, tensors.attention_mask.as_slice()))
                .map_err(run_error)?;
            inputs.push((Cow::Owned(name.to_owned()), tensor.into()));
        }
        if let Some(name) = binding.token_type_ids() {
            let tensor = TensorRef::from_array_view((shape, tensors.token_type_ids.as_slice()))
                .map_err(run_error)?;
            inputs.push((Cow::Owned(name.to_owned()), tensor.into()));
        }

        let outputs = self
            .session
            .run(SessionInputs::from(inputs))
            .map_err(run_error)?;

        let mut collected = Vec::with_capacity(self.output_names.len());
        for name in &self.output_names {
            let Some(value) = outputs.get(name.as_str()) else {
                continue;
            };
            match value.try_extract_tensor::<f32>() {
                Ok((shape, data)) => collected.push(NamedTensor {
                    name: name.clone(),
                    shape: shape.to_vec(),
                    data: data.to_vec(),
                }),
                // Non-float outputs (token ids, lengths) are not embeddings.
                Err(error) => {
                    warn!(output = %name, %error, "skipping non-float output");
                }
            }
        }

        Ok(collected)
    }
}

fn load_error(error: ort::Error) -> EmbedError {
    EmbedError::ModelLoad(error.to_string())
}

fn run_error(error: ort::Error) -> EmbedError {
    EmbedError::Inference(error.to_string())
}
