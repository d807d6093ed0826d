//! Single-model inference over a `(batch, 1)` float input

use crate::config::ModelConfig;
use crate::metrics::InferenceMetrics;
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::onnx::ModelSummary;
use anyhow::{bail, Context, Result};
use ort::value::Tensor;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Runs a loaded linear-regression graph.
pub struct Predictor {
    model: LoadedModel,
    metrics: InferenceMetrics,
}

impl Predictor {
    /// Load the model described by `config`.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        Self::load_from(&config.path, config.onnx_threads)
    }

    /// Load a model from `path` using `onnx_threads` intra-op threads.
    pub fn load_from<P: AsRef<Path>>(path: P, onnx_threads: usize) -> Result<Self> {
        let model = ModelLoader::with_threads(onnx_threads).load_model(path)?;
        Ok(Self {
            model,
            metrics: InferenceMetrics::new(),
        })
    }

    pub fn input_name(&self) -> &str {
        &self.model.input_name
    }

    pub fn output_name(&self) -> &str {
        &self.model.output_name
    }

    pub fn summary(&self) -> &ModelSummary {
        &self.model.summary
    }

    pub fn metrics(&self) -> &InferenceMetrics {
        &self.metrics
    }

    /// Predict one value per input, binding `inputs` as shape `[len, 1]`.
    pub fn predict(&mut self, inputs: &[f32]) -> Result<Vec<f32>> {
        self.predict_tensor(&[inputs.len(), 1], inputs)
    }

    /// Predict from an explicitly shaped batch.
    ///
    /// `shape` must be `[batch, 1]` with `data.len() == batch`. An empty batch
    /// yields an empty result without touching the runtime.
    pub fn predict_tensor(&mut self, shape: &[usize], data: &[f32]) -> Result<Vec<f32>> {
        let batch = check_input_shape(shape, data.len())?;
        if batch == 0 {
            debug!("Empty batch, skipping inference");
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let input_tensor = Tensor::from_array((vec![batch as i64, 1_i64], data.to_vec()))
            .context("Failed to create input tensor")?;

        let outputs = self
            .model
            .session
            .run(ort::inputs![&self.model.input_name => input_tensor])
            .context("Inference failed")?;

        let output = match outputs.get(&self.model.output_name) {
            Some(output) => output,
            None => bail!("Model produced no output named '{}'", self.model.output_name),
        };
        let (out_shape, values) = output
            .try_extract_tensor::<f32>()
            .with_context(|| format!("Output '{}' is not a float tensor", self.model.output_name))?;
        let dims: Vec<i64> = out_shape.iter().copied().collect();
        let predictions = flatten_output(&dims, values, batch)?;

        let elapsed = start.elapsed();
        self.metrics.record_run(elapsed, batch);
        debug!(
            batch = batch,
            elapsed_us = elapsed.as_micros() as u64,
            "Inference complete"
        );

        Ok(predictions)
    }
}

/// Validate an input shape against the `(batch, 1)` contract and return `batch`.
fn check_input_shape(shape: &[usize], len: usize) -> Result<usize> {
    match shape {
        [batch, 1] if *batch == len => Ok(*batch),
        [batch, 1] => bail!(
            "Input shape [{}, 1] needs {} values, got {}",
            batch,
            batch,
            len
        ),
        other => bail!("Expected input shape [batch, 1], got {:?}", other),
    }
}

/// Accept `[batch, 1]` or `[batch]` output and return one value per row.
fn flatten_output(dims: &[i64], values: &[f32], batch: usize) -> Result<Vec<f32>> {
    let rows_ok = match dims {
        [rows] | [rows, 1] => *rows as usize == batch,
        _ => false,
    };
    if !rows_ok || values.len() != batch {
        bail!(
            "Unexpected output shape {:?} with {} values for a batch of {}",
            dims,
            values.len(),
            batch
        );
    }
    Ok(values.to_vec())
}
