//! ONNX model loader

use crate::onnx::inspect::{self, ModelSummary};
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::fs;
use std::path::Path;
use tracing::info;

/// Loaded ONNX model with metadata
pub struct LoadedModel {
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the model
    pub input_name: String,
    /// Output name for predictions
    pub output_name: String,
    /// Declared graph structure, read before the session is built
    pub summary: ModelSummary,
}

/// Loader for ONNX models
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load an ONNX model from file
    pub fn load_model<P: AsRef<Path>>(&self, path: P) -> Result<LoadedModel> {
        let path = path.as_ref();

        info!(path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let bytes =
            fs::read(path).with_context(|| format!("Failed to read model from {:?}", path))?;
        let proto = inspect::decode(&bytes)
            .with_context(|| format!("Invalid ONNX model at {:?}", path))?;
        let summary = inspect::summarize(&proto);

        info!(
            ir_version = summary.ir_version,
            producer = %summary.producer,
            opsets = ?summary.opsets,
            ops = ?summary.ops,
            inputs = summary.inputs.len(),
            outputs = summary.outputs.len(),
            "Model graph decoded"
        );
        for input in &summary.inputs {
            info!(name = %input.name, elem_type = ?input.elem_type, shape = %input.shape_string(), "Model input");
        }
        for output in &summary.outputs {
            info!(name = %output.name, elem_type = ?output.elem_type, shape = %output.shape_string(), "Model output");
        }

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_memory(&bytes)
            .with_context(|| format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .with_context(|| format!("Model at {:?} declares no inputs", path))?;

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .with_context(|| format!("Model at {:?} declares no outputs", path))?;

        info!(
            input = %input_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            session,
            input_name,
            output_name,
            summary,
        })
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}
