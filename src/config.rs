//! Configuration for the trainer and predictor

use crate::onnx::{ExportOptions, GraphOperators};
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Where [`AppConfig::load`] looks for overrides.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub train: TrainConfig,
    pub predict: PredictConfig,
    pub logging: LoggingConfig,
}

/// Model artifact configuration, shared by both procedures
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// Path of the ONNX file written by the trainer and read by the predictor
    pub path: PathBuf,
    /// Name of the graph input
    pub input_name: String,
    /// Name of the graph output
    pub output_name: String,
    /// Operators used to express the affine map
    pub operators: GraphOperators,
    /// Number of intra-op threads for ONNX Runtime (default: 1)
    pub onnx_threads: usize,
}

impl ModelConfig {
    /// Exporter options matching this configuration.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            input_name: self.input_name.clone(),
            output_name: self.output_name.clone(),
            operators: self.operators,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        let export = ExportOptions::default();
        Self {
            path: PathBuf::from("model/model.onnx"),
            input_name: export.input_name,
            output_name: export.output_name,
            operators: export.operators,
            onnx_threads: 1,
        }
    }
}

/// Trainer configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrainConfig {
    /// Inputs evaluated with the fitted parameters before export
    pub check_inputs: Vec<f64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            check_inputs: vec![6.0, 7.0],
        }
    }
}

/// Predictor configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PredictConfig {
    /// Batch fed to the loaded model
    pub inputs: Vec<f32>,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            inputs: vec![8.0, 9.0],
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location.
    ///
    /// A missing file is not an error; every field falls back to its default.
    pub fn load() -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .with_context(|| format!("Failed to build configuration from {:?}", path.as_ref()))?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
