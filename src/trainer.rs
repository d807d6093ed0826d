//! Fit-and-export procedure

use crate::config::{ModelConfig, TrainConfig};
use crate::onnx::OnnxExporter;
use crate::regression;
use crate::types::{CheckPrediction, Dataset, TrainingReport};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Fits a linear model and writes it as an ONNX file.
pub struct Trainer {
    exporter: OnnxExporter,
    model_path: PathBuf,
    check_inputs: Vec<f64>,
}

impl Trainer {
    pub fn new(model: &ModelConfig, train: &TrainConfig) -> Self {
        Self {
            exporter: OnnxExporter::new(model.export_options()),
            model_path: model.path.clone(),
            check_inputs: train.check_inputs.clone(),
        }
    }

    /// Fit `dataset`, export the result and overwrite the model file.
    pub fn run(&self, dataset: &Dataset) -> Result<TrainingReport> {
        let fit = regression::fit(dataset);
        info!(
            coef = fit.params.coef,
            intercept = fit.params.intercept,
            mse = fit.mse,
            r2 = fit.r2,
            samples = fit.samples,
            "Model fitted"
        );

        let checks: Vec<CheckPrediction> = self
            .check_inputs
            .iter()
            .map(|&x| CheckPrediction {
                x,
                y: fit.params.predict(x),
            })
            .collect();
        for check in &checks {
            info!(x = check.x, y = check.y, "Check prediction");
        }

        let bytes = self.exporter.to_bytes(&fit.params);

        if let Some(parent) = self.model_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
        }
        fs::write(&self.model_path, &bytes)
            .with_context(|| format!("Failed to write model to {:?}", self.model_path))?;

        info!(
            path = %self.model_path.display(),
            bytes = bytes.len(),
            operators = ?self.exporter.options().operators,
            "ONNX model written"
        );

        Ok(TrainingReport {
            fit,
            checks,
            model_path: self.model_path.display().to_string(),
            bytes_written: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onnx::inspect;
    use crate::onnx::GraphOperators;

    fn model_config(dir: &std::path::Path) -> ModelConfig {
        ModelConfig {
            path: dir.join("nested").join("model.onnx"),
            ..Default::default()
        }
    }

    #[test]
    fn test_run_writes_model() {
        let dir = tempfile::tempdir().unwrap();
        let model = model_config(dir.path());
        let report = Trainer::new(&model, &TrainConfig::default())
            .run(&Dataset::reference())
            .unwrap();

        let bytes = fs::read(&model.path).unwrap();
        assert_eq!(bytes.len(), report.bytes_written);

        let params = inspect::linear_params(&inspect::decode(&bytes).unwrap()).unwrap();
        assert!((params.coef - 2.0).abs() < 1e-6);
        assert!(params.intercept.abs() < 1e-6);

        assert_eq!(report.checks.len(), 2);
        assert!((report.checks[0].y - 12.0).abs() < 1e-9);
        assert!((report.checks[1].y - 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_rerun_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let model = model_config(dir.path());
        let trainer = Trainer::new(&model, &TrainConfig::default());

        trainer.run(&Dataset::reference()).unwrap();
        let first = fs::read(&model.path).unwrap();
        trainer.run(&Dataset::reference()).unwrap();
        let second = fs::read(&model.path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let model = ModelConfig {
            operators: GraphOperators::MatmulAdd,
            ..model_config(dir.path())
        };
        fs::create_dir_all(model.path.parent().unwrap()).unwrap();
        fs::write(&model.path, b"stale").unwrap();

        Trainer::new(&model, &TrainConfig::default())
            .run(&Dataset::reference())
            .unwrap();

        let decoded = inspect::decode(&fs::read(&model.path).unwrap()).unwrap();
        assert_eq!(inspect::summarize(&decoded).ops, vec!["MatMul", "Add"]);
    }

    #[test]
    fn test_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        let model = ModelConfig {
            path: blocker.join("model.onnx"),
            ..Default::default()
        };

        let err = Trainer::new(&model, &TrainConfig::default())
            .run(&Dataset::reference())
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to create directory"));
    }
}
