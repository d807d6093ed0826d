//! Fitted model parameters and training reports

use serde::{Deserialize, Serialize};

/// Parameters of `y = coef * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    pub coef: f64,
    pub intercept: f64,
}

impl LinearParams {
    pub fn new(coef: f64, intercept: f64) -> Self {
        Self { coef, intercept }
    }

    /// Evaluate the affine map at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.coef * x + self.intercept
    }

    /// The parameters as they are stored in an exported graph.
    pub fn to_f32(&self) -> (f32, f32) {
        (self.coef as f32, self.intercept as f32)
    }
}

/// Outcome of an ordinary-least-squares fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub params: LinearParams,
    /// In-sample mean squared error
    pub mse: f64,
    /// Coefficient of determination on the training samples
    pub r2: f64,
    pub samples: usize,
}

/// Prediction made by the trainer as a sanity check before export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckPrediction {
    pub x: f64,
    pub y: f64,
}

/// Everything the trainer did in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub fit: FitReport,
    pub checks: Vec<CheckPrediction>,
    pub model_path: String,
    pub bytes_written: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict() {
        let params = LinearParams::new(2.0, 0.5);
        assert_eq!(params.predict(3.0), 6.5);
        assert_eq!(params.to_f32(), (2.0f32, 0.5f32));
    }

    #[test]
    fn test_report_serializes() {
        let report = TrainingReport {
            fit: FitReport {
                params: LinearParams::new(2.0, 0.0),
                mse: 0.0,
                r2: 1.0,
                samples: 5,
            },
            checks: vec![CheckPrediction { x: 6.0, y: 12.0 }],
            model_path: "model/model.onnx".to_string(),
            bytes_written: 200,
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"coef\":2.0"));
        let back: TrainingReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
