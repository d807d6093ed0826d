//! Linear Regression over ONNX
//!
//! Fits `y = coef * x + intercept` by ordinary least squares, exports the
//! parameters as an ONNX graph and evaluates that graph with ONNX Runtime.
//! The trainer and predictor binaries share nothing but the model file.

pub mod config;
pub mod metrics;
pub mod models;
pub mod onnx;
pub mod regression;
pub mod telemetry;
pub mod trainer;
pub mod types;

pub use config::AppConfig;
pub use models::inference::Predictor;
pub use onnx::{GraphOperators, OnnxExporter};
pub use trainer::Trainer;
pub use types::{Dataset, LinearParams, TrainingReport};
