//! Type definitions shared by the trainer and predictor

pub mod dataset;
pub mod params;

pub use dataset::{Dataset, Sample};
pub use params::{CheckPrediction, FitReport, LinearParams, TrainingReport};
