//! ONNX Runtime model loading and inference

pub mod inference;
pub mod loader;

pub use inference::Predictor;
pub use loader::{LoadedModel, ModelLoader};
