//! ONNX encoding, export and inspection

pub mod export;
pub mod inspect;
pub mod proto;

pub use export::{ExportOptions, GraphOperators, OnnxExporter};
pub use inspect::{ModelSummary, TensorSignature};
