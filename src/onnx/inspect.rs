//! Read-only views over ONNX model bytes

use crate::onnx::export::ML_DOMAIN;
use crate::onnx::proto::{
    tensor_shape_proto::dimension, DataType, GraphProto, ModelProto, ValueInfoProto,
};
use crate::types::LinearParams;
use anyhow::{anyhow, bail, Context, Result};
use prost::Message;
use std::fmt;

/// Decode serialized ONNX bytes.
pub fn decode(bytes: &[u8]) -> Result<ModelProto> {
    if bytes.is_empty() {
        bail!("Model file is empty");
    }
    let model = ModelProto::decode(bytes).context("Failed to decode ONNX model")?;
    if model.graph.is_none() {
        bail!("ONNX model has no graph");
    }
    Ok(model)
}

/// A single tensor dimension as declared in the graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Dim {
    Fixed(i64),
    Symbolic(String),
    Unknown,
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dim::Fixed(n) => write!(f, "{}", n),
            Dim::Symbolic(name) => write!(f, "{}", name),
            Dim::Unknown => write!(f, "?"),
        }
    }
}

/// Name, element type and shape of a graph input or output.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorSignature {
    pub name: String,
    pub elem_type: Option<DataType>,
    pub dims: Vec<Dim>,
}

impl TensorSignature {
    fn from_value_info(info: &ValueInfoProto) -> Self {
        let tensor = info.tensor_type();
        let elem_type = tensor.and_then(|t| DataType::try_from(t.elem_type).ok());
        let dims = tensor
            .and_then(|t| t.shape.as_ref())
            .map(|shape| {
                shape
                    .dim
                    .iter()
                    .map(|d| match &d.value {
                        Some(dimension::Value::DimValue(n)) => Dim::Fixed(*n),
                        Some(dimension::Value::DimParam(p)) => Dim::Symbolic(p.clone()),
                        None => Dim::Unknown,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name: info.name.clone(),
            elem_type,
            dims,
        }
    }

    /// Dimensions formatted as `[N, 1]`.
    pub fn shape_string(&self) -> String {
        let dims: Vec<String> = self.dims.iter().map(|d| d.to_string()).collect();
        format!("[{}]", dims.join(", "))
    }
}

/// Human-oriented description of a model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSummary {
    pub ir_version: i64,
    pub producer: String,
    pub opsets: Vec<(String, i64)>,
    pub inputs: Vec<TensorSignature>,
    pub outputs: Vec<TensorSignature>,
    pub ops: Vec<String>,
}

/// Summarize a decoded model.
pub fn summarize(model: &ModelProto) -> ModelSummary {
    let empty = GraphProto::default();
    let graph = model.graph.as_ref().unwrap_or(&empty);

    ModelSummary {
        ir_version: model.ir_version,
        producer: format!("{} {}", model.producer_name, model.producer_version)
            .trim()
            .to_string(),
        opsets: model
            .opset_import
            .iter()
            .map(|o| {
                let domain = if o.domain.is_empty() {
                    "ai.onnx".to_string()
                } else {
                    o.domain.clone()
                };
                (domain, o.version)
            })
            .collect(),
        inputs: graph.input.iter().map(TensorSignature::from_value_info).collect(),
        outputs: graph.output.iter().map(TensorSignature::from_value_info).collect(),
        ops: graph.node.iter().map(|n| n.op_type.clone()).collect(),
    }
}

/// Recover the slope and intercept from an exported single-feature model.
///
/// Understands both the `LinearRegressor` and the `MatMul`/`Add` layouts.
pub fn linear_params(model: &ModelProto) -> Result<LinearParams> {
    let graph = model
        .graph
        .as_ref()
        .ok_or_else(|| anyhow!("ONNX model has no graph"))?;

    if let Some(node) = graph
        .node
        .iter()
        .find(|n| n.op_type == "LinearRegressor" && n.domain == ML_DOMAIN)
    {
        let single = |name: &str| -> Result<f32> {
            let attr = node
                .attribute
                .iter()
                .find(|a| a.name == name)
                .ok_or_else(|| anyhow!("LinearRegressor is missing '{}'", name))?;
            match attr.floats.as_slice() {
                [v] => Ok(*v),
                other => bail!("Expected one value in '{}', found {}", name, other.len()),
            }
        };
        return Ok(LinearParams::new(
            single("coefficients")? as f64,
            single("intercepts")? as f64,
        ));
    }

    let initializer = |name: &str| -> Option<f32> {
        graph
            .initializer
            .iter()
            .find(|t| t.name == name)
            .and_then(|t| match t.f32_values().as_slice() {
                [v] => Some(*v),
                _ => None,
            })
    };

    let matmul = graph.node.iter().find(|n| n.op_type == "MatMul");
    let add = graph.node.iter().find(|n| n.op_type == "Add");
    if let (Some(matmul), Some(add)) = (matmul, add) {
        let coef = matmul.input.iter().find_map(|i| initializer(i));
        let intercept = add.input.iter().find_map(|i| initializer(i));
        if let (Some(coef), Some(intercept)) = (coef, intercept) {
            return Ok(LinearParams::new(coef as f64, intercept as f64));
        }
    }

    bail!("Graph is not a single-feature linear model")
}
