//! Export of fitted linear parameters as an ONNX graph

use crate::onnx::proto::{
    tensor_shape_proto::Dimension, AttributeProto, DataType, GraphProto, ModelProto, NodeProto,
    OperatorSetIdProto, TensorProto, ValueInfoProto,
};
use crate::types::LinearParams;
use prost::Message;
use serde::{Deserialize, Serialize};

/// Domain of the classic-ML operator set.
pub const ML_DOMAIN: &str = "ai.onnx.ml";
/// IR version written into exported models.
pub const IR_VERSION: i64 = 8;
/// Default-domain opset written into exported models.
pub const CORE_OPSET: i64 = 17;
/// `ai.onnx.ml` opset written into exported models.
pub const ML_OPSET: i64 = 1;

/// Symbolic name of the batch dimension.
const BATCH_DIM: &str = "N";

/// Operators used to express `y = coef * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphOperators {
    /// A single `ai.onnx.ml.LinearRegressor` node
    #[default]
    LinearRegressor,
    /// `MatMul` followed by `Add`, parameters as initializers
    MatmulAdd,
}

/// Naming and layout of the exported graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub input_name: String,
    pub output_name: String,
    pub operators: GraphOperators,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            input_name: "float_input".to_string(),
            output_name: "variable".to_string(),
            operators: GraphOperators::default(),
        }
    }
}

/// Builds ONNX models from fitted parameters.
///
/// Output is a pure function of the options and parameters, so exporting the
/// same fit twice produces identical bytes.
pub struct OnnxExporter {
    options: ExportOptions,
}

impl OnnxExporter {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Build the model proto for `params`.
    pub fn export(&self, params: &LinearParams) -> ModelProto {
        let (coef, intercept) = params.to_f32();
        let opts = &self.options;

        let (node, initializer) = match opts.operators {
            GraphOperators::LinearRegressor => (
                vec![NodeProto {
                    input: vec![opts.input_name.clone()],
                    output: vec![opts.output_name.clone()],
                    name: "LinearRegressor".to_string(),
                    op_type: "LinearRegressor".to_string(),
                    domain: ML_DOMAIN.to_string(),
                    attribute: vec![
                        AttributeProto::floats("coefficients", vec![coef]),
                        AttributeProto::floats("intercepts", vec![intercept]),
                        AttributeProto::string("post_transform", "NONE"),
                    ],
                    ..Default::default()
                }],
                Vec::new(),
            ),
            GraphOperators::MatmulAdd => (
                vec![
                    NodeProto {
                        input: vec![opts.input_name.clone(), "coef".to_string()],
                        output: vec!["multiplied".to_string()],
                        name: "MatMul".to_string(),
                        op_type: "MatMul".to_string(),
                        ..Default::default()
                    },
                    NodeProto {
                        input: vec!["multiplied".to_string(), "intercept".to_string()],
                        output: vec![opts.output_name.clone()],
                        name: "Add".to_string(),
                        op_type: "Add".to_string(),
                        ..Default::default()
                    },
                ],
                vec![
                    TensorProto::from_f32("coef", vec![1, 1], vec![coef]),
                    TensorProto::from_f32("intercept", vec![1], vec![intercept]),
                ],
            ),
        };

        let batch_by_one = || vec![Dimension::symbolic(BATCH_DIM), Dimension::fixed(1)];

        let graph = GraphProto {
            name: "linear_regression".to_string(),
            node,
            initializer,
            input: vec![ValueInfoProto::tensor(
                &opts.input_name,
                DataType::Float,
                batch_by_one(),
            )],
            output: vec![ValueInfoProto::tensor(
                &opts.output_name,
                DataType::Float,
                batch_by_one(),
            )],
            ..Default::default()
        };

        ModelProto {
            ir_version: IR_VERSION,
            producer_name: env!("CARGO_PKG_NAME").to_string(),
            producer_version: env!("CARGO_PKG_VERSION").to_string(),
            domain: "linreg".to_string(),
            model_version: 1,
            doc_string: format!("y = {} * x + {}", coef, intercept),
            graph: Some(graph),
            opset_import: vec![
                OperatorSetIdProto {
                    domain: String::new(),
                    version: CORE_OPSET,
                },
                OperatorSetIdProto {
                    domain: ML_DOMAIN.to_string(),
                    version: ML_OPSET,
                },
            ],
            metadata_props: Vec::new(),
        }
    }

    /// Serialized model bytes for `params`.
    pub fn to_bytes(&self, params: &LinearParams) -> Vec<u8> {
        self.export(params).encode_to_vec()
    }
}

impl Default for OnnxExporter {
    fn default() -> Self {
        Self::new(ExportOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_regressor_layout() {
        let model = OnnxExporter::default().export(&LinearParams::new(2.0, 0.0));
        let graph = model.graph.as_ref().unwrap();

        assert_eq!(graph.node.len(), 1);
        let node = &graph.node[0];
        assert_eq!(node.op_type, "LinearRegressor");
        assert_eq!(node.domain, ML_DOMAIN);
        assert_eq!(node.input, vec!["float_input"]);
        assert_eq!(node.output, vec!["variable"]);

        let coefficients = node.attribute.iter().find(|a| a.name == "coefficients").unwrap();
        assert_eq!(coefficients.floats, vec![2.0]);
        assert!(graph.initializer.is_empty());
    }

    #[test]
    fn test_matmul_add_layout() {
        let exporter = OnnxExporter::new(ExportOptions {
            operators: GraphOperators::MatmulAdd,
            ..Default::default()
        });
        let model = exporter.export(&LinearParams::new(1.5, -3.0));
        let graph = model.graph.as_ref().unwrap();

        let ops: Vec<&str> = graph.node.iter().map(|n| n.op_type.as_str()).collect();
        assert_eq!(ops, vec!["MatMul", "Add"]);
        assert_eq!(graph.node[1].output, vec!["variable"]);
        assert_eq!(graph.initializer[0].dims, vec![1, 1]);
        assert_eq!(graph.initializer[0].float_data, vec![1.5]);
        assert_eq!(graph.initializer[1].float_data, vec![-3.0]);
    }

    #[test]
    fn test_custom_names() {
        let exporter = OnnxExporter::new(ExportOptions {
            input_name: "x".to_string(),
            output_name: "y".to_string(),
            operators: GraphOperators::LinearRegressor,
        });
        let graph = exporter.export(&LinearParams::new(1.0, 1.0)).graph.unwrap();

        assert_eq!(graph.input[0].name, "x");
        assert_eq!(graph.output[0].name, "y");
    }

    #[test]
    fn test_export_is_bit_identical() {
        let exporter = OnnxExporter::default();
        let params = LinearParams::new(2.0, 1e-9);
        assert_eq!(exporter.to_bytes(&params), exporter.to_bytes(&params));
    }

    #[test]
    fn test_opsets_declared() {
        let model = OnnxExporter::default().export(&LinearParams::new(2.0, 0.0));
        assert_eq!(model.ir_version, IR_VERSION);
        assert!(model
            .opset_import
            .iter()
            .any(|o| o.domain.is_empty() && o.version == CORE_OPSET));
        assert!(model
            .opset_import
            .iter()
            .any(|o| o.domain == ML_DOMAIN && o.version == ML_OPSET));
    }
}
