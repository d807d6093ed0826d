//! Train, export, reload with ONNX Runtime and predict.

use linreg_onnx::config::{ModelConfig, TrainConfig};
use linreg_onnx::models::inference::Predictor;
use linreg_onnx::onnx::GraphOperators;
use linreg_onnx::trainer::Trainer;
use linreg_onnx::types::Dataset;
use std::fs;
use std::sync::atomic::Ordering;

fn train(dir: &std::path::Path, operators: GraphOperators) -> ModelConfig {
    let model = ModelConfig {
        path: dir.join("model").join("model.onnx"),
        operators,
        ..Default::default()
    };
    Trainer::new(&model, &TrainConfig::default())
        .run(&Dataset::reference())
        .expect("training failed");
    model
}

fn assert_close(actual: &[f32], expected: &[f32]) {
    assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-3, "{:?} vs {:?}", actual, expected);
    }
}

#[test]
fn test_predicts_unseen_inputs() {
    for operators in [GraphOperators::LinearRegressor, GraphOperators::MatmulAdd] {
        let dir = tempfile::tempdir().unwrap();
        let model = train(dir.path(), operators);

        let mut predictor = Predictor::load(&model).unwrap();
        assert_eq!(predictor.input_name(), "float_input");
        assert_eq!(predictor.output_name(), "variable");

        assert_close(&predictor.predict(&[6.0, 7.0]).unwrap(), &[12.0, 14.0]);
        assert_close(&predictor.predict(&[8.0, 9.0]).unwrap(), &[16.0, 18.0]);
        assert_eq!(predictor.metrics().runs.load(Ordering::Relaxed), 2);
    }
}

#[test]
fn test_empty_batch_returns_empty() {
    let dir = tempfile::tempdir().unwrap();
    let model = train(dir.path(), GraphOperators::LinearRegressor);
    let mut predictor = Predictor::load(&model).unwrap();

    assert!(predictor.predict(&[]).unwrap().is_empty());
    assert_eq!(predictor.metrics().runs.load(Ordering::Relaxed), 0);
}

#[test]
fn test_rejects_wrong_shape() {
    let dir = tempfile::tempdir().unwrap();
    let model = train(dir.path(), GraphOperators::LinearRegressor);
    let mut predictor = Predictor::load(&model).unwrap();

    assert!(predictor.predict_tensor(&[1, 2], &[6.0, 7.0]).is_err());
    assert!(predictor.predict_tensor(&[2, 1], &[6.0]).is_err());
    assert_close(
        &predictor.predict_tensor(&[2, 1], &[6.0, 7.0]).unwrap(),
        &[12.0, 14.0],
    );
}

#[test]
fn test_missing_and_corrupt_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.onnx");
    assert!(Predictor::load_from(&path, 1).is_err());

    fs::write(&path, b"\x08\x08 truncated").unwrap();
    assert!(Predictor::load_from(&path, 1).is_err());
}

#[test]
fn test_retraining_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let model = train(dir.path(), GraphOperators::LinearRegressor);
    let first = fs::read(&model.path).unwrap();

    train(dir.path(), GraphOperators::LinearRegressor);
    let second = fs::read(&model.path).unwrap();
    assert_eq!(first, second);

    let mut predictor = Predictor::load(&model).unwrap();
    assert_close(&predictor.predict(&[6.0, 7.0]).unwrap(), &[12.0, 14.0]);
}
