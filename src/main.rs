//! Linear Regression Predictor - Main Entry Point
//!
//! Loads the exported ONNX model and runs it on the configured inputs.

use anyhow::Result;
use linreg_onnx::{config::AppConfig, models::inference::Predictor, telemetry};
use tracing::info;

fn main() -> Result<()> {
    let config = AppConfig::load()?;
    telemetry::init(&config.logging)?;

    info!(path = %config.model.path.display(), "Starting predictor");

    let mut predictor = Predictor::load(&config.model)?;
    info!(
        input = predictor.input_name(),
        output = predictor.output_name(),
        "Predictor ready"
    );

    let inputs = &config.predict.inputs;
    let predictions = predictor.predict(inputs)?;

    for (i, (x, y)) in inputs.iter().zip(&predictions).enumerate() {
        info!(index = i, x = *x, y = *y, "Prediction");
    }
    println!("{:?}", predictions);

    predictor.metrics().print_summary();
    Ok(())
}
