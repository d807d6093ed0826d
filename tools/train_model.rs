//! Linear Regression Trainer
//!
//! Fits the reference dataset and writes the ONNX model the predictor loads.

use anyhow::Result;
use linreg_onnx::{config::AppConfig, telemetry, trainer::Trainer, types::Dataset};
use tracing::info;

fn main() -> Result<()> {
    let config = AppConfig::load()?;
    telemetry::init(&config.logging)?;

    let dataset = Dataset::reference();
    info!(samples = dataset.len(), "Training on reference dataset");

    let report = Trainer::new(&config.model, &config.train).run(&dataset)?;

    info!(report = %serde_json::to_string(&report)?, "Training complete");
    println!(
        "coef = {}, intercept = {}",
        report.fit.params.coef, report.fit.params.intercept
    );
    for check in &report.checks {
        println!("x = {} -> y = {}", check.x, check.y);
    }

    Ok(())
}
