//! Ordinary least squares for a single feature

use crate::types::{Dataset, FitReport, LinearParams};
use tracing::{debug, warn};

/// Fit `y = coef * x + intercept` minimizing the sum of squared residuals.
///
/// Closed form on centered data. When every `x` is identical the slope is
/// undetermined and the minimum-norm solution is returned: `coef = 0`,
/// `intercept = mean(y)`.
pub fn fit(dataset: &Dataset) -> FitReport {
    let n = dataset.len() as f64;
    let x_mean = dataset.xs().sum::<f64>() / n;
    let y_mean = dataset.ys().sum::<f64>() / n;

    let (sxy, sxx) = dataset
        .samples()
        .iter()
        .fold((0.0, 0.0), |(sxy, sxx), s| {
            let dx = s.x - x_mean;
            (sxy + dx * (s.y - y_mean), sxx + dx * dx)
        });

    let coef = if sxx == 0.0 {
        warn!(x = x_mean, "All inputs are identical, slope set to zero");
        0.0
    } else {
        sxy / sxx
    };
    let params = LinearParams::new(coef, y_mean - coef * x_mean);

    let ss_res: f64 = dataset
        .samples()
        .iter()
        .map(|s| (s.y - params.predict(s.x)).powi(2))
        .sum();
    let ss_tot: f64 = dataset.ys().map(|y| (y - y_mean).powi(2)).sum();

    let r2 = if ss_tot == 0.0 {
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    };

    debug!(
        coef = params.coef,
        intercept = params.intercept,
        ss_res = ss_res,
        "Least-squares fit complete"
    );

    FitReport {
        params,
        mse: ss_res / n,
        r2,
        samples: dataset.len(),
    }
}
