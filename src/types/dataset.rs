//! Training dataset

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// One observation: a scalar input and its target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

/// Ordered, validated set of samples used to fit a model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    /// Build a dataset from `(x, y)` pairs.
    ///
    /// Rejects an empty set and any non-finite value.
    pub fn new(pairs: impl IntoIterator<Item = (f64, f64)>) -> Result<Self> {
        let samples: Vec<Sample> = pairs.into_iter().map(|(x, y)| Sample { x, y }).collect();

        if samples.is_empty() {
            bail!("Dataset is empty");
        }
        if let Some((i, s)) = samples
            .iter()
            .enumerate()
            .find(|(_, s)| !s.x.is_finite() || !s.y.is_finite())
        {
            bail!("Sample {} has a non-finite value: x={}, y={}", i, s.x, s.y);
        }

        Ok(Self { samples })
    }

    /// The fixed training set: `y = 2x` for `x` in `1..=5`.
    pub fn reference() -> Self {
        Self {
            samples: (1..=5)
                .map(|i| Sample {
                    x: i as f64,
                    y: 2.0 * i as f64,
                })
                .collect(),
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed dataset.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterator over the inputs.
    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.x)
    }

    /// Iterator over the targets.
    pub fn ys(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_dataset() {
        let ds = Dataset::reference();
        assert_eq!(ds.len(), 5);
        assert_eq!(ds.xs().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(ds.ys().collect::<Vec<_>>(), vec![2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_rejects_empty() {
        assert!(Dataset::new(Vec::<(f64, f64)>::new()).is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        let err = Dataset::new(vec![(1.0, 2.0), (f64::NAN, 3.0)]).unwrap_err();
        assert!(err.to_string().contains("Sample 1"));
        assert!(Dataset::new(vec![(1.0, f64::INFINITY)]).is_err());
    }
}
