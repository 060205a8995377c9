//! Feature scaling

use crate::error::{PredictorError, Result};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Fitted standard scaler: `(x - mean) / scale`.
///
/// `scale` holds the per-feature standard deviation recorded at fit time.
/// A zero entry is treated as 1 so constant features pass through centered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        let scaler = Self { mean, scale };
        scaler.check_shape()?;
        Ok(scaler)
    }

    /// Number of features the scaler was fitted on
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub(crate) fn check_shape(&self) -> Result<()> {
        if self.mean.len() != self.scale.len() {
            return Err(PredictorError::ShapeError {
                expected: format!("scale length = {}", self.mean.len()),
                actual: format!("scale length = {}", self.scale.len()),
            });
        }
        Ok(())
    }

    /// Scale one feature vector
    pub fn transform(&self, features: ArrayView1<f64>) -> Result<Array1<f64>> {
        if features.len() != self.n_features() {
            return Err(PredictorError::ShapeError {
                expected: format!("{} features", self.n_features()),
                actual: format!("{} features", features.len()),
            });
        }

        let scaled = features
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(&x, (&center, &scale))| {
                let scale = if scale == 0.0 { 1.0 } else { scale };
                (x - center) / scale
            })
            .collect();

        Ok(Array1::from_vec(scaled))
    }
}
