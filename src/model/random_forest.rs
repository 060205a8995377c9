//! Random forest regressor (inference only)

use crate::error::{PredictorError, Result};
use super::decision_tree::DecisionTree;
use ndarray::{Array1, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Point estimate and spread of one sample across the estimators
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnsemblePrediction {
    /// Mean of the estimator outputs
    pub mean: f64,
    /// Population standard deviation of the estimator outputs
    pub std: f64,
}

/// Random forest regression model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    /// Individual trees
    estimators: Vec<DecisionTree>,
}

impl RandomForestRegressor {
    pub fn new(estimators: Vec<DecisionTree>) -> Self {
        Self { estimators }
    }

    /// Get number of trees
    pub fn n_estimators(&self) -> usize {
        self.estimators.len()
    }

    /// Depth of the deepest tree
    pub fn max_depth(&self) -> usize {
        self.estimators.iter().map(DecisionTree::get_depth).max().unwrap_or(0)
    }

    /// Leaves across all trees
    pub fn n_leaves(&self) -> usize {
        self.estimators.iter().map(DecisionTree::get_n_leaves).sum()
    }

    /// Check that the forest can evaluate vectors of `n_features` values
    pub fn validate(&self, n_features: usize) -> Result<()> {
        if self.estimators.is_empty() {
            return Err(PredictorError::ModelNotFitted);
        }

        for (idx, tree) in self.estimators.iter().enumerate() {
            if let Some(max_idx) = tree.max_feature_index() {
                if max_idx >= n_features {
                    return Err(PredictorError::ShapeError {
                        expected: format!("feature indices below {}", n_features),
                        actual: format!("estimator {} splits on feature {}", idx, max_idx),
                    });
                }
            }
        }

        Ok(())
    }

    /// Prediction of every estimator for one sample, in estimator order
    fn estimator_predictions(&self, sample: ArrayView1<f64>) -> Result<Array1<f64>> {
        if self.estimators.is_empty() {
            return Err(PredictorError::ModelNotFitted);
        }

        let predictions = self
            .estimators
            .par_iter()
            .map(|tree| tree.predict_sample(sample))
            .collect::<Result<Vec<f64>>>()?;

        Ok(Array1::from_vec(predictions))
    }

    /// Mean and spread of the estimator outputs for one sample
    pub fn predict_with_spread(&self, sample: ArrayView1<f64>) -> Result<EnsemblePrediction> {
        let per_tree = self.estimator_predictions(sample)?;
        let mean = per_tree.mean().ok_or_else(|| {
            PredictorError::InferenceError("No tree could make predictions".to_string())
        })?;

        Ok(EnsemblePrediction {
            mean,
            std: per_tree.std(0.0),
        })
    }
}
