//! Model package: everything the external training run exported

use crate::error::{PredictorError, Result};
use crate::inference::FeatureLayout;
use crate::model::RandomForestRegressor;
use crate::preprocessing::{LabelEncoder, StandardScaler};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Held-out test metrics recorded at training time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestMetrics {
    #[serde(rename = "R2")]
    pub r2: f64,
    #[serde(rename = "RMSE")]
    pub rmse: f64,
    #[serde(rename = "MAE")]
    pub mae: f64,
}

/// Evaluation metrics recorded at training time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub test: TestMetrics,
    /// Cross-validation mean R²
    pub cv_mean: f64,
    /// Cross-validation R² standard deviation
    pub cv_std: f64,
}

/// Fitted model, preprocessing steps and metadata loaded from one artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPackage {
    pub model: RandomForestRegressor,
    pub scaler: StandardScaler,
    pub label_encoder: LabelEncoder,
    pub neighborhoods: Vec<String>,
    /// Column order the model was trained on
    pub feature_columns: Vec<String>,
    /// Human-readable names of the selected input features
    #[serde(default)]
    pub selected_features: Vec<String>,
    pub metrics: ModelMetrics,
    /// Feature columns resolved to request fields at load time
    #[serde(skip)]
    layout: FeatureLayout,
}

impl ModelPackage {
    /// Read and check a package from a JSON artifact on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PredictorError::ArtifactNotFound(path.to_path_buf()),
            _ => PredictorError::IoError(e),
        })?;
        Self::from_slice(&bytes)
    }

    /// Parse and check a package from JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let package: ModelPackage = serde_json::from_slice(bytes)?;
        package.prepare()
    }

    /// Normalize the encoder, run the structural checks and resolve the
    /// feature layout
    pub(crate) fn prepare(mut self) -> Result<Self> {
        self.label_encoder.normalize();
        self.layout = self.validate()?;
        Ok(self)
    }

    /// Structural checks that catch artifacts this crate cannot evaluate
    fn validate(&self) -> Result<FeatureLayout> {
        let n_features = self.feature_columns.len();
        if n_features == 0 {
            return Err(PredictorError::InvalidArtifact(
                "feature_columns is empty".to_string(),
            ));
        }

        let layout = FeatureLayout::resolve(self.feature_columns.as_slice())?;

        self.scaler.check_shape()?;
        if self.scaler.n_features() != n_features {
            return Err(PredictorError::InvalidArtifact(format!(
                "scaler was fitted on {} features but feature_columns lists {}",
                self.scaler.n_features(),
                n_features
            )));
        }

        self.model
            .validate(n_features)
            .map_err(|e| PredictorError::InvalidArtifact(e.to_string()))?;

        Ok(layout)
    }

    /// Request fields in trained column order
    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    /// Neighborhood vocabulary, sorted ascending without duplicates
    pub fn sorted_neighborhoods(&self) -> Vec<String> {
        let mut names = self.neighborhoods.clone();
        names.sort();
        names.dedup();
        names
    }

    /// Selected feature names, falling back to the raw column names
    pub fn selected_features(&self) -> &[String] {
        if self.selected_features.is_empty() {
            &self.feature_columns
        } else {
            &self.selected_features
        }
    }
}
