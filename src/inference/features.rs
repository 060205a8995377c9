//! Feature vector assembly in trained column order

use crate::error::{PredictorError, Result};
use crate::validation::HouseFeatures;
use ndarray::Array1;

/// One model input column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFeature {
    OverallQual,
    GrLivArea,
    TotalBsmtSf,
    GarageCars,
    YearBuilt,
    /// Label-encoded neighborhood code
    Neighborhood,
}

impl InputFeature {
    /// Match a recorded column name, ignoring case and underscores
    pub fn from_column_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "overallqual" => Some(InputFeature::OverallQual),
            "grlivarea" => Some(InputFeature::GrLivArea),
            "totalbsmtsf" => Some(InputFeature::TotalBsmtSf),
            "garagecars" => Some(InputFeature::GarageCars),
            "yearbuilt" => Some(InputFeature::YearBuilt),
            "neighborhood" | "neighborhoodencoded" => Some(InputFeature::Neighborhood),
            _ => None,
        }
    }
}

/// Mapping from recorded feature columns to request fields.
///
/// The default layout is empty; packages fill theirs in at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureLayout {
    columns: Vec<InputFeature>,
}

impl FeatureLayout {
    /// Resolve every recorded column name, failing on the first unknown one
    pub fn resolve<S: AsRef<str>>(feature_columns: &[S]) -> Result<Self> {
        let columns = feature_columns
            .iter()
            .map(|name| {
                let name = name.as_ref();
                InputFeature::from_column_name(name)
                    .ok_or_else(|| PredictorError::FeatureNotFound(name.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { columns })
    }

    /// Unscaled feature vector for one request
    pub fn build(&self, features: &HouseFeatures, neighborhood_code: usize) -> Array1<f64> {
        self.columns
            .iter()
            .map(|column| match column {
                InputFeature::OverallQual => f64::from(features.overall_qual),
                InputFeature::GrLivArea => features.gr_liv_area,
                InputFeature::TotalBsmtSf => features.total_bsmt_sf,
                InputFeature::GarageCars => f64::from(features.garage_cars),
                InputFeature::YearBuilt => f64::from(features.year_built),
                InputFeature::Neighborhood => neighborhood_code as f64,
            })
            .collect()
    }
}
