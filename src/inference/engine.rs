//! Price prediction with an ensemble-spread interval

use crate::artifact::ModelPackage;
use crate::error::{PredictorError, Result};
use crate::preprocessing::LabelEncoder;
use crate::validation::HouseFeatures;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Confidence level of the reported interval, in percent
pub const CONFIDENCE_LEVEL: u8 = 95;

/// Two-sided normal quantile for a 95% interval
pub const Z_SCORE_95: f64 = 1.96;

/// Code used for neighborhoods the encoder has never seen
pub const DEFAULT_NEIGHBORHOOD_CODE: usize = 0;

/// Prediction result returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePrediction {
    pub predicted_price: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub confidence: u8,
    pub model_r2: f64,
    pub model_rmse: f64,
}

/// Encoded neighborhood, substituting the default code for unseen names
pub fn encode_neighborhood(encoder: &LabelEncoder, neighborhood: &str) -> usize {
    encoder.transform(neighborhood).unwrap_or_else(|| {
        warn!(
            neighborhood = %neighborhood,
            default_code = DEFAULT_NEIGHBORHOOD_CODE,
            "Unknown neighborhood, using default"
        );
        DEFAULT_NEIGHBORHOOD_CODE
    })
}

/// Predict the sale price of one house
pub fn predict_price(package: &ModelPackage, features: &HouseFeatures) -> Result<PricePrediction> {
    let code = encode_neighborhood(&package.label_encoder, &features.neighborhood);

    let raw = package.layout().build(features, code);
    let scaled = package.scaler.transform(raw.view())?;

    let ensemble = package.model.predict_with_spread(scaled.view())?;
    let (point, spread) = (ensemble.mean, ensemble.std);

    if !point.is_finite() || !spread.is_finite() {
        return Err(PredictorError::InferenceError(format!(
            "model produced a non-finite prediction ({}, spread {})",
            point, spread
        )));
    }

    debug!(
        point,
        spread,
        estimators = package.model.n_estimators(),
        neighborhood_code = code,
        "Ensemble prediction"
    );

    let lower = point - Z_SCORE_95 * spread;
    let upper = point + Z_SCORE_95 * spread;

    Ok(PricePrediction {
        predicted_price: round_to(point.max(0.0), 2),
        lower_bound: round_to(lower.max(0.0), 2),
        upper_bound: round_to(upper.max(0.0), 2),
        confidence: CONFIDENCE_LEVEL,
        model_r2: round_to(package.metrics.test.r2, 4),
        model_rmse: round_to(package.metrics.test.rmse, 2),
    })
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{ModelMetrics, TestMetrics};
    use crate::model::decision_tree::fixtures::stump;
    use crate::model::{DecisionTree, RandomForestRegressor};
    use crate::preprocessing::StandardScaler;

    fn columns() -> Vec<String> {
        ["OverallQual", "GrLivArea", "TotalBsmtSF", "GarageCars", "YearBuilt", "Neighborhood"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Identity-scaled package around `trees`
    fn package(trees: Vec<DecisionTree>) -> ModelPackage {
        let package: ModelPackage = serde_json::from_value(serde_json::json!({
            "model": RandomForestRegressor::new(trees),
            "scaler": StandardScaler::new(vec![0.0; 6], vec![1.0; 6]).unwrap(),
            "label_encoder": LabelEncoder::new(["Blmngtn", "NAmes", "StoneBr"]),
            "neighborhoods": ["NAmes", "Blmngtn", "StoneBr"],
            "feature_columns": columns(),
            "metrics": ModelMetrics {
                test: TestMetrics { r2: 0.876543, rmse: 28_123.456, mae: 19_000.0 },
                cv_mean: 0.85,
                cv_std: 0.03,
            },
        }))
        .unwrap();
        package.prepare().unwrap()
    }

    fn house(neighborhood: &str) -> HouseFeatures {
        HouseFeatures {
            overall_qual: 7,
            gr_liv_area: 2000.0,
            total_bsmt_sf: 1000.0,
            garage_cars: 2,
            year_built: 2005,
            neighborhood: neighborhood.to_string(),
        }
    }

    fn area_tree(small: f64, large: f64) -> DecisionTree {
        stump(1, 1500.0, small, large)
    }

    fn neighborhood_tree(code0: f64, other: f64) -> DecisionTree {
        stump(5, 0.5, code0, other)
    }

    #[test]
    fn test_interval_from_ensemble_spread() {
        let pkg = package(vec![area_tree(100_000.0, 200_000.0), area_tree(100_000.0, 240_000.0)]);
        let result = predict_price(&pkg, &house("NAmes")).unwrap();

        // mean 220k, population std 20k
        assert_eq!(result.predicted_price, 220_000.0);
        assert_eq!(result.lower_bound, 180_800.0);
        assert_eq!(result.upper_bound, 259_200.0);
        assert_eq!(result.confidence, 95);
        assert_eq!(result.model_r2, 0.8765);
        assert_eq!(result.model_rmse, 28_123.46);
    }

    #[test]
    fn test_bounds_clamped_to_zero() {
        let pkg = package(vec![area_tree(0.0, 1_000.0), area_tree(0.0, 99_000.0)]);
        let result = predict_price(&pkg, &house("NAmes")).unwrap();

        assert_eq!(result.predicted_price, 50_000.0);
        assert_eq!(result.lower_bound, 0.0);
        assert!(result.upper_bound > result.predicted_price);
    }

    #[test]
    fn test_negative_prediction_clamped() {
        let pkg = package(vec![area_tree(0.0, -500.0)]);
        let result = predict_price(&pkg, &house("NAmes")).unwrap();
        assert_eq!(result.predicted_price, 0.0);
        assert_eq!(result.lower_bound, 0.0);
        assert_eq!(result.upper_bound, 0.0);
    }

    #[test]
    fn test_unknown_neighborhood_uses_default_code() {
        let pkg = package(vec![neighborhood_tree(111_000.0, 333_000.0)]);

        // "Blmngtn" sorts first, so it shares code 0 with unseen names
        let known_first = predict_price(&pkg, &house("Blmngtn")).unwrap();
        let known_other = predict_price(&pkg, &house("StoneBr")).unwrap();
        let unknown = predict_price(&pkg, &house("Atlantis")).unwrap();

        assert_eq!(known_first.predicted_price, 111_000.0);
        assert_eq!(known_other.predicted_price, 333_000.0);
        assert_eq!(unknown.predicted_price, 111_000.0);
    }

    #[test]
    fn test_scaler_applied_before_model() {
        let mut pkg = package(vec![area_tree(1.0, 2.0)]);
        // Living area 2000 scales to (2000 - 1000) / 1000 = 1.0, below the 1500 threshold
        pkg.scaler = StandardScaler::new(
            vec![0.0, 1000.0, 0.0, 0.0, 0.0, 0.0],
            vec![1.0, 1000.0, 1.0, 1.0, 1.0, 1.0],
        )
        .unwrap();
        let result = predict_price(&pkg, &house("NAmes")).unwrap();
        assert_eq!(result.predicted_price, 1.0);
    }

    #[test]
    fn test_repeat_requests_identical() {
        let pkg = package(vec![
            area_tree(100_000.0, 180_000.0),
            area_tree(120_000.0, 260_000.0),
            neighborhood_tree(90_000.0, 210_000.0),
        ]);
        let first = predict_price(&pkg, &house("NAmes")).unwrap();
        for _ in 0..5 {
            assert_eq!(predict_price(&pkg, &house("NAmes")).unwrap(), first);
        }
    }

    #[test]
    fn test_non_finite_prediction_is_error() {
        // JSON has no infinity, so swap the model in after loading
        let mut pkg = package(vec![area_tree(0.0, 1.0)]);
        pkg.model = RandomForestRegressor::new(vec![area_tree(0.0, f64::INFINITY)]);
        let err = predict_price(&pkg, &house("NAmes")).unwrap_err();
        assert!(matches!(err, PredictorError::InferenceError(_)));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(0.876543, 4), 0.8765);
    }
}
