//! Inference: from a validated request to a priced prediction
//!
//! - Neighborhood encoding with a default code for unseen names
//! - Feature vector assembly in the trained column order
//! - Scaling, ensemble evaluation and a 95% interval from the
//!   spread of the individual estimators

mod engine;
mod features;

pub use engine::{
    encode_neighborhood, predict_price, PricePrediction, CONFIDENCE_LEVEL,
    DEFAULT_NEIGHBORHOOD_CODE, Z_SCORE_95,
};
pub use features::{FeatureLayout, InputFeature};
