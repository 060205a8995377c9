//! Fitted preprocessing steps applied before inference
//!
//! - Feature scaling (standard scaler)
//! - Categorical encoding (label encoder)

mod encoder;
mod scaler;

pub use encoder::LabelEncoder;
pub use scaler::StandardScaler;
