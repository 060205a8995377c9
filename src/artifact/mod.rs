//! Model artifact loading
//!
//! The artifact is a single JSON document produced by the external training
//! run. It is read once and shared read-only afterwards.

mod package;
mod store;

pub use package::{ModelMetrics, ModelPackage, TestMetrics};
pub use store::ModelStore;

/// Default artifact location, relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "model/house_price_model.json";
