//! House Price Prediction - web form and JSON API over a pre-trained random forest
//!
//! This crate provides:
//! - Loading of the persisted model package (forest, scaler, encoder, metrics)
//! - Input validation for the six house features
//! - Point predictions with a 95% interval from the spread of the trees
//! - An HTTP server (form, REST API, health) and a CLI
//!
//! # Modules
//!
//! - [`artifact`] - Model package format and lazy loading
//! - [`model`] - Decision tree and random forest inference
//! - [`preprocessing`] - Standard scaler and label encoder
//! - [`validation`] - Request field validation
//! - [`inference`] - Feature vector assembly and price prediction
//! - [`server`] - HTTP server with form and REST API
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Model package
pub mod artifact;
pub mod model;
pub mod preprocessing;

// Prediction path
pub mod validation;
pub mod inference;

// Services
pub mod server;
pub mod cli;

pub use error::{PredictorError, Result};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::artifact::{ModelPackage, ModelStore};
    pub use crate::error::{PredictorError, Result};
    pub use crate::inference::{predict_price, PricePrediction};
    pub use crate::validation::{validate_input, HouseFeatures, RawFields, ValidationError};
}
