//! Input validation for prediction requests
//!
//! Checks the six raw form/JSON fields for presence, type and range before
//! anything touches the model. Neighborhood names are not checked against
//! the trained vocabulary here; the encoder handles unseen names.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Earliest accepted construction year
pub const MIN_YEAR_BUILT: i32 = 1800;

/// Required request fields, in the order they are checked
pub const REQUIRED_FIELDS: [&str; 6] = [
    "overall_qual",
    "gr_liv_area",
    "total_bsmt_sf",
    "garage_cars",
    "year_built",
    "neighborhood",
];

/// Raw request fields, keyed by field name
pub type RawFields = HashMap<String, String>;

/// Why a request was rejected. The display text is shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Overall Quality must be between 1 and 10")]
    OverallQualOutOfRange,

    #[error("Living Area must be a positive number")]
    LivingAreaNotPositive,

    #[error("Basement Area cannot be negative")]
    NegativeBasementArea,

    #[error("Garage Cars must be between 0 and 4")]
    GarageCarsOutOfRange,

    #[error("Year Built must be between {} and {max}", MIN_YEAR_BUILT)]
    YearBuiltOutOfRange { max: i32 },

    #[error("Invalid input format: {0}")]
    InvalidFormat(String),
}

/// A validated prediction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseFeatures {
    /// Overall material and finish quality, 1-10
    pub overall_qual: i32,
    /// Above grade living area, sq ft
    pub gr_liv_area: f64,
    /// Total basement area, sq ft
    pub total_bsmt_sf: f64,
    /// Garage size in car capacity, 0-4
    pub garage_cars: i32,
    /// Original construction year
    pub year_built: i32,
    pub neighborhood: String,
}

/// Validate raw fields against the current calendar year
pub fn validate_input(fields: &RawFields) -> Result<HouseFeatures, ValidationError> {
    validate_input_for_year(fields, chrono::Local::now().year())
}

/// Validate raw fields, accepting construction years up to `current_year`
pub fn validate_input_for_year(
    fields: &RawFields,
    current_year: i32,
) -> Result<HouseFeatures, ValidationError> {
    for field in REQUIRED_FIELDS {
        match fields.get(field) {
            Some(value) if !value.is_empty() => {}
            _ => return Err(ValidationError::MissingField(field)),
        }
    }
    let raw = |name: &str| fields.get(name).map(String::as_str).unwrap_or_default();

    let overall_qual = parse_int(raw("overall_qual"))?;
    if !(1..=10).contains(&overall_qual) {
        return Err(ValidationError::OverallQualOutOfRange);
    }

    let gr_liv_area = parse_real(raw("gr_liv_area"))?;
    if gr_liv_area <= 0.0 {
        return Err(ValidationError::LivingAreaNotPositive);
    }

    let total_bsmt_sf = parse_real(raw("total_bsmt_sf"))?;
    if total_bsmt_sf < 0.0 {
        return Err(ValidationError::NegativeBasementArea);
    }

    let garage_cars = parse_int(raw("garage_cars"))?;
    if !(0..=4).contains(&garage_cars) {
        return Err(ValidationError::GarageCarsOutOfRange);
    }

    let year_built = parse_int(raw("year_built"))?;
    if !(MIN_YEAR_BUILT..=current_year).contains(&year_built) {
        return Err(ValidationError::YearBuiltOutOfRange { max: current_year });
    }

    Ok(HouseFeatures {
        overall_qual,
        gr_liv_area,
        total_bsmt_sf,
        garage_cars,
        year_built,
        neighborhood: raw("neighborhood").to_string(),
    })
}

/// Flatten a JSON object into raw fields.
///
/// Strings are taken verbatim, `null` counts as absent, and any other value
/// is kept as its JSON text so the usual parsing rules apply. Whole-number
/// floats such as `7.0` are written as integers, so they pass the integer
/// fields the same way `7` does.
pub fn raw_fields_from_json(object: &serde_json::Map<String, serde_json::Value>) -> RawFields {
    object
        .iter()
        .filter_map(|(key, value)| {
            let raw = match value {
                serde_json::Value::Null => return None,
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) if n.is_f64() => n
                    .as_f64()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| format!("{:.0}", f))
                    .unwrap_or_else(|| n.to_string()),
                other => other.to_string(),
            };
            Some((key.clone(), raw))
        })
        .collect()
}

fn parse_int(raw: &str) -> Result<i32, ValidationError> {
    raw.trim().parse::<i32>().map_err(|_| {
        ValidationError::InvalidFormat(format!("invalid literal for integer: '{}'", raw))
    })
}

fn parse_real(raw: &str) -> Result<f64, ValidationError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ValidationError::InvalidFormat(format!(
            "could not convert to number: '{}'",
            raw
        ))),
    }
}
