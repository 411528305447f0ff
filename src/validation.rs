//! Request validation and normalization
//!
//! Turns the raw string map of a request into a typed record. Presence is
//! checked for every field first so a client sees all missing fields at once;
//! numeric parsing only runs on complete requests.

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Raw request fields, keyed by request field name
pub type RawFields = FxHashMap<String, String>;

/// Required request fields, in declaration order
pub const REQUIRED_FIELDS: [&str; 9] = [
    "district",
    "soil_color",
    "nitrogen",
    "phosphorus",
    "potassium",
    "pH",
    "rainfall",
    "temperature",
    "crop",
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Missing fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("could not convert {field} value '{value}' to float")]
    InvalidNumeric { field: &'static str, value: String },
}

/// Validated request with typed measurements
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub district: String,
    pub soil_color: String,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub ph: f64,
    pub rainfall: f64,
    pub temperature: f64,
    pub crop: String,
}

/// Required fields that are absent or empty, in declaration order
pub fn missing_fields(raw: &RawFields) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| raw.get(*field).map_or(true, |v| v.is_empty()))
        .collect()
}

fn parse_number(raw: &RawFields, field: &'static str) -> Result<f64, ValidationError> {
    let value = raw.get(field).map(String::as_str).unwrap_or_default();
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidNumeric {
            field,
            value: value.to_string(),
        })
}

/// Validate a raw request.
///
/// Fails with `MissingFields` listing every absent/empty required field, or
/// with `InvalidNumeric` naming the first measurement that is not a float.
pub fn validate(raw: &RawFields) -> Result<NormalizedRecord, ValidationError> {
    let missing = missing_fields(raw);
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    // Presence was checked above
    let text = |field: &str| raw.get(field).cloned().unwrap_or_default();

    Ok(NormalizedRecord {
        district: text("district"),
        soil_color: text("soil_color"),
        nitrogen: parse_number(raw, "nitrogen")?,
        phosphorus: parse_number(raw, "phosphorus")?,
        potassium: parse_number(raw, "potassium")?,
        ph: parse_number(raw, "pH")?,
        rainfall: parse_number(raw, "rainfall")?,
        temperature: parse_number(raw, "temperature")?,
        crop: text("crop"),
    })
}
