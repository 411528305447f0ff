//! Categorical Encoding Lookup Tables
//!
//! Maps the human-readable district, soil color and crop names onto the
//! integer codes the classifier was trained with. The codes are part of the
//! model contract: changing any entry silently breaks compatibility with every
//! artifact trained against these tables.
//!
//! Values outside a table encode to `None` (the missing marker). The caller
//! decides what to do with it; the pipeline passes it on to the model as NaN.

use crate::validation::NormalizedRecord;

/// Categorical input column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    District,
    SoilColor,
    Crop,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 3] = [
        CategoricalField::District,
        CategoricalField::SoilColor,
        CategoricalField::Crop,
    ];

    /// Request key carrying this field
    pub fn key(self) -> &'static str {
        match self {
            CategoricalField::District => "district",
            CategoricalField::SoilColor => "soil_color",
            CategoricalField::Crop => "crop",
        }
    }
}

/// A single vocabulary entry
#[derive(Debug, Clone, Copy)]
pub struct CategoryCode {
    pub label: &'static str,
    pub code: u8,
}

// ============================================================================
// EMBEDDED TABLES
// ============================================================================

static DISTRICTS: &[CategoryCode] = &[
    CategoryCode { label: "Kolhapur", code: 1 },
    CategoryCode { label: "Solapur", code: 2 },
    CategoryCode { label: "Satara", code: 3 },
    CategoryCode { label: "Sangli", code: 4 },
    CategoryCode { label: "Pune", code: 5 },
];

static SOIL_COLORS: &[CategoryCode] = &[
    CategoryCode { label: "Black", code: 1 },
    CategoryCode { label: "Red", code: 2 },
    CategoryCode { label: "Medium Brown", code: 3 },
    CategoryCode { label: "Dark Brown", code: 4 },
    CategoryCode { label: "Light Brown", code: 5 },
    CategoryCode { label: "Reddish Brown", code: 6 },
];

static CROPS: &[CategoryCode] = &[
    CategoryCode { label: "Sugarcane", code: 1 },
    CategoryCode { label: "Jowar", code: 2 },
    CategoryCode { label: "Cotton", code: 3 },
    CategoryCode { label: "Rice", code: 4 },
    CategoryCode { label: "Wheat", code: 5 },
];

// ============================================================================
// LOOKUP FUNCTIONS
// ============================================================================

/// All entries of a table, in code order
pub fn table(field: CategoricalField) -> &'static [CategoryCode] {
    match field {
        CategoricalField::District => DISTRICTS,
        CategoricalField::SoilColor => SOIL_COLORS,
        CategoricalField::Crop => CROPS,
    }
}

/// Encode a category string.
///
/// Matching is exact (case and whitespace sensitive).
///
/// # Examples
/// ```
/// use fertilizer_recommender::encoding::{encode, CategoricalField};
///
/// assert_eq!(encode(CategoricalField::District, "Pune"), Some(5));
/// assert_eq!(encode(CategoricalField::District, "Mumbai"), None);
/// ```
pub fn encode(field: CategoricalField, value: &str) -> Option<u8> {
    table(field)
        .iter()
        .find(|entry| entry.label == value)
        .map(|entry| entry.code)
}

/// Known labels of a table (used to render the landing page form)
pub fn vocabulary(field: CategoricalField) -> Vec<&'static str> {
    table(field).iter().map(|entry| entry.label).collect()
}

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Column order the classifier was trained on
pub const FEATURE_ORDER: [&str; 9] = [
    "District_Name",
    "Soil_color",
    "Nitrogen",
    "Phosphorus",
    "Potassium",
    "pH",
    "Rainfall",
    "Temperature",
    "Crop",
];

pub const NUM_FEATURES: usize = FEATURE_ORDER.len();

/// Model input: a normalized record with its categories replaced by codes
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedFeatureVector {
    pub district: Option<u8>,
    pub soil_color: Option<u8>,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub ph: f64,
    pub rainfall: f64,
    pub temperature: f64,
    pub crop: Option<u8>,
}

impl EncodedFeatureVector {
    /// Single numeric row in `FEATURE_ORDER`; missing codes become NaN.
    pub fn to_row(&self) -> [f64; NUM_FEATURES] {
        let code = |c: Option<u8>| c.map(f64::from).unwrap_or(f64::NAN);
        [
            code(self.district),
            code(self.soil_color),
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.ph,
            self.rainfall,
            self.temperature,
            code(self.crop),
        ]
    }

    /// Code of one categorical column (`None` when unknown)
    pub fn code(&self, field: CategoricalField) -> Option<u8> {
        match field {
            CategoricalField::District => self.district,
            CategoricalField::SoilColor => self.soil_color,
            CategoricalField::Crop => self.crop,
        }
    }

    /// Categorical fields that did not match their table
    pub fn unknown_categories(&self) -> Vec<CategoricalField> {
        CategoricalField::ALL
            .into_iter()
            .filter(|field| self.code(*field).is_none())
            .collect()
    }
}

/// Encode every categorical column of a validated record.
///
/// Unknown categories are logged and passed on as the missing marker.
pub fn encode_record(record: &NormalizedRecord) -> EncodedFeatureVector {
    let encoded = EncodedFeatureVector {
        district: encode(CategoricalField::District, &record.district),
        soil_color: encode(CategoricalField::SoilColor, &record.soil_color),
        nitrogen: record.nitrogen,
        phosphorus: record.phosphorus,
        potassium: record.potassium,
        ph: record.ph,
        rainfall: record.rainfall,
        temperature: record.temperature,
        crop: encode(CategoricalField::Crop, &record.crop),
    };

    for field in encoded.unknown_categories() {
        let value = match field {
            CategoricalField::District => &record.district,
            CategoricalField::SoilColor => &record.soil_color,
            CategoricalField::Crop => &record.crop,
        };
        tracing::warn!("Unknown {} '{}', encoding as missing", field.key(), value);
    }

    encoded
}
