//! Fertilizer Recommender
//!
//! Maps farm and soil measurements to a recommended fertilizer using a
//! pre-trained classifier.
//!
//! Pipeline, leaf-first:
//! - `encoding/`: district / soil color / crop lookup tables, feature vector
//! - `validation/`: required-field and numeric checks
//! - `input/`: JSON or form-encoded body → raw field map
//! - `model/`: `Classifier` trait + gradient-boosted trees (`gbdt`)
//! - `fertilizer/`: class id → fertilizer name
//! - `pipeline/`: orchestration, transport-agnostic
//! - `api_server/` (feature `api`): Axum HTTP shell

pub mod config;
pub mod encoding;
pub mod fertilizer;
pub mod input;
pub mod model;
pub mod pipeline;
pub mod validation;

#[cfg(feature = "api")]
pub mod api_server;
#[cfg(feature = "api")]
pub mod web;

// Re-export commonly used types
pub use config::ServerConfig;
pub use encoding::{encode, encode_record, CategoricalField, EncodedFeatureVector};
pub use fertilizer::{fertilizer_name, FERTILIZER_COUNT, UNKNOWN_FERTILIZER};
pub use input::{InputError, InputSource};
pub use model::{load_model, BoostedTrees, ClassId, Classifier, LoadError, ModelFormat, ModelHandle, PredictionError};
pub use pipeline::{FertilizerPipeline, PipelineError, Recommendation};
pub use validation::{validate, NormalizedRecord, RawFields, ValidationError};

#[cfg(feature = "api")]
pub use api_server::{AppState, create_router};
