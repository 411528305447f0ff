//! Model artifact
//!
//! The classifier is trained elsewhere and shipped as a serialized artifact.
//! It is loaded once at startup and shared read-only by every request.
//!
//! - `Classifier`: the inference seam (the HTTP layer only sees this trait)
//! - `booster`: gradient-boosted trees read through the `gbdt` crate

pub mod booster;

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::encoding::EncodedFeatureVector;

pub use booster::{BoostedTrees, ModelFormat};

/// Integer class produced by the classifier
pub type ClassId = i64;

/// Shared read-only model handle
pub type ModelHandle = Arc<dyn Classifier>;

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("feature {feature} is {value}, expected a finite number")]
    NonFiniteFeature { feature: &'static str, value: f64 },

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load model artifact {path}: {message}")]
    Artifact { path: String, message: String },

    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

/// A trained classifier over the nine-column feature vector
pub trait Classifier: Send + Sync {
    /// Predict a single row
    fn predict(&self, features: &EncodedFeatureVector) -> Result<ClassId, PredictionError>;

    /// Short description for logs and the health endpoint
    fn describe(&self) -> String {
        "classifier".to_string()
    }
}

/// Load the model artifact at `path`.
///
/// Failures are logged and produce `None`: the server keeps running and
/// answers predictions with "model not available" instead of refusing to start.
pub fn load_model(path: impl AsRef<Path>, format: &ModelFormat) -> Option<ModelHandle> {
    let path = path.as_ref();
    match BoostedTrees::load(path, format) {
        Ok(model) => {
            tracing::info!(
                "Model loaded successfully from {} ({})",
                path.display(),
                model.describe()
            );
            Some(Arc::new(model))
        }
        Err(e) => {
            tracing::error!("Error loading model: {}", e);
            None
        }
    }
}
