//! Request-to-recommendation pipeline
//!
//! validate → (model present?) → encode → predict → label.
//!
//! Transport-agnostic: the HTTP layer decodes the body into `RawFields`, calls
//! `recommend`, and turns `PipelineError` into a status code.

use std::time::Duration;

use thiserror::Error;

use crate::encoding::{encode_record, EncodedFeatureVector};
use crate::fertilizer::fertilizer_name;
use crate::input::InputError;
use crate::model::{ClassId, ModelHandle, PredictionError};
use crate::validation::{validate, RawFields, ValidationError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Model is not available.")]
    ModelUnavailable,

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error("Prediction timed out after {} ms", .0.as_millis())]
    Timeout(Duration),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub class_id: ClassId,
    pub fertilizer: &'static str,
}

/// Owns the (optional) model handle; cheap to clone
#[derive(Clone)]
pub struct FertilizerPipeline {
    model: Option<ModelHandle>,
}

impl FertilizerPipeline {
    pub fn new(model: Option<ModelHandle>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> Option<&ModelHandle> {
        self.model.as_ref()
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Everything before inference: validation, model check, encoding.
    ///
    /// Split out so the async layer can run only the model call on the
    /// blocking pool.
    pub fn prepare(&self, raw: &RawFields) -> Result<(ModelHandle, EncodedFeatureVector), PipelineError> {
        let record = validate(raw).map_err(|e| {
            match &e {
                ValidationError::MissingFields(fields) => {
                    tracing::error!("Missing fields: {:?}", fields)
                }
                ValidationError::InvalidNumeric { .. } => {
                    tracing::error!("Invalid input type: {}", e)
                }
            }
            e
        })?;

        let model = match &self.model {
            Some(model) => model.clone(),
            None => {
                tracing::error!("Model is not loaded.");
                return Err(PipelineError::ModelUnavailable);
            }
        };

        Ok((model, encode_record(&record)))
    }

    /// Run the model and map its class id to a fertilizer name
    pub fn infer(model: &ModelHandle, features: &EncodedFeatureVector) -> Result<Recommendation, PipelineError> {
        let class_id = model.predict(features).map_err(|e| {
            tracing::error!("Prediction error: {}", e);
            e
        })?;
        tracing::info!("Raw Model Prediction: {}", class_id);

        let fertilizer = fertilizer_name(class_id);
        tracing::info!("Mapped Fertilizer: {}", fertilizer);

        Ok(Recommendation { class_id, fertilizer })
    }

    /// Full synchronous pipeline for one request
    pub fn recommend(&self, raw: &RawFields) -> Result<Recommendation, PipelineError> {
        let (model, features) = self.prepare(raw)?;
        Self::infer(&model, &features)
    }
}
