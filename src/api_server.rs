// Axum API Server Module
//
// Purpose: HTTP shell around the fertilizer pipeline
// Endpoints: GET / (landing page), GET /health, POST /predict

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};

use serde::Serialize;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::input::InputSource;
use crate::model::{load_model, ModelHandle};
use crate::pipeline::{FertilizerPipeline, PipelineError};
use crate::validation::ValidationError;
use crate::web::handlers::pages::home_page;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub recommended_fertilizer: &'static str,
}

/// Client message for any unparseable measurement
pub const INVALID_NUMERIC_MESSAGE: &str = "Invalid input: Ensure all numerical values are valid.";

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub pipeline: FertilizerPipeline,
    pub predict_timeout: Option<Duration>,
}

impl AppState {
    /// Load the model named in `config`. A missing or broken artifact is
    /// logged and leaves the service running without a model.
    pub fn new(config: &ServerConfig) -> Self {
        tracing::info!("Loading model artifact from {}...", config.model_path.display());
        let model = load_model(&config.model_path, &config.model_format);
        if model.is_none() {
            tracing::warn!("Serving without a model: /predict will answer 500");
        }

        Self::with_model(model).with_timeout(config.predict_timeout)
    }

    pub fn with_model(model: Option<ModelHandle>) -> Self {
        Self {
            pipeline: FertilizerPipeline::new(model),
            predict_timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.predict_timeout = timeout;
        self
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Landing page (HTML form)
        .route("/", get(home_page))

        // Health check
        .route("/health", get(health_check))

        // Prediction (JSON or form body)
        .route("/predict", post(predict))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new()) // gzip + brotli compression
        .layer(CorsLayer::permissive()) // Browser form posts from any origin
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let model = state.pipeline.model().map(|m| m.describe());
    Json(serde_json::json!({
        "status": "healthy",
        "model_loaded": model.is_some(),
        "model": model,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn predict(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<PredictResponse>, AppError> {
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let fields = InputSource::from_content_type(content_type, &body)
        .into_fields()
        .map_err(|e| {
            tracing::error!("Prediction error: {}", e);
            PipelineError::from(e)
        })?;

    tracing::info!("Received Data: {:?}", fields);

    let (model, features) = state.pipeline.prepare(&fields)?;

    // Model call is CPU-bound: run in blocking thread pool
    let task = tokio::task::spawn_blocking(move || FertilizerPipeline::infer(&model, &features));

    let joined = match state.predict_timeout {
        Some(limit) => match tokio::time::timeout(limit, task).await {
            Ok(joined) => joined,
            Err(_) => {
                tracing::error!("Prediction timed out after {:?}", limit);
                return Err(PipelineError::Timeout(limit).into());
            }
        },
        None => task.await,
    };

    let recommendation = joined
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(PredictResponse {
        recommended_fertilizer: recommendation.fertilizer,
    }))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(String),
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(ValidationError::InvalidNumeric { .. }) => {
                AppError::BadRequest(INVALID_NUMERIC_MESSAGE.to_string())
            }
            PipelineError::Validation(e @ ValidationError::MissingFields(_)) => {
                AppError::BadRequest(e.to_string())
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
