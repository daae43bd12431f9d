//! Error types for the placement-serving crate.
//!
//! [`ServingError`] is what handlers return; its [`IntoResponse`] impl maps
//! each variant onto an HTTP status and a small JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use placement_core::PlacementError;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for serving operations.
pub type ServingResult<T> = Result<T, ServingError>;

/// Errors that can occur while serving the dashboard.
#[derive(Debug, Error)]
pub enum ServingError {
    /// Model loading failed.
    #[error("Failed to load model: {0}")]
    ModelLoadError(String),

    /// No model is currently loaded.
    #[error("No model is currently loaded")]
    ModelNotLoaded,

    /// The analytics dataset could not be read.
    #[error("Dataset unavailable: {0}")]
    DatasetError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Prediction failed.
    #[error("Prediction failed: {0}")]
    PredictionError(String),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Server error.
    #[error("Server error: {0}")]
    ServerError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Page rendering failed.
    #[error("Failed to render page: {0}")]
    Render(#[from] std::fmt::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServingError {
    /// Create a model load error.
    pub fn model_load(msg: impl Into<String>) -> Self {
        Self::ModelLoadError(msg.into())
    }

    /// Create a dataset error.
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::DatasetError(msg.into())
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a prediction error.
    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::PredictionError(msg.into())
    }

    /// Create an invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a server error.
    pub fn server(msg: impl Into<String>) -> Self {
        Self::ServerError(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this is a client error (bad request).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::ModelNotLoaded | Self::DatasetError(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PlacementError> for ServingError {
    fn from(err: PlacementError) -> Self {
        if err.is_input_error() {
            return Self::InvalidRequest(err.to_string());
        }
        match err {
            PlacementError::Prediction { message } => Self::PredictionError(message),
            PlacementError::Dataset { .. } => Self::DatasetError(err.to_string()),
            PlacementError::Io(io) => Self::IoError(io),
            other => Self::ModelLoadError(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ServingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ServingError::ModelLoadError("test error".to_string());
        assert_eq!(err.to_string(), "Failed to load model: test error");

        let err = ServingError::ModelNotLoaded;
        assert_eq!(err.to_string(), "No model is currently loaded");

        let err = ServingError::dataset("missing file");
        assert_eq!(err.to_string(), "Dataset unavailable: missing file");
    }

    #[test]
    fn test_error_constructors() {
        assert!(matches!(
            ServingError::model_load("load failed"),
            ServingError::ModelLoadError(_)
        ));
        assert!(matches!(
            ServingError::config("config invalid"),
            ServingError::ConfigError(_)
        ));
        assert!(matches!(
            ServingError::invalid_request("bad"),
            ServingError::InvalidRequest(_)
        ));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ServingError::invalid_request("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServingError::ModelNotLoaded.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ServingError::prediction("nan").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_render_error() {
        let err = ServingError::from(std::fmt::Error);
        assert!(matches!(err, ServingError::Render(_)));
        assert!(err.is_server_error());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_client_vs_server() {
        assert!(ServingError::invalid_request("bad request").is_client_error());
        assert!(!ServingError::server("internal").is_client_error());
        assert!(ServingError::ModelNotLoaded.is_server_error());
    }

    #[test]
    fn test_from_placement_error() {
        let err: ServingError = PlacementError::OutOfRange {
            field: "CGPA",
            value: 3.0,
            min: 5.0,
            max: 10.0,
        }
        .into();
        assert!(err.is_client_error());

        let err: ServingError = PlacementError::prediction("nan").into();
        assert!(matches!(err, ServingError::PredictionError(_)));

        let err: ServingError = PlacementError::dataset(2, "bad row").into();
        assert!(matches!(err, ServingError::DatasetError(_)));

        let err: ServingError = PlacementError::invalid_model("no trees").into();
        assert!(matches!(err, ServingError::ModelLoadError(_)));
    }
}
