//! Error types for the placement core library.
//!
//! Every fallible operation in this crate returns [`PlacementError`], carrying
//! enough context (field names, line numbers, node indices) to be surfaced
//! directly to a dashboard user or an operator log.

use thiserror::Error;

/// The main error type for placement-core operations.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// A student attribute fell outside its declared input range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },

    /// The feature vector handed to a classifier had the wrong length.
    #[error("Feature count mismatch: expected {expected}, got {actual}")]
    FeatureMismatch {
        /// Number of features the model was trained on.
        expected: usize,
        /// Number of features supplied.
        actual: usize,
    },

    /// The serialized model is structurally invalid.
    #[error("Invalid model: {message}")]
    InvalidModel {
        /// What is wrong with the model.
        message: String,
    },

    /// Inference produced an unusable result.
    #[error("Prediction failed: {message}")]
    Prediction {
        /// Why the prediction could not be produced.
        message: String,
    },

    /// The historical dataset could not be parsed.
    #[error("Dataset error at line {line}: {message}")]
    Dataset {
        /// 1-based line number in the source file (0 when not line-specific).
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// Model JSON could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Underlying I/O failure while reading an artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlacementError {
    /// Create an invalid-model error.
    pub fn invalid_model(msg: impl Into<String>) -> Self {
        Self::InvalidModel {
            message: msg.into(),
        }
    }

    /// Create a prediction error.
    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::Prediction {
            message: msg.into(),
        }
    }

    /// Create a dataset error tied to a source line.
    pub fn dataset(line: usize, msg: impl Into<String>) -> Self {
        Self::Dataset {
            line,
            message: msg.into(),
        }
    }

    /// True when the error was caused by the caller's input rather than by
    /// the model, the dataset or the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::OutOfRange { .. } | Self::FeatureMismatch { .. })
    }
}

/// A specialized Result type for placement-core operations.
pub type Result<T> = std::result::Result<T, PlacementError>;
