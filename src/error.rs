//! Error types for the split-guard validation engine.
//!
//! All failures are fatal to the run that raised them: the engine either
//! completes a full, consistent validation output or reports an error. Callers
//! can therefore distinguish "no anomalies found" (a successful run with empty
//! reports) from "validation could not run" (an error).

use thiserror::Error;

/// The main error type for the validation engine.
#[derive(Error, Debug)]
pub enum ValidatorError {
    /// Invalid run configuration: an excluded split that does not exist in the
    /// statistics bundle, or a malformed custom validation expression.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The anomaly detector collaborator failed while validating a split.
    #[error("Detection failed for split '{split}': {message}")]
    Detection {
        /// The split being validated when the detector failed
        split: String,
        /// Detailed error message
        message: String,
        /// Optional underlying error reported by the detector
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Reading statistics/schema inputs or writing output files failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding a serialized artifact failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A type alias for `Result<T, ValidatorError>` used throughout the crate.
pub type Result<T> = std::result::Result<T, ValidatorError>;

impl ValidatorError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a detection error for the given split.
    pub fn detection(split: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Detection {
            split: split.into(),
            message: msg.into(),
            source: None,
        }
    }

    /// Creates a detection error for the given split wrapping an underlying error.
    pub fn detection_with_source(
        split: impl Into<String>,
        msg: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Detection {
            split: split.into(),
            message: msg.into(),
            source: Some(source),
        }
    }

    /// Creates a serialization error with the given message.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Returns true if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<serde_json::Error> for ValidatorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
