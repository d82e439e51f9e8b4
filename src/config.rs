//! Typed configuration for a validation run.

use crate::detector::{ConformanceOptions, CustomValidationConfig};
use serde::{Deserialize, Serialize};

/// Configuration supplied by the orchestrator for one validation run.
///
/// Every knob is explicit and typed with a default; there is no open-ended
/// key/value property bag. `custom_validation: None` skips custom validation
/// entirely and is distinct from a config whose rule list is empty.
///
/// # Examples
///
/// ```rust
/// use split_guard::config::ValidatorConfig;
///
/// let config = ValidatorConfig::default().with_excluded_splits(["test"]);
/// assert_eq!(config.exclude_splits, ["test"]);
/// assert!(config.custom_validation.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Split names to drop from the bundle before validation
    #[serde(default)]
    pub exclude_splits: Vec<String>,
    /// Optional custom validation rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_validation: Option<CustomValidationConfig>,
    /// Tuning knobs for the shipped conformance detector
    #[serde(default)]
    pub conformance: ConformanceOptions,
}

impl ValidatorConfig {
    /// Creates a config with every knob at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the excluded split names.
    pub fn with_excluded_splits<I, S>(mut self, splits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_splits = splits.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the custom validation rules.
    pub fn with_custom_validation(mut self, config: CustomValidationConfig) -> Self {
        self.custom_validation = Some(config);
        self
    }

    /// Sets the conformance detector options.
    pub fn with_conformance(mut self, options: ConformanceOptions) -> Self {
        self.conformance = options;
        self
    }
}
