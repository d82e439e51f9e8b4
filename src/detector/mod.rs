//! Anomaly detection for split statistics.
//!
//! Detection combines two independent sources into one unified report per
//! split: schema conformance (the [`AnomalyDetector`] collaborator, with
//! [`SchemaConformanceDetector`] as the shipped implementation) and optional
//! custom validation rules evaluated against the same statistics. The executor
//! merges the two with a fixed precedence: custom validation runs second and
//! replaces a conformance descriptor on the same feature path.

use crate::core::{AnomalyReport, Schema, SplitStatistics};
use crate::error::Result;
use async_trait::async_trait;

mod conformance;
mod custom;

pub use conformance::{ConformanceOptions, SchemaConformanceDetector};
pub use custom::{CompiledRules, CustomValidationConfig, FeatureValidation, Validation};

/// Collaborator that checks one split's statistics against a schema.
///
/// Implementations must be deterministic: the same statistics and schema must
/// always produce the same report, since downstream artifacts are required to
/// be byte-identical across reruns.
#[async_trait]
pub trait AnomalyDetector: Send + Sync {
    /// Produces the schema-conformance anomaly report for one split.
    ///
    /// # Arguments
    ///
    /// * `statistics` - The split's observed statistics
    /// * `schema` - The declared feature constraints
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ValidatorError::Detection`] when the detector
    /// cannot complete; any failure aborts the whole validation run.
    async fn detect(&self, statistics: &SplitStatistics, schema: &Schema) -> Result<AnomalyReport>;
}
