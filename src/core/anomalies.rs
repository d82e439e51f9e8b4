//! Anomaly descriptors and the per-split anomaly report.
//!
//! A report maps feature paths to anomaly descriptors and carries a separate
//! list of dataset-level anomalies that apply to the whole split. An empty
//! report means the split is clean. Reports serialize deterministically
//! (BTreeMap-backed keys), which is what makes reruns byte-identical.

use crate::core::FeaturePath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Severity of a detected anomaly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Severity was not set by the detector
    #[default]
    Unknown,
    /// The anomaly is advisory and does not block the split
    Warning,
    /// The anomaly indicates a genuine violation
    Error,
}

/// Machine-readable classification of why an anomaly was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    /// Feature appears in statistics but not in the schema
    SchemaNewColumn,
    /// Required schema feature is absent from statistics
    FeatureTypeNotPresent,
    /// Feature is present in too small a fraction of examples
    SmallFractionPresent,
    /// Observed value kind is incompatible with the declared type
    FeatureTypeMismatch,
    /// Observed values-per-example fall outside the declared range
    ValueCountMismatch,
    /// Observed values fall outside the declared domain
    OutOfDomain,
    /// A custom validation rule fired
    CustomValidation,
    /// The split has fewer examples than the configured minimum
    DatasetLowNumExamples,
    /// Reason could not be classified
    Unknown,
}

/// Region of the schema/statistics diff associated with an anomaly.
///
/// Carried through for downstream tooling but excluded from report
/// comparisons, which only consider the descriptive fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRegion {
    /// First line of the region in the rendered diff
    pub start: u64,
    /// Number of lines in the region
    pub line_count: u64,
}

/// One feature-level anomaly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyInfo {
    /// Severity assigned by the detector or rule
    pub severity: Severity,
    /// One-line summary
    pub short_description: String,
    /// Full description
    pub description: String,
    /// Why the anomaly was raised
    pub reason: ReasonCode,
    /// Optional diff region for rendering tools
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_region: Option<DiffRegion>,
}

impl AnomalyInfo {
    /// Creates an anomaly with identical short and long descriptions.
    pub fn new(severity: Severity, description: impl Into<String>, reason: ReasonCode) -> Self {
        let description = description.into();
        Self {
            severity,
            short_description: description.clone(),
            description,
            reason,
            diff_region: None,
        }
    }

    /// Creates an anomaly with distinct short and long descriptions.
    pub fn with_descriptions(
        severity: Severity,
        short_description: impl Into<String>,
        description: impl Into<String>,
        reason: ReasonCode,
    ) -> Self {
        Self {
            severity,
            short_description: short_description.into(),
            description: description.into(),
            reason,
            diff_region: None,
        }
    }
}

/// One anomaly that applies to a whole split rather than a single feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetAnomalyInfo {
    /// Severity assigned by the detector
    pub severity: Severity,
    /// One-line summary
    pub short_description: String,
    /// Full description
    pub description: String,
    /// Why the anomaly was raised
    pub reason: ReasonCode,
}

impl DatasetAnomalyInfo {
    /// Creates a dataset anomaly with identical short and long descriptions.
    pub fn new(severity: Severity, description: impl Into<String>, reason: ReasonCode) -> Self {
        let description = description.into();
        Self {
            severity,
            short_description: description.clone(),
            description,
            reason,
        }
    }
}

/// The unified anomaly report for one split.
///
/// Feature paths are unique keys; when two detection sources touch the same
/// path the later write replaces the earlier descriptor (custom validation
/// runs after schema conformance and therefore takes precedence). This is a
/// documented policy, enforced by tests, not an accident of iteration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Feature-level anomalies keyed by feature path
    #[serde(default)]
    pub anomaly_info: BTreeMap<FeaturePath, AnomalyInfo>,
    /// Anomalies that apply to the whole split
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dataset_anomaly_info: Vec<DatasetAnomalyInfo>,
}

impl AnomalyReport {
    /// Creates an empty (clean) report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the report records no anomalies of either kind.
    pub fn is_empty(&self) -> bool {
        self.anomaly_info.is_empty() && self.dataset_anomaly_info.is_empty()
    }

    /// Records a feature-level anomaly, replacing any existing descriptor for
    /// the same path (last-writer-wins).
    pub fn record_feature_anomaly(&mut self, path: impl Into<FeaturePath>, info: AnomalyInfo) {
        self.anomaly_info.insert(path.into(), info);
    }

    /// Appends a dataset-level anomaly.
    pub fn record_dataset_anomaly(&mut self, info: DatasetAnomalyInfo) {
        self.dataset_anomaly_info.push(info);
    }

    /// Returns the sorted feature paths with anomalies, rendered as strings.
    pub fn anomalous_feature_names(&self) -> Vec<String> {
        // BTreeMap iteration is already ordered by path.
        self.anomaly_info.keys().map(|p| p.to_string()).collect()
    }

    /// Serializes the report to its stable on-disk form.
    pub fn to_bytes(&self) -> crate::error::Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Decodes a report from its on-disk form.
    pub fn from_bytes(bytes: &[u8]) -> crate::error::Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
