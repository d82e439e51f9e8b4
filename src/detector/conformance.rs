//! Reference schema-conformance detector.
//!
//! Checks observed split statistics against the declared schema: unexpected
//! and missing features, presence fractions, value-count ranges, type
//! compatibility, and value domains, plus the dataset-level minimum-example
//! check. Heavier statistical methods (drift, distribution distance) belong to
//! external detector implementations behind the same trait.

use crate::core::{
    AnomalyInfo, AnomalyReport, DatasetAnomalyInfo, Domain, FeatureType, ReasonCode, Schema,
    Severity, SplitStatistics, ValueStatistics,
};
use crate::detector::AnomalyDetector;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tuning knobs for [`SchemaConformanceDetector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConformanceOptions {
    /// Splits with fewer examples than this raise a dataset-level anomaly
    pub min_examples: u64,
    /// Whether statistics features absent from the schema are anomalous
    pub flag_new_columns: bool,
    /// Severity assigned to new-column anomalies
    pub new_column_severity: Severity,
}

impl Default for ConformanceOptions {
    fn default() -> Self {
        Self {
            min_examples: 1,
            flag_new_columns: true,
            new_column_severity: Severity::Error,
        }
    }
}

/// The shipped [`AnomalyDetector`] implementation.
///
/// # Examples
///
/// ```rust
/// use split_guard::detector::{AnomalyDetector, SchemaConformanceDetector};
/// use split_guard::core::{Schema, SplitStatistics};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let detector = SchemaConformanceDetector::default();
/// let report = detector
///     .detect(&SplitStatistics::new(10), &Schema::new())
///     .await
///     .unwrap();
/// assert!(report.is_empty());
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaConformanceDetector {
    options: ConformanceOptions,
}

impl SchemaConformanceDetector {
    /// Creates a detector with the given tuning options.
    pub fn new(options: ConformanceOptions) -> Self {
        Self { options }
    }

    /// Returns the detector's tuning options.
    pub fn options(&self) -> &ConformanceOptions {
        &self.options
    }

    fn check_dataset(&self, statistics: &SplitStatistics, report: &mut AnomalyReport) {
        if statistics.num_examples < self.options.min_examples {
            report.record_dataset_anomaly(DatasetAnomalyInfo::new(
                Severity::Error,
                "Low num examples in dataset.",
                ReasonCode::DatasetLowNumExamples,
            ));
        }
    }

    fn check_new_columns(
        &self,
        statistics: &SplitStatistics,
        schema: &Schema,
        report: &mut AnomalyReport,
    ) {
        if !self.options.flag_new_columns {
            return;
        }
        for path in statistics.features.keys() {
            if schema.feature(path).is_none() {
                report.record_feature_anomaly(
                    path.clone(),
                    AnomalyInfo::with_descriptions(
                        self.options.new_column_severity,
                        "New column",
                        format!("New column '{path}' found in data but not in the schema."),
                        ReasonCode::SchemaNewColumn,
                    ),
                );
            }
        }
    }

    fn check_declared_features(
        &self,
        statistics: &SplitStatistics,
        schema: &Schema,
        report: &mut AnomalyReport,
    ) {
        for spec in &schema.features {
            let Some(stats) = statistics.feature(&spec.path) else {
                if spec.presence.min_count > 0 || spec.presence.min_fraction > 0.0 {
                    report.record_feature_anomaly(
                        spec.path.clone(),
                        AnomalyInfo::with_descriptions(
                            Severity::Error,
                            "Column dropped",
                            format!(
                                "Column '{}' is required by the schema but missing from the data.",
                                spec.path
                            ),
                            ReasonCode::FeatureTypeNotPresent,
                        ),
                    );
                }
                continue;
            };

            if let Some(info) = self.check_presence(spec, stats) {
                report.record_feature_anomaly(spec.path.clone(), info);
                continue;
            }
            if let Some(info) = self.check_value_count(spec, stats) {
                report.record_feature_anomaly(spec.path.clone(), info);
                continue;
            }
            if let Some(info) = self.check_type(spec, stats) {
                report.record_feature_anomaly(spec.path.clone(), info);
                continue;
            }
            if let Some(info) = self.check_domain(spec, stats) {
                report.record_feature_anomaly(spec.path.clone(), info);
            }
        }
    }

    fn check_presence(
        &self,
        spec: &crate::core::FeatureSpec,
        stats: &crate::core::FeatureStatistics,
    ) -> Option<AnomalyInfo> {
        let fraction = stats.presence_fraction();
        if fraction < spec.presence.min_fraction
            || stats.common.num_non_missing < spec.presence.min_count
        {
            return Some(AnomalyInfo::with_descriptions(
                Severity::Error,
                "The feature was present in fewer examples than expected.",
                format!(
                    "Feature '{}' was present in {:.4} of examples, schema requires at least {:.4}.",
                    spec.path, fraction, spec.presence.min_fraction
                ),
                ReasonCode::SmallFractionPresent,
            ));
        }
        None
    }

    fn check_value_count(
        &self,
        spec: &crate::core::FeatureSpec,
        stats: &crate::core::FeatureStatistics,
    ) -> Option<AnomalyInfo> {
        let range = spec.value_count.as_ref()?;
        if stats.common.min_num_values < range.min || stats.common.max_num_values > range.max {
            return Some(AnomalyInfo::with_descriptions(
                Severity::Error,
                "Unexpected number of values per example.",
                format!(
                    "Feature '{}' has between {} and {} values per example, schema allows [{}, {}].",
                    spec.path,
                    stats.common.min_num_values,
                    stats.common.max_num_values,
                    range.min,
                    range.max
                ),
                ReasonCode::ValueCountMismatch,
            ));
        }
        None
    }

    fn check_type(
        &self,
        spec: &crate::core::FeatureSpec,
        stats: &crate::core::FeatureStatistics,
    ) -> Option<AnomalyInfo> {
        let compatible = matches!(
            (&stats.values, spec.feature_type),
            (ValueStatistics::Numeric(_), FeatureType::Int)
                | (ValueStatistics::Numeric(_), FeatureType::Float)
                | (ValueStatistics::String(_), FeatureType::Bytes)
        );
        if !compatible {
            let observed = match &stats.values {
                ValueStatistics::Numeric(_) => "numeric",
                ValueStatistics::String(_) => "string",
            };
            return Some(AnomalyInfo::with_descriptions(
                Severity::Error,
                "The feature has an unexpected data type.",
                format!(
                    "Feature '{}' has {observed} values but the schema declares {:?}.",
                    spec.path, spec.feature_type
                ),
                ReasonCode::FeatureTypeMismatch,
            ));
        }
        None
    }

    fn check_domain(
        &self,
        spec: &crate::core::FeatureSpec,
        stats: &crate::core::FeatureStatistics,
    ) -> Option<AnomalyInfo> {
        let domain = spec.domain.as_ref()?;
        match (domain, &stats.values) {
            (Domain::StringValues(allowed), ValueStatistics::String(string_stats)) => {
                let unexpected: Vec<&str> = string_stats
                    .top_values
                    .iter()
                    .map(|v| v.value.as_str())
                    .filter(|v| !allowed.iter().any(|a| a == v))
                    .collect();
                if !unexpected.is_empty() {
                    return Some(AnomalyInfo::with_descriptions(
                        Severity::Error,
                        "Unexpected string values",
                        format!(
                            "Feature '{}' has values not in the schema domain: {}.",
                            spec.path,
                            unexpected.join(", ")
                        ),
                        ReasonCode::OutOfDomain,
                    ));
                }
            }
            (Domain::IntRange { min, max }, ValueStatistics::Numeric(num_stats)) => {
                if num_stats.min < *min as f64 || num_stats.max > *max as f64 {
                    return Some(self.out_of_range(spec, num_stats.min, num_stats.max));
                }
            }
            (Domain::FloatRange { min, max }, ValueStatistics::Numeric(num_stats)) => {
                if num_stats.min < *min || num_stats.max > *max {
                    return Some(self.out_of_range(spec, num_stats.min, num_stats.max));
                }
            }
            // Type mismatches between domain and values are reported by the
            // type check; nothing further to do here.
            _ => {}
        }
        None
    }

    fn out_of_range(&self, spec: &crate::core::FeatureSpec, min: f64, max: f64) -> AnomalyInfo {
        AnomalyInfo::with_descriptions(
            Severity::Error,
            "Out-of-range values",
            format!(
                "Feature '{}' has values in [{min}, {max}], outside the schema domain.",
                spec.path
            ),
            ReasonCode::OutOfDomain,
        )
    }
}

#[async_trait]
impl AnomalyDetector for SchemaConformanceDetector {
    async fn detect(&self, statistics: &SplitStatistics, schema: &Schema) -> Result<AnomalyReport> {
        let mut report = AnomalyReport::new();
        self.check_dataset(statistics, &mut report);
        self.check_new_columns(statistics, schema, &mut report);
        self.check_declared_features(statistics, schema, &mut report);
        debug!(
            features.flagged = report.anomaly_info.len(),
            dataset.flagged = report.dataset_anomaly_info.len(),
            "Schema conformance check finished"
        );
        Ok(report)
    }
}
