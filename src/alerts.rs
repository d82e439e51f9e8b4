//! Human-readable alert records derived from anomaly reports.
//!
//! Downstream notification systems consume these as `{name, body}` pairs, one
//! per anomaly group, scoped to a split and span. The bodies follow fixed
//! templates so alert routing can key on them.

use crate::core::AnomalyReport;
use serde::{Deserialize, Serialize};

/// Alert name used when a split has any feature-level anomalies.
pub const FEATURE_ANOMALIES_ALERT_NAME: &str = "Feature-level anomalies present";

/// Alert name used for each dataset-level anomaly.
pub const DATASET_ANOMALIES_ALERT_NAME: &str = "Dataset anomalies present";

/// One alert for downstream notification systems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// Alert category name
    pub alert_name: String,
    /// Human-readable alert body
    pub alert_body: String,
}

/// Builds the alert records for one split's anomaly report.
///
/// A non-empty feature-anomaly map produces exactly one record naming the
/// sorted, comma-joined anomalous features; each dataset-level anomaly
/// produces one record of its own. The feature-level record, when present,
/// precedes the dataset-level records. An empty report produces no records.
///
/// # Examples
///
/// ```rust
/// use split_guard::alerts::anomaly_alerts;
/// use split_guard::core::{AnomalyInfo, AnomalyReport, ReasonCode, Severity};
///
/// let mut report = AnomalyReport::new();
/// report.record_feature_anomaly(
///     "company",
///     AnomalyInfo::new(Severity::Error, "bad", ReasonCode::CustomValidation),
/// );
///
/// let alerts = anomaly_alerts(&report, "train", 11);
/// assert_eq!(
///     alerts[0].alert_body,
///     "Feature(s) company contain(s) anomalies for split train, span 11. \
///      See Anomalies artifact for more details."
/// );
/// ```
pub fn anomaly_alerts(report: &AnomalyReport, split: &str, span: u64) -> Vec<AlertRecord> {
    let mut alerts = Vec::new();

    if !report.anomaly_info.is_empty() {
        let features = report.anomalous_feature_names().join(", ");
        alerts.push(AlertRecord {
            alert_name: FEATURE_ANOMALIES_ALERT_NAME.to_string(),
            alert_body: format!(
                "Feature(s) {features} contain(s) anomalies for split {split}, span {span}. \
                 See Anomalies artifact for more details."
            ),
        });
    }

    for dataset_anomaly in &report.dataset_anomaly_info {
        alerts.push(AlertRecord {
            alert_name: DATASET_ANOMALIES_ALERT_NAME.to_string(),
            alert_body: format!(
                "{} in split {split}, span {span}.",
                dataset_anomaly.description
            ),
        });
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AnomalyInfo, DatasetAnomalyInfo, ReasonCode, Severity};

    fn info(desc: &str) -> AnomalyInfo {
        AnomalyInfo::new(Severity::Error, desc, ReasonCode::CustomValidation)
    }

    #[test]
    fn test_empty_report_emits_nothing() {
        assert!(anomaly_alerts(&AnomalyReport::new(), "train", 0).is_empty());
    }

    #[test]
    fn test_feature_alert_body_template() {
        let mut report = AnomalyReport::new();
        report.record_feature_anomaly("company", info("bad"));

        let alerts = anomaly_alerts(&report, "train", 0);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert_name, FEATURE_ANOMALIES_ALERT_NAME);
        assert_eq!(
            alerts[0].alert_body,
            "Feature(s) company contain(s) anomalies for split train, span 0. \
             See Anomalies artifact for more details."
        );
    }

    #[test]
    fn test_multiple_features_sorted_and_joined() {
        let mut report = AnomalyReport::new();
        report.record_feature_anomaly("tips", info("bad"));
        report.record_feature_anomaly("company", info("bad"));

        let alerts = anomaly_alerts(&report, "eval", 7);
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0]
            .alert_body
            .starts_with("Feature(s) company, tips contain(s) anomalies for split eval, span 7."));
    }

    #[test]
    fn test_dataset_alert_body_template() {
        let mut report = AnomalyReport::new();
        report.record_dataset_anomaly(DatasetAnomalyInfo::new(
            Severity::Error,
            "Low num examples in dataset.",
            ReasonCode::DatasetLowNumExamples,
        ));

        let alerts = anomaly_alerts(&report, "train", 3);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert_name, DATASET_ANOMALIES_ALERT_NAME);
        assert_eq!(
            alerts[0].alert_body,
            "Low num examples in dataset. in split train, span 3."
        );
    }

    #[test]
    fn test_feature_alert_precedes_dataset_alerts() {
        let mut report = AnomalyReport::new();
        report.record_dataset_anomaly(DatasetAnomalyInfo::new(
            Severity::Error,
            "Low num examples in dataset.",
            ReasonCode::DatasetLowNumExamples,
        ));
        report.record_feature_anomaly("company", info("bad"));

        let alerts = anomaly_alerts(&report, "train", 0);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].alert_name, FEATURE_ANOMALIES_ALERT_NAME);
        assert_eq!(alerts[1].alert_name, DATASET_ANOMALIES_ALERT_NAME);
    }

    #[test]
    fn test_alert_count_matches_report_shape() {
        let mut report = AnomalyReport::new();
        report.record_feature_anomaly("a", info("bad"));
        report.record_feature_anomaly("b", info("bad"));
        for _ in 0..3 {
            report.record_dataset_anomaly(DatasetAnomalyInfo::new(
                Severity::Warning,
                "odd",
                ReasonCode::Unknown,
            ));
        }
        // One record for all feature anomalies, one per dataset anomaly.
        assert_eq!(anomaly_alerts(&report, "train", 0).len(), 4);
    }
}
