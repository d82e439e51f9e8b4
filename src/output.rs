//! Persistence of validation results and assembly of the run descriptor.
//!
//! Each retained split's anomaly report lands at
//! `<root>/Split-{name}/SchemaDiff.json`; excluded splits get no path at all.
//! Writes are staged: every report is serialized in memory before the first
//! file is created, and each file goes through a `.tmp` sibling plus an atomic
//! rename, so a failed run never leaves a torn file and never returns a
//! descriptor.

use crate::alerts::AlertRecord;
use crate::core::{encode_split_names, AnomalyReport, Blessing};
use crate::error::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// File name of one split's serialized anomaly report.
pub const ANOMALIES_FILE_NAME: &str = "SchemaDiff.json";

/// Custom-property key under which the blessing map is attached to the
/// validation output artifact.
pub const BLESSED_PROPERTY_KEY: &str = "blessed";

/// Execution-result property key under which the packed alert list is
/// attached. The key is absent, not mapped to an empty list, when the run
/// produced no alerts.
pub const ALERTS_PROPERTY_KEY: &str = "generated_alerts";

/// Everything the run decided about one retained split.
#[derive(Debug, Clone)]
pub struct SplitVerdict {
    /// The split's name
    pub split: String,
    /// The unified anomaly report
    pub report: AnomalyReport,
    /// Pass/fail verdict derived from the report
    pub blessing: Blessing,
    /// Alert records derived from the report
    pub alerts: Vec<AlertRecord>,
}

/// Descriptor of the validation output artifact written by a run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValidationOutput {
    /// Root directory holding the per-split report files
    pub uri: PathBuf,
    /// Encoded retained split-name list
    pub split_names: String,
    /// Span copied verbatim from the input statistics bundle
    pub span: u64,
    /// Structured custom properties, including the blessing map
    pub custom_properties: BTreeMap<String, Value>,
}

impl ValidationOutput {
    /// Returns the path of one split's report file.
    pub fn split_anomalies_path(&self, split: &str) -> PathBuf {
        self.uri.join(format!("Split-{split}")).join(ANOMALIES_FILE_NAME)
    }

    /// Decodes the blessing map property, if present and well-formed.
    pub fn blessing_map(&self) -> Option<BTreeMap<String, Blessing>> {
        let value = self.custom_properties.get(BLESSED_PROPERTY_KEY)?;
        serde_json::from_value(value.clone()).ok()
    }
}

/// The descriptor returned to the orchestrator for a successful run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExecutionResult {
    /// The validation output artifact
    pub output: ValidationOutput,
    /// Execution-level properties (packed alerts live here, when any)
    pub properties: BTreeMap<String, Value>,
}

impl ExecutionResult {
    /// Decodes the packed alert list, if attached.
    pub fn alerts(&self) -> Option<Vec<AlertRecord>> {
        let value = self.properties.get(ALERTS_PROPERTY_KEY)?;
        serde_json::from_value(value.clone()).ok()
    }
}

/// Writes a run's results under one output root.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    root: PathBuf,
}

impl OutputWriter {
    /// Creates a writer rooted at the caller-supplied output directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Persists every split's report and assembles the run descriptor.
    ///
    /// Verdicts must arrive in retained-split order; that order is preserved
    /// in the encoded split-name list and the packed alert list.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ValidatorError::Io`] when a write fails; no
    /// descriptor is produced in that case.
    pub fn write(&self, span: u64, verdicts: &[SplitVerdict]) -> Result<ExecutionResult> {
        // Stage 1: serialize everything before touching the filesystem.
        let mut staged: Vec<(&str, Vec<u8>)> = Vec::with_capacity(verdicts.len());
        for verdict in verdicts {
            staged.push((verdict.split.as_str(), verdict.report.to_bytes()?));
        }

        // Stage 2: flush, one tmp+rename per split file.
        for (split, bytes) in &staged {
            let dir = self.root.join(format!("Split-{split}"));
            std::fs::create_dir_all(&dir)?;
            let final_path = dir.join(ANOMALIES_FILE_NAME);
            let tmp_path = dir.join(format!("{ANOMALIES_FILE_NAME}.tmp"));
            std::fs::write(&tmp_path, bytes)?;
            std::fs::rename(&tmp_path, &final_path)?;
            debug!(split = %split, path = %final_path.display(), "Wrote anomaly report");
        }

        let split_names: Vec<&str> = verdicts.iter().map(|v| v.split.as_str()).collect();
        let blessing: BTreeMap<&str, Blessing> = verdicts
            .iter()
            .map(|v| (v.split.as_str(), v.blessing))
            .collect();

        let mut custom_properties = BTreeMap::new();
        custom_properties.insert(
            BLESSED_PROPERTY_KEY.to_string(),
            serde_json::to_value(&blessing)?,
        );

        let output = ValidationOutput {
            uri: self.root.clone(),
            split_names: encode_split_names(&split_names),
            span,
            custom_properties,
        };

        let mut properties = BTreeMap::new();
        let alerts: Vec<&AlertRecord> = verdicts.iter().flat_map(|v| &v.alerts).collect();
        if !alerts.is_empty() {
            properties.insert(ALERTS_PROPERTY_KEY.to_string(), serde_json::to_value(&alerts)?);
        }

        info!(
            output.uri = %self.root.display(),
            output.splits = verdicts.len(),
            output.alerts = alerts.len(),
            "Validation output written"
        );
        Ok(ExecutionResult { output, properties })
    }
}
