//! The orchestrating executor: one validation pass over all retained splits.
//!
//! The executor is the only component that sees every input and output
//! together. A run is a single blocking unit: configuration and rule
//! compilation are checked before any I/O, per-split detection fans out onto
//! independent tasks, and a failure in any split aborts the whole run with no
//! descriptor returned.

use crate::alerts::anomaly_alerts;
use crate::config::ValidatorConfig;
use crate::core::{
    decode_split_names, resolve_splits, AnomalyReport, Blessing, Schema, SplitStatistics,
    StatisticsArtifact,
};
use crate::detector::{AnomalyDetector, CompiledRules, SchemaConformanceDetector};
use crate::error::{Result, ValidatorError};
use crate::output::{ExecutionResult, OutputWriter, SplitVerdict};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument};

/// Inputs for one validation run.
#[derive(Debug, Clone)]
pub struct ValidationRequest {
    /// The statistics bundle descriptor
    pub statistics: StatisticsArtifact,
    /// Root directory of the schema artifact
    pub schema_uri: PathBuf,
    /// Root directory to write the validation output under
    pub output_root: PathBuf,
}

/// Runs validation passes: resolves splits, detects anomalies, decides
/// blessings, formats alerts, and writes the output artifact.
///
/// # Examples
///
/// ```rust,no_run
/// use split_guard::config::ValidatorConfig;
/// use split_guard::core::StatisticsArtifact;
/// use split_guard::executor::{ValidationExecutor, ValidationRequest};
///
/// # async fn example() -> split_guard::error::Result<()> {
/// let executor = ValidationExecutor::new(
///     ValidatorConfig::default().with_excluded_splits(["test"]),
/// );
/// let result = executor
///     .run(ValidationRequest {
///         statistics: StatisticsArtifact::new(
///             "/pipeline/statistics_gen",
///             r#"["train","eval","test"]"#,
///             11,
///         ),
///         schema_uri: "/pipeline/schema_gen".into(),
///         output_root: "/pipeline/example_validator/output".into(),
///     })
///     .await?;
/// println!("retained splits: {}", result.output.split_names);
/// # Ok(())
/// # }
/// ```
pub struct ValidationExecutor {
    config: ValidatorConfig,
    detector: Arc<dyn AnomalyDetector>,
}

impl ValidationExecutor {
    /// Creates an executor using the shipped conformance detector, tuned by
    /// the config's conformance options.
    pub fn new(config: ValidatorConfig) -> Self {
        let detector = Arc::new(SchemaConformanceDetector::new(config.conformance.clone()));
        Self { config, detector }
    }

    /// Creates an executor with an injected detector collaborator.
    pub fn with_detector(config: ValidatorConfig, detector: Arc<dyn AnomalyDetector>) -> Self {
        Self { config, detector }
    }

    /// Returns the run configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Runs one validation pass.
    ///
    /// # Errors
    ///
    /// * [`ValidatorError::Config`] - unknown excluded split or malformed
    ///   custom validation rule, raised before any output is written
    /// * [`ValidatorError::Detection`] - the detector failed on some split
    /// * [`ValidatorError::Io`] / [`ValidatorError::Serialization`] - reading
    ///   inputs or writing output failed
    #[instrument(skip(self, request), fields(
        statistics.uri = %request.statistics.uri.display(),
        statistics.span = request.statistics.span,
        output.root = %request.output_root.display(),
    ))]
    pub async fn run(&self, request: ValidationRequest) -> Result<ExecutionResult> {
        let bundle_splits = decode_split_names(&request.statistics.split_names)?;
        let retained = resolve_splits(&bundle_splits, &self.config.exclude_splits)?;
        info!(
            splits.bundle = bundle_splits.len(),
            splits.retained = retained.len(),
            "Starting validation run"
        );

        // Compile rules before any I/O so a bad config fails the run early.
        let rules = match &self.config.custom_validation {
            Some(config) => Some(Arc::new(CompiledRules::compile(config)?)),
            None => None,
        };
        if let Some(rules) = &rules {
            debug!(rules.count = rules.len(), "Compiled custom validation rules");
        }

        let schema = Arc::new(Schema::load(&request.schema_uri)?);
        let mut statistics = Vec::with_capacity(retained.len());
        for split in &retained {
            statistics.push(Arc::new(request.statistics.load_split(split)?));
        }

        let span = request.statistics.span;
        let mut tasks: JoinSet<Result<(usize, SplitVerdict)>> = JoinSet::new();
        for (index, split) in retained.iter().enumerate() {
            let detector = Arc::clone(&self.detector);
            let schema = Arc::clone(&schema);
            let stats = Arc::clone(&statistics[index]);
            let rules = rules.clone();
            let split = split.clone();
            tasks.spawn(async move {
                let report =
                    validate_split(detector.as_ref(), &split, &stats, &schema, rules.as_deref())
                        .await?;
                let blessing = Blessing::from_report(&report);
                let alerts = anomaly_alerts(&report, &split, span);
                debug!(
                    split = %split,
                    blessing = %blessing,
                    alerts = alerts.len(),
                    "Split validated"
                );
                Ok((
                    index,
                    SplitVerdict {
                        split,
                        report,
                        blessing,
                        alerts,
                    },
                ))
            });
        }

        // Fan in, re-sorting by original split index so output ordering never
        // depends on task completion order.
        let mut slots: Vec<Option<SplitVerdict>> = (0..retained.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let (index, verdict) = joined
                .map_err(|e| ValidatorError::detection("unknown", format!("task failed: {e}")))??;
            slots[index] = Some(verdict);
        }
        let mut verdicts = Vec::with_capacity(slots.len());
        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(verdict) => verdicts.push(verdict),
                None => {
                    return Err(ValidatorError::detection(
                        retained[index].clone(),
                        "split task produced no result",
                    ))
                }
            }
        }

        let result = OutputWriter::new(&request.output_root).write(span, &verdicts)?;
        info!(
            splits.retained = verdicts.len(),
            splits.blessed = verdicts.iter().filter(|v| v.blessing.is_blessed()).count(),
            alerts.total = verdicts.iter().map(|v| v.alerts.len()).sum::<usize>(),
            "Validation run finished"
        );
        Ok(result)
    }
}

/// Produces the unified anomaly report for one split: schema conformance via
/// the detector collaborator, then custom validation rules on top. When both
/// sources flag the same feature path, the custom-validation descriptor
/// replaces the conformance one.
///
/// # Errors
///
/// Any detector failure is reported as [`ValidatorError::Detection`]
/// identifying the split.
pub async fn validate_split(
    detector: &dyn AnomalyDetector,
    split: &str,
    statistics: &SplitStatistics,
    schema: &Schema,
    rules: Option<&CompiledRules>,
) -> Result<AnomalyReport> {
    let mut report = detector.detect(statistics, schema).await.map_err(|e| {
        ValidatorError::detection_with_source(split, "anomaly detector failed", Box::new(e))
    })?;
    if let Some(rules) = rules {
        rules.apply(statistics, &mut report);
    }
    Ok(report)
}
