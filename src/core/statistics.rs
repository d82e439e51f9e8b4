//! Per-split dataset statistics consumed by the validation engine.
//!
//! Statistics are produced upstream by a statistics generator and are strictly
//! read-only here. The engine only relies on the attributes this module
//! models: the encoded split-name list, the span marker, and the per-split
//! feature summaries that schema conformance and custom validation rules
//! inspect.

use crate::core::FeaturePath;
use crate::error::{Result, ValidatorError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of one split's serialized statistics under its split directory.
pub const FEATURE_STATS_FILE_NAME: &str = "FeatureStats.json";

/// Descriptor of a statistics bundle produced by an upstream generator.
///
/// The bundle lives at `uri` with one subdirectory per split
/// (`Split-{name}/FeatureStats.json`). The descriptor itself carries the
/// encoded split-name list and the span, mirroring how the orchestrator hands
/// artifacts around without reading their payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsArtifact {
    /// Root directory of the statistics bundle
    pub uri: PathBuf,
    /// Encoded split-name list, see [`crate::core::encode_split_names`]
    pub split_names: String,
    /// Monotonically increasing dataset generation marker
    pub span: u64,
}

impl StatisticsArtifact {
    /// Creates a descriptor for a bundle rooted at `uri`.
    pub fn new(uri: impl Into<PathBuf>, split_names: impl Into<String>, span: u64) -> Self {
        Self {
            uri: uri.into(),
            split_names: split_names.into(),
            span,
        }
    }

    /// Returns the path holding the given split's statistics.
    pub fn split_stats_path(&self, split: &str) -> PathBuf {
        self.uri
            .join(format!("Split-{split}"))
            .join(FEATURE_STATS_FILE_NAME)
    }

    /// Loads and decodes the statistics for one split.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Io`] when the split file cannot be read and
    /// [`ValidatorError::Serialization`] when its contents do not decode.
    pub fn load_split(&self, split: &str) -> Result<SplitStatistics> {
        let path = self.split_stats_path(split);
        debug!(split = %split, path = %path.display(), "Loading split statistics");
        let bytes = std::fs::read(&path)?;
        let stats = serde_json::from_slice(&bytes).map_err(|e| {
            ValidatorError::serialization(format!(
                "invalid statistics for split '{split}' at {}: {e}",
                path.display()
            ))
        })?;
        Ok(stats)
    }
}

/// Decoded statistics for a single split.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitStatistics {
    /// Number of examples in the split
    pub num_examples: u64,
    /// Per-feature summaries, keyed by feature path
    #[serde(default)]
    pub features: BTreeMap<FeaturePath, FeatureStatistics>,
}

impl SplitStatistics {
    /// Creates empty statistics with the given example count.
    pub fn new(num_examples: u64) -> Self {
        Self {
            num_examples,
            features: BTreeMap::new(),
        }
    }

    /// Adds or replaces a feature's statistics, returning `self` for chaining.
    pub fn with_feature(mut self, path: impl Into<FeaturePath>, stats: FeatureStatistics) -> Self {
        self.features.insert(path.into(), stats);
        self
    }

    /// Returns the statistics for a feature path, if present.
    pub fn feature(&self, path: &FeaturePath) -> Option<&FeatureStatistics> {
        self.features.get(path)
    }

    /// Writes these statistics to `Split-{name}/FeatureStats.json` under `root`.
    ///
    /// Used by tests and tooling that fabricate bundles; production bundles
    /// come from the upstream statistics generator.
    pub fn write_to(&self, root: &Path, split: &str) -> Result<()> {
        let dir = root.join(format!("Split-{split}"));
        std::fs::create_dir_all(&dir)?;
        let bytes = serde_json::to_vec_pretty(self)?;
        std::fs::write(dir.join(FEATURE_STATS_FILE_NAME), bytes)?;
        Ok(())
    }
}

/// Summary statistics for one feature in one split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStatistics {
    /// Statistics shared by all feature kinds
    pub common: CommonStatistics,
    /// Kind-specific value statistics
    pub values: ValueStatistics,
}

impl FeatureStatistics {
    /// Creates string-feature statistics.
    pub fn string(common: CommonStatistics, values: StringStatistics) -> Self {
        Self {
            common,
            values: ValueStatistics::String(values),
        }
    }

    /// Creates numeric-feature statistics.
    pub fn numeric(common: CommonStatistics, values: NumericStatistics) -> Self {
        Self {
            common,
            values: ValueStatistics::Numeric(values),
        }
    }

    /// Fraction of examples in which the feature is present.
    ///
    /// Returns 1.0 for a feature observed in every example and 0.0 when the
    /// split has no examples at all.
    pub fn presence_fraction(&self) -> f64 {
        let total = self.common.num_non_missing + self.common.num_missing;
        if total == 0 {
            return 0.0;
        }
        self.common.num_non_missing as f64 / total as f64
    }
}

/// Value-count and presence statistics common to every feature kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonStatistics {
    /// Examples in which the feature appears
    pub num_non_missing: u64,
    /// Examples in which the feature is absent
    pub num_missing: u64,
    /// Minimum values-per-example observed
    pub min_num_values: u64,
    /// Maximum values-per-example observed
    pub max_num_values: u64,
    /// Average values-per-example observed
    pub avg_num_values: f64,
}

impl CommonStatistics {
    /// Creates common statistics for a fully-present single-valued feature.
    pub fn singleton(num_examples: u64) -> Self {
        Self {
            num_non_missing: num_examples,
            num_missing: 0,
            min_num_values: 1,
            max_num_values: 1,
            avg_num_values: 1.0,
        }
    }
}

/// Kind-specific statistics for a feature's values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueStatistics {
    /// Statistics over numeric values
    Numeric(NumericStatistics),
    /// Statistics over string/bytes values
    String(StringStatistics),
}

/// Distribution statistics for a numeric feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericStatistics {
    /// Smallest observed value
    pub min: f64,
    /// Largest observed value
    pub max: f64,
    /// Mean of observed values
    pub mean: f64,
    /// Standard deviation of observed values
    pub std_dev: f64,
    /// Count of zero values
    pub num_zeros: u64,
}

/// Distribution statistics for a string feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringStatistics {
    /// Count of distinct values
    pub unique: u64,
    /// Average value length in bytes
    pub avg_length: f64,
    /// Most frequent values, ordered by descending frequency
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_values: Vec<ValueFrequency>,
}

/// One value and its observed frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueFrequency {
    /// The observed value
    pub value: String,
    /// Number of occurrences
    pub frequency: u64,
}
