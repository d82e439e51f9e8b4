//! Core data model for the validation engine.
//!
//! Everything the engine coordinates lives here: the statistics bundle shape,
//! the declared schema, anomaly reports, per-split blessings, and the
//! split-name resolver. All of these are created fresh per validation run from
//! read-only inputs and never mutated after construction.

mod anomalies;
mod blessing;
mod path;
mod schema;
mod splits;
mod statistics;

pub use anomalies::{
    AnomalyInfo, AnomalyReport, DatasetAnomalyInfo, DiffRegion, ReasonCode, Severity,
};
pub use blessing::Blessing;
pub use path::FeaturePath;
pub use schema::{
    Domain, FeaturePresence, FeatureSpec, FeatureType, Schema, ValueCountRange, SCHEMA_FILE_NAME,
};
pub use splits::{decode_split_names, encode_split_names, resolve_splits};
pub use statistics::{
    CommonStatistics, FeatureStatistics, NumericStatistics, SplitStatistics, StatisticsArtifact,
    StringStatistics, ValueFrequency, ValueStatistics, FEATURE_STATS_FILE_NAME,
};
