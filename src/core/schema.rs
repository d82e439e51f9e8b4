//! Declared feature constraints checked against observed statistics.

use crate::core::FeaturePath;
use crate::error::{Result, ValidatorError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the serialized schema under the schema artifact's uri.
pub const SCHEMA_FILE_NAME: &str = "schema.json";

/// The declared shape of a dataset: one constraint block per feature.
///
/// Schemas are produced upstream (curated by hand or inferred from a baseline
/// span) and are read-only inputs here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Declared features, in declaration order
    pub features: Vec<FeatureSpec>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a feature declaration, returning `self` for chaining.
    pub fn with_feature(mut self, feature: FeatureSpec) -> Self {
        self.features.push(feature);
        self
    }

    /// Returns the declaration for a feature path, if present.
    pub fn feature(&self, path: &FeaturePath) -> Option<&FeatureSpec> {
        self.features.iter().find(|f| &f.path == path)
    }

    /// Loads a schema from `schema.json` under the given artifact root.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Io`] when the file cannot be read and
    /// [`ValidatorError::Serialization`] when it does not decode.
    pub fn load(uri: &Path) -> Result<Self> {
        let path = uri.join(SCHEMA_FILE_NAME);
        let bytes = std::fs::read(&path)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ValidatorError::serialization(format!("invalid schema at {}: {e}", path.display()))
        })
    }

    /// Writes the schema to `schema.json` under the given root.
    pub fn write_to(&self, uri: &Path) -> Result<()> {
        std::fs::create_dir_all(uri)?;
        let bytes = serde_json::to_vec_pretty(self)?;
        std::fs::write(uri.join(SCHEMA_FILE_NAME), bytes)?;
        Ok(())
    }
}

/// Constraints declared for one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    /// The feature this declaration applies to
    pub path: FeaturePath,
    /// Expected value type
    pub feature_type: FeatureType,
    /// Presence requirements
    #[serde(default)]
    pub presence: FeaturePresence,
    /// Allowed values-per-example range, unconstrained when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_count: Option<ValueCountRange>,
    /// Allowed value domain, unconstrained when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
}

impl FeatureSpec {
    /// Creates a declaration with default presence and no domain constraints.
    pub fn new(path: impl Into<FeaturePath>, feature_type: FeatureType) -> Self {
        Self {
            path: path.into(),
            feature_type,
            presence: FeaturePresence::default(),
            value_count: None,
            domain: None,
        }
    }

    /// Sets the presence requirements.
    pub fn with_presence(mut self, presence: FeaturePresence) -> Self {
        self.presence = presence;
        self
    }

    /// Sets the allowed values-per-example range.
    pub fn with_value_count(mut self, min: u64, max: u64) -> Self {
        self.value_count = Some(ValueCountRange { min, max });
        self
    }

    /// Sets the allowed value domain.
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }
}

/// Expected value type of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureType {
    /// Integer values
    Int,
    /// Floating-point values
    Float,
    /// String/bytes values
    Bytes,
}

/// How often a feature must appear across the split's examples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturePresence {
    /// Minimum fraction of examples that must contain the feature
    pub min_fraction: f64,
    /// Minimum absolute number of examples that must contain the feature
    pub min_count: u64,
}

impl Default for FeaturePresence {
    fn default() -> Self {
        // Required in every example unless the schema relaxes it.
        Self {
            min_fraction: 1.0,
            min_count: 1,
        }
    }
}

impl FeaturePresence {
    /// Presence requirements for an optional feature.
    pub fn optional() -> Self {
        Self {
            min_fraction: 0.0,
            min_count: 0,
        }
    }

    /// Presence requirements with a minimum fraction only.
    pub fn fraction(min_fraction: f64) -> Self {
        Self {
            min_fraction,
            min_count: 0,
        }
    }
}

/// Allowed values-per-example range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCountRange {
    /// Minimum values per example
    pub min: u64,
    /// Maximum values per example
    pub max: u64,
}

/// Allowed domain of a feature's values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Values must be drawn from this set
    StringValues(Vec<String>),
    /// Values must fall in this inclusive integer range
    IntRange {
        /// Lower bound
        min: i64,
        /// Upper bound
        max: i64,
    },
    /// Values must fall in this inclusive float range
    FloatRange {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        Schema::new()
            .with_feature(
                FeatureSpec::new("company", FeatureType::Bytes)
                    .with_domain(Domain::StringValues(vec!["acme".into(), "cyberdyne".into()])),
            )
            .with_feature(
                FeatureSpec::new("trip_miles", FeatureType::Float)
                    .with_presence(FeaturePresence::fraction(0.9)),
            )
    }

    #[test]
    fn test_feature_lookup() {
        let schema = sample_schema();
        assert!(schema.feature(&"company".into()).is_some());
        assert!(schema.feature(&"tips".into()).is_none());
    }

    #[test]
    fn test_default_presence_is_required() {
        let presence = FeaturePresence::default();
        assert_eq!(presence.min_fraction, 1.0);
        assert_eq!(presence.min_count, 1);
    }

    #[test]
    fn test_load_write_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let schema = sample_schema();
        schema.write_to(dir.path()).unwrap();
        let loaded = Schema::load(dir.path()).unwrap();
        assert_eq!(loaded, schema);
    }

    #[test]
    fn test_load_missing_schema_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Schema::load(dir.path()).unwrap_err();
        assert!(matches!(err, crate::error::ValidatorError::Io(_)));
    }
}
