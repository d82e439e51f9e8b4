//! Custom validation rules evaluated against split statistics.
//!
//! A rule binds a feature path to a boolean expression over that feature's
//! statistics, with a severity and a human description. Expressions are
//! anomaly predicates: when one evaluates to true, a feature-level anomaly
//! with reason `CUSTOM_VALIDATION` is recorded for the rule's path, replacing
//! any schema-conformance descriptor already there.
//!
//! The expression grammar is a single comparison against a statistics field:
//!
//! ```text
//! feature.string_stats.common_stats.min_num_values > 5
//! feature.num_stats.mean <= 120.5
//! feature.common_stats.num_missing != 0
//! ```
//!
//! Field paths address [`crate::core::CommonStatistics`] (optionally through
//! the `string_stats.common_stats` / `num_stats.common_stats` spellings) and
//! the kind-specific value statistics. All expressions are compiled before any
//! detection runs; a malformed expression fails the whole run with a
//! configuration error and no output.

use crate::core::{
    AnomalyInfo, AnomalyReport, FeaturePath, FeatureStatistics, ReasonCode, Severity,
    SplitStatistics, ValueStatistics,
};
use crate::error::{Result, ValidatorError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Optional set of custom validation rules for a run.
///
/// Absence of a config skips custom validation entirely; an empty
/// `feature_validations` list is a valid config that simply has no rules.
/// The two are semantically distinct and both supported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomValidationConfig {
    /// Rules grouped by the feature they validate, in declaration order
    #[serde(default)]
    pub feature_validations: Vec<FeatureValidation>,
}

impl CustomValidationConfig {
    /// Creates a config with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a validation group for one feature, returning `self` for chaining.
    pub fn with_feature_validation(mut self, validation: FeatureValidation) -> Self {
        self.feature_validations.push(validation);
        self
    }
}

/// All rules bound to one feature path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureValidation {
    /// The feature the expressions inspect
    pub feature_path: FeaturePath,
    /// The rules, evaluated in order
    pub validations: Vec<Validation>,
}

/// One custom validation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    /// Anomaly predicate over the feature's statistics
    pub expression: String,
    /// Severity of the anomaly raised when the predicate holds
    pub severity: Severity,
    /// Human description used as the anomaly's short description
    pub description: String,
}

static EXPRESSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^feature((?:\.[A-Za-z_][A-Za-z0-9_]*)+)\s*(>=|<=|==|!=|>|<)\s*(-?\d+(?:\.\d+)?)$",
    )
    .expect("expression regex is valid")
});

/// Builds the long description recorded for a fired rule.
fn triggered_description(expression: &str) -> String {
    format!("Custom validation triggered anomaly. Query: {expression} Test dataset: default slice")
}

/// A statistics field an expression can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatField {
    NumNonMissing,
    NumMissing,
    MinNumValues,
    MaxNumValues,
    AvgNumValues,
    StringUnique,
    StringAvgLength,
    NumericMin,
    NumericMax,
    NumericMean,
    NumericStdDev,
    NumericNumZeros,
}

impl StatField {
    /// Resolves a dotted field path (without the leading `feature.`).
    fn resolve(path: &str) -> Option<Self> {
        // The common-stats block may be addressed bare or through the
        // kind-specific spellings used by upstream statistics queries.
        let common = path
            .strip_prefix("common_stats.")
            .or_else(|| path.strip_prefix("string_stats.common_stats."))
            .or_else(|| path.strip_prefix("num_stats.common_stats."));
        if let Some(field) = common {
            return match field {
                "num_non_missing" => Some(Self::NumNonMissing),
                "num_missing" => Some(Self::NumMissing),
                "min_num_values" => Some(Self::MinNumValues),
                "max_num_values" => Some(Self::MaxNumValues),
                "avg_num_values" => Some(Self::AvgNumValues),
                _ => None,
            };
        }
        match path {
            "string_stats.unique" => Some(Self::StringUnique),
            "string_stats.avg_length" => Some(Self::StringAvgLength),
            "num_stats.min" => Some(Self::NumericMin),
            "num_stats.max" => Some(Self::NumericMax),
            "num_stats.mean" => Some(Self::NumericMean),
            "num_stats.std_dev" => Some(Self::NumericStdDev),
            "num_stats.num_zeros" => Some(Self::NumericNumZeros),
            _ => None,
        }
    }

    /// Extracts the field's value, or `None` when the feature's value kind
    /// does not carry it.
    fn extract(&self, stats: &FeatureStatistics) -> Option<f64> {
        match self {
            Self::NumNonMissing => Some(stats.common.num_non_missing as f64),
            Self::NumMissing => Some(stats.common.num_missing as f64),
            Self::MinNumValues => Some(stats.common.min_num_values as f64),
            Self::MaxNumValues => Some(stats.common.max_num_values as f64),
            Self::AvgNumValues => Some(stats.common.avg_num_values),
            Self::StringUnique | Self::StringAvgLength => match &stats.values {
                ValueStatistics::String(s) => Some(match self {
                    Self::StringUnique => s.unique as f64,
                    _ => s.avg_length,
                }),
                ValueStatistics::Numeric(_) => None,
            },
            Self::NumericMin
            | Self::NumericMax
            | Self::NumericMean
            | Self::NumericStdDev
            | Self::NumericNumZeros => match &stats.values {
                ValueStatistics::Numeric(n) => Some(match self {
                    Self::NumericMin => n.min,
                    Self::NumericMax => n.max,
                    Self::NumericMean => n.mean,
                    Self::NumericStdDev => n.std_dev,
                    _ => n.num_zeros as f64,
                }),
                ValueStatistics::String(_) => None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparator {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

impl Comparator {
    fn parse(op: &str) -> Option<Self> {
        match op {
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            _ => None,
        }
    }

    fn holds(&self, left: f64, right: f64) -> bool {
        match self {
            Self::Gt => left > right,
            Self::Ge => left >= right,
            Self::Lt => left < right,
            Self::Le => left <= right,
            Self::Eq => left == right,
            Self::Ne => left != right,
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    feature_path: FeaturePath,
    expression: String,
    field: StatField,
    comparator: Comparator,
    literal: f64,
    severity: Severity,
    description: String,
}

/// Custom validation rules compiled for one run.
///
/// Compilation front-loads every parse failure so a malformed rule aborts the
/// run before any detection or output.
#[derive(Debug, Clone, Default)]
pub struct CompiledRules {
    rules: Vec<CompiledRule>,
}

impl CompiledRules {
    /// Compiles every rule in the config.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Config`] on a malformed expression or an
    /// unknown statistics field.
    pub fn compile(config: &CustomValidationConfig) -> Result<Self> {
        let mut rules = Vec::new();
        for feature_validation in &config.feature_validations {
            for validation in &feature_validation.validations {
                rules.push(Self::compile_rule(
                    &feature_validation.feature_path,
                    validation,
                )?);
            }
        }
        Ok(Self { rules })
    }

    fn compile_rule(path: &FeaturePath, validation: &Validation) -> Result<CompiledRule> {
        let expression = validation.expression.trim();
        let captures = EXPRESSION_RE.captures(expression).ok_or_else(|| {
            ValidatorError::config(format!(
                "malformed validation expression for feature '{path}': {expression:?}"
            ))
        })?;

        let field_path = captures[1].trim_start_matches('.');
        let field = StatField::resolve(field_path).ok_or_else(|| {
            ValidatorError::config(format!(
                "unknown statistics field 'feature.{field_path}' in expression for feature '{path}'"
            ))
        })?;
        let comparator =
            Comparator::parse(&captures[2]).expect("regex only matches known comparators");
        let literal: f64 = captures[3]
            .parse()
            .expect("regex only matches numeric literals");

        Ok(CompiledRule {
            feature_path: path.clone(),
            expression: expression.to_string(),
            field,
            comparator,
            literal,
            severity: validation.severity,
            description: validation.description.clone(),
        })
    }

    /// Returns true when no rules were configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the number of compiled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Evaluates every rule against one split's statistics, recording an
    /// anomaly for each predicate that holds.
    ///
    /// A rule whose feature is absent from the statistics, or whose field does
    /// not apply to the feature's value kind, records nothing.
    pub fn apply(&self, statistics: &SplitStatistics, report: &mut AnomalyReport) {
        for rule in &self.rules {
            let Some(stats) = statistics.feature(&rule.feature_path) else {
                debug!(
                    feature = %rule.feature_path,
                    expression = %rule.expression,
                    "Skipping rule: feature not in split statistics"
                );
                continue;
            };
            let Some(observed) = rule.field.extract(stats) else {
                debug!(
                    feature = %rule.feature_path,
                    expression = %rule.expression,
                    "Skipping rule: field not applicable to feature's value kind"
                );
                continue;
            };
            if rule.comparator.holds(observed, rule.literal) {
                report.record_feature_anomaly(
                    rule.feature_path.clone(),
                    AnomalyInfo::with_descriptions(
                        rule.severity,
                        rule.description.clone(),
                        triggered_description(&rule.expression),
                        ReasonCode::CustomValidation,
                    ),
                );
            }
        }
    }
}
