//! Feature path addressing for statistics, schema, and anomaly reports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A path identifying one feature in a dataset.
///
/// Most features are addressed by a single step (their column name), but
/// nested features carry one step per level. Paths order lexicographically by
/// steps, which keeps report maps and serialized artifacts deterministic, and
/// serialize as the dot-joined step string so they can key JSON maps.
///
/// # Examples
///
/// ```rust
/// use split_guard::core::FeaturePath;
///
/// let path = FeaturePath::new(["company"]);
/// assert_eq!(path.to_string(), "company");
///
/// let nested = FeaturePath::new(["address", "zip_code"]);
/// assert_eq!(nested.to_string(), "address.zip_code");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct FeaturePath {
    steps: Vec<String>,
}

impl FeaturePath {
    /// Creates a path from an ordered list of steps.
    pub fn new<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            steps: steps.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the ordered steps of this path.
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Returns true if the path has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for FeaturePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.steps.join("."))
    }
}

impl From<&str> for FeaturePath {
    fn from(path: &str) -> Self {
        Self::new(path.split('.'))
    }
}

impl From<String> for FeaturePath {
    fn from(path: String) -> Self {
        Self::from(path.as_str())
    }
}

impl From<FeaturePath> for String {
    fn from(path: FeaturePath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_steps() {
        let path = FeaturePath::new(["trip", "fare", "amount"]);
        assert_eq!(path.to_string(), "trip.fare.amount");
    }

    #[test]
    fn test_single_step_from_str() {
        let path: FeaturePath = "company".into();
        assert_eq!(path.steps(), ["company"]);
    }

    #[test]
    fn test_dotted_from_str_splits_steps() {
        let path: FeaturePath = "trip.fare".into();
        assert_eq!(path.steps(), ["trip", "fare"]);
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let a = FeaturePath::from("alpha");
        let b = FeaturePath::from("beta");
        assert!(a < b);
    }

    #[test]
    fn test_serde_round_trip() {
        let path = FeaturePath::new(["address", "zip_code"]);
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#""address.zip_code""#);
        let back: FeaturePath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
