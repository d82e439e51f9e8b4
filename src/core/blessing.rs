//! Per-split pass/fail verdicts derived from anomaly reports.

use crate::core::AnomalyReport;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict on whether a split passed validation.
///
/// A split is blessed iff its anomaly report is empty. The two variants
/// serialize as the literal tokens `BLESSED` and `NOT_BLESSED`; no code should
/// compare against those strings directly.
///
/// # Examples
///
/// ```rust
/// use split_guard::core::{AnomalyReport, Blessing};
///
/// let report = AnomalyReport::new();
/// assert_eq!(Blessing::from_report(&report), Blessing::Blessed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Blessing {
    /// The split's anomaly report is empty
    #[serde(rename = "BLESSED")]
    Blessed,
    /// The split's anomaly report records at least one anomaly
    #[serde(rename = "NOT_BLESSED")]
    NotBlessed,
}

impl Blessing {
    /// Derives the verdict for a split from its anomaly report.
    pub fn from_report(report: &AnomalyReport) -> Self {
        if report.is_empty() {
            Self::Blessed
        } else {
            Self::NotBlessed
        }
    }

    /// Returns true for [`Blessing::Blessed`].
    pub fn is_blessed(&self) -> bool {
        matches!(self, Self::Blessed)
    }

    /// Returns the serialized token for this verdict.
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Blessed => "BLESSED",
            Self::NotBlessed => "NOT_BLESSED",
        }
    }
}

impl fmt::Display for Blessing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}
