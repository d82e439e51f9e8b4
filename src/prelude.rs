//! Prelude for commonly used types in split-guard.

pub use crate::alerts::AlertRecord;
pub use crate::config::ValidatorConfig;
pub use crate::core::{AnomalyReport, Blessing, Schema, SplitStatistics, StatisticsArtifact};
pub use crate::detector::{AnomalyDetector, CustomValidationConfig};
pub use crate::error::{Result, ValidatorError};
pub use crate::executor::{ValidationExecutor, ValidationRequest};
pub use crate::output::ExecutionResult;
