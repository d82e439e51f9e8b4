//! # split-guard - Split-Aware Statistical Validation for Rust
//!
//! split-guard validates per-split dataset statistics against a declared
//! schema and optional custom rules, decides a pass/fail blessing per split,
//! persists deterministic anomaly reports, and produces structured alert
//! records for downstream notification systems. It is the validation stage of
//! a dataset pipeline: a statistics generator runs upstream, and training only
//! proceeds for blessed splits.
//!
//! ## Overview
//!
//! A validation run consumes three read-only inputs - a statistics bundle
//! (one summary per split, sharing a span), a schema, and an optional custom
//! validation rule set - and produces one artifact: per-split anomaly reports
//! on disk, a blessing map, and (when anything was flagged) a packed alert
//! list. Runs are deterministic and idempotent: identical inputs always yield
//! byte-identical report files.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use split_guard::config::ValidatorConfig;
//! use split_guard::core::StatisticsArtifact;
//! use split_guard::executor::{ValidationExecutor, ValidationRequest};
//!
//! # async fn example() -> split_guard::error::Result<()> {
//! let executor = ValidationExecutor::new(
//!     ValidatorConfig::default().with_excluded_splits(["test"]),
//! );
//!
//! let result = executor
//!     .run(ValidationRequest {
//!         statistics: StatisticsArtifact::new(
//!             "/pipeline/statistics_gen",
//!             r#"["train","eval","test"]"#,
//!             11,
//!         ),
//!         schema_uri: "/pipeline/schema_gen".into(),
//!         output_root: "/pipeline/example_validator/output".into(),
//!     })
//!     .await?;
//!
//! // Per-split verdicts are attached as a structured property.
//! if let Some(blessing) = result.output.blessing_map() {
//!     for (split, verdict) in &blessing {
//!         println!("{split}: {verdict}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **`core`**: the data model - statistics, schema, anomaly reports,
//!   blessings, and the split resolver
//! - **`detector`**: the [`detector::AnomalyDetector`] collaborator trait, the
//!   shipped schema-conformance detector, and custom validation rules
//! - **`alerts`**: anomaly reports rendered into `{name, body}` alert records
//! - **`output`**: staged, atomic persistence of per-split reports and the
//!   run descriptor
//! - **`executor`**: the orchestrating pass over all retained splits
//! - **`config`** / **`error`** / **`logging`**: run configuration, the error
//!   taxonomy, and tracing-subscriber setup for hosts
//!
//! ## Failure model
//!
//! All errors are fatal to the run that raised them: a bad configuration or a
//! detector/storage failure aborts the pass with no descriptor, so callers can
//! always distinguish "all splits clean" from "validation could not run".

pub mod alerts;
pub mod config;
pub mod core;
pub mod detector;
pub mod error;
pub mod executor;
pub mod logging;
pub mod output;
pub mod prelude;
