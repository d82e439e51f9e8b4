//! End-to-end tests of the validation executor against on-disk bundles.

use split_guard::config::ValidatorConfig;
use split_guard::core::{
    encode_split_names, Blessing, CommonStatistics, FeatureSpec, FeatureStatistics, FeatureType,
    Schema, SplitStatistics, StatisticsArtifact, StringStatistics,
};
use split_guard::detector::{CustomValidationConfig, FeatureValidation, Validation};
use split_guard::error::ValidatorError;
use split_guard::executor::{ValidationExecutor, ValidationRequest};
use split_guard::output::{ExecutionResult, ALERTS_PROPERTY_KEY};
use std::path::Path;
use tempfile::TempDir;

/// Statistics for a fully-present `company` feature with the given
/// values-per-example count.
fn company_stats(num_examples: u64, min_num_values: u64) -> SplitStatistics {
    SplitStatistics::new(num_examples).with_feature(
        "company",
        FeatureStatistics::string(
            CommonStatistics {
                num_non_missing: num_examples,
                num_missing: 0,
                min_num_values,
                max_num_values: min_num_values,
                avg_num_values: min_num_values as f64,
            },
            StringStatistics {
                unique: 17,
                avg_length: 9.0,
                top_values: vec![],
            },
        ),
    )
}

/// Writes a three-split bundle (train/eval/test) and a matching schema,
/// returning the request for a run over them.
fn pipeline_fixture(
    root: &Path,
    span: u64,
    stats_for: impl Fn(&str) -> SplitStatistics,
) -> ValidationRequest {
    let stats_root = root.join("statistics_gen");
    let schema_root = root.join("schema_gen");
    let splits = ["train", "eval", "test"];
    for split in splits {
        stats_for(split).write_to(&stats_root, split).unwrap();
    }
    Schema::new()
        .with_feature(FeatureSpec::new("company", FeatureType::Bytes))
        .write_to(&schema_root)
        .unwrap();

    ValidationRequest {
        statistics: StatisticsArtifact::new(&stats_root, encode_split_names(&splits), span),
        schema_uri: schema_root,
        output_root: root.join("output"),
    }
}

fn blessing_of(result: &ExecutionResult, split: &str) -> Blessing {
    result.output.blessing_map().unwrap()[split]
}

#[tokio::test]
async fn test_conforming_bundle_blesses_all_retained_splits() {
    let dir = TempDir::new().unwrap();
    let request = pipeline_fixture(dir.path(), 11, |_| company_stats(100, 1));

    let executor =
        ValidationExecutor::new(ValidatorConfig::default().with_excluded_splits(["test"]));
    let result = executor.run(request).await.unwrap();

    assert_eq!(result.output.split_names, r#"["train","eval"]"#);
    assert_eq!(result.output.span, 11);
    assert_eq!(blessing_of(&result, "train"), Blessing::Blessed);
    assert_eq!(blessing_of(&result, "eval"), Blessing::Blessed);

    assert!(result.output.split_anomalies_path("train").exists());
    assert!(result.output.split_anomalies_path("eval").exists());
    assert!(!dir.path().join("output").join("Split-test").exists());

    // All clean: the alert property is absent, not an empty list.
    assert!(!result.properties.contains_key(ALERTS_PROPERTY_KEY));
}

#[tokio::test]
async fn test_custom_rule_blocks_blessing_and_raises_alerts() {
    let dir = TempDir::new().unwrap();
    let request = pipeline_fixture(dir.path(), 11, |_| company_stats(100, 10));

    let rules = CustomValidationConfig::new().with_feature_validation(FeatureValidation {
        feature_path: "company".into(),
        validations: vec![Validation {
            expression: "feature.string_stats.common_stats.min_num_values > 5".into(),
            severity: split_guard::core::Severity::Error,
            description: "Feature does not have enough values.".into(),
        }],
    });
    let executor = ValidationExecutor::new(
        ValidatorConfig::default()
            .with_excluded_splits(["test"])
            .with_custom_validation(rules),
    );
    let result = executor.run(request).await.unwrap();

    assert_eq!(blessing_of(&result, "train"), Blessing::NotBlessed);
    assert_eq!(blessing_of(&result, "eval"), Blessing::NotBlessed);

    let alerts = result.alerts().unwrap();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].alert_name, "Feature-level anomalies present");
    assert_eq!(
        alerts[0].alert_body,
        "Feature(s) company contain(s) anomalies for split train, span 11. \
         See Anomalies artifact for more details."
    );
    assert_eq!(
        alerts[1].alert_body,
        "Feature(s) company contain(s) anomalies for split eval, span 11. \
         See Anomalies artifact for more details."
    );

    // The custom-validation finding is in the persisted report too.
    let bytes = std::fs::read(result.output.split_anomalies_path("train")).unwrap();
    let report = split_guard::core::AnomalyReport::from_bytes(&bytes).unwrap();
    let info = &report.anomaly_info[&split_guard::core::FeaturePath::from("company")];
    assert_eq!(info.reason, split_guard::core::ReasonCode::CustomValidation);
    assert_eq!(info.short_description, "Feature does not have enough values.");
}

#[tokio::test]
async fn test_dataset_anomaly_alert_for_one_split() {
    let dir = TempDir::new().unwrap();
    // An empty train split trips the minimum-example check; eval stays clean.
    let stats_root = dir.path().join("statistics_gen");
    let schema_root = dir.path().join("schema_gen");
    SplitStatistics::new(0).write_to(&stats_root, "train").unwrap();
    SplitStatistics::new(50).write_to(&stats_root, "eval").unwrap();
    Schema::new().write_to(&schema_root).unwrap();

    let request = ValidationRequest {
        statistics: StatisticsArtifact::new(
            &stats_root,
            encode_split_names(&["train", "eval"]),
            4,
        ),
        schema_uri: schema_root,
        output_root: dir.path().join("output"),
    };
    let result = ValidationExecutor::new(ValidatorConfig::default())
        .run(request)
        .await
        .unwrap();

    assert_eq!(blessing_of(&result, "train"), Blessing::NotBlessed);
    assert_eq!(blessing_of(&result, "eval"), Blessing::Blessed);

    let alerts = result.alerts().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].alert_name, "Dataset anomalies present");
    assert_eq!(
        alerts[0].alert_body,
        "Low num examples in dataset. in split train, span 4."
    );
}

#[tokio::test]
async fn test_rerun_with_identical_inputs_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let request = pipeline_fixture(dir.path(), 7, |_| company_stats(100, 10));

    let rules = CustomValidationConfig::new().with_feature_validation(FeatureValidation {
        feature_path: "company".into(),
        validations: vec![Validation {
            expression: "feature.string_stats.common_stats.min_num_values > 5".into(),
            severity: split_guard::core::Severity::Error,
            description: "Feature does not have enough values.".into(),
        }],
    });
    let executor = ValidationExecutor::new(
        ValidatorConfig::default()
            .with_excluded_splits(["test"])
            .with_custom_validation(rules),
    );

    let first = executor.run(request.clone()).await.unwrap();
    let first_train = std::fs::read(first.output.split_anomalies_path("train")).unwrap();
    let first_eval = std::fs::read(first.output.split_anomalies_path("eval")).unwrap();

    let second = executor.run(request).await.unwrap();
    let second_train = std::fs::read(second.output.split_anomalies_path("train")).unwrap();
    let second_eval = std::fs::read(second.output.split_anomalies_path("eval")).unwrap();

    assert_eq!(first_train, second_train);
    assert_eq!(first_eval, second_eval);
    assert_eq!(first.output.blessing_map(), second.output.blessing_map());
}

#[tokio::test]
async fn test_unknown_excluded_split_fails_before_writing() {
    let dir = TempDir::new().unwrap();
    let request = pipeline_fixture(dir.path(), 0, |_| company_stats(10, 1));
    let output_root = request.output_root.clone();

    let executor =
        ValidationExecutor::new(ValidatorConfig::default().with_excluded_splits(["holdout"]));
    let err = executor.run(request).await.unwrap_err();

    assert!(matches!(err, ValidatorError::Config(_)));
    assert!(!output_root.exists());
}

#[tokio::test]
async fn test_malformed_rule_fails_before_writing() {
    let dir = TempDir::new().unwrap();
    let request = pipeline_fixture(dir.path(), 0, |_| company_stats(10, 1));
    let output_root = request.output_root.clone();

    let rules = CustomValidationConfig::new().with_feature_validation(FeatureValidation {
        feature_path: "company".into(),
        validations: vec![Validation {
            expression: "SELECT * FROM stats".into(),
            severity: split_guard::core::Severity::Error,
            description: "not an expression".into(),
        }],
    });
    let executor =
        ValidationExecutor::new(ValidatorConfig::default().with_custom_validation(rules));
    let err = executor.run(request).await.unwrap_err();

    assert!(matches!(err, ValidatorError::Config(_)));
    assert!(!output_root.exists());
}

#[tokio::test]
async fn test_missing_statistics_split_is_io_error() {
    let dir = TempDir::new().unwrap();
    let stats_root = dir.path().join("statistics_gen");
    let schema_root = dir.path().join("schema_gen");
    SplitStatistics::new(10).write_to(&stats_root, "train").unwrap();
    Schema::new().write_to(&schema_root).unwrap();

    // The descriptor claims an eval split the bundle never wrote.
    let request = ValidationRequest {
        statistics: StatisticsArtifact::new(
            &stats_root,
            encode_split_names(&["train", "eval"]),
            0,
        ),
        schema_uri: schema_root,
        output_root: dir.path().join("output"),
    };
    let err = ValidationExecutor::new(ValidatorConfig::default())
        .run(request)
        .await
        .unwrap_err();
    assert!(matches!(err, ValidatorError::Io(_)));
}
