//! Benchmarks for the per-split validation path.
//!
//! Measures schema conformance detection, custom rule evaluation, and alert
//! formatting over synthetic statistics of varying width.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use split_guard::alerts::anomaly_alerts;
use split_guard::core::{
    CommonStatistics, FeatureSpec, FeatureStatistics, FeatureType, Schema, Severity,
    SplitStatistics, StringStatistics,
};
use split_guard::detector::{
    AnomalyDetector, CompiledRules, CustomValidationConfig, FeatureValidation,
    SchemaConformanceDetector, Validation,
};

/// Builds statistics and a matching schema with the given number of features.
fn fixture(features: usize) -> (SplitStatistics, Schema) {
    let mut stats = SplitStatistics::new(10_000);
    let mut schema = Schema::new();
    for i in 0..features {
        let name = format!("feature_{i}");
        stats = stats.with_feature(
            name.as_str(),
            FeatureStatistics::string(
                CommonStatistics::singleton(10_000),
                StringStatistics {
                    unique: (i as u64 % 100) + 1,
                    avg_length: 12.0,
                    top_values: vec![],
                },
            ),
        );
        schema = schema.with_feature(FeatureSpec::new(name.as_str(), FeatureType::Bytes));
    }
    (stats, schema)
}

fn rules_for(features: usize) -> CompiledRules {
    let mut config = CustomValidationConfig::new();
    for i in 0..features {
        config = config.with_feature_validation(FeatureValidation {
            feature_path: format!("feature_{i}").as_str().into(),
            validations: vec![Validation {
                expression: "feature.string_stats.unique < 5".into(),
                severity: Severity::Warning,
                description: "Too few distinct values.".into(),
            }],
        });
    }
    CompiledRules::compile(&config).expect("bench rules compile")
}

fn bench_conformance(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let detector = SchemaConformanceDetector::default();
    let mut group = c.benchmark_group("conformance_detection");
    for features in [10usize, 100, 1000] {
        let (stats, schema) = fixture(features);
        group.bench_with_input(BenchmarkId::from_parameter(features), &features, |b, _| {
            b.iter(|| {
                runtime
                    .block_on(detector.detect(&stats, &schema))
                    .expect("detect")
            })
        });
    }
    group.finish();
}

fn bench_custom_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("custom_rules");
    for features in [10usize, 100, 1000] {
        let (stats, _) = fixture(features);
        let rules = rules_for(features);
        group.bench_with_input(BenchmarkId::from_parameter(features), &features, |b, _| {
            b.iter(|| {
                let mut report = split_guard::core::AnomalyReport::new();
                rules.apply(&stats, &mut report);
                report
            })
        });
    }
    group.finish();
}

fn bench_alert_formatting(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let detector = SchemaConformanceDetector::default();
    // A schema-less detection pass flags every feature as a new column,
    // giving the formatter a worst-case report.
    let (stats, _) = fixture(500);
    let report = runtime
        .block_on(detector.detect(&stats, &Schema::new()))
        .expect("detect");

    c.bench_function("alert_formatting_500_features", |b| {
        b.iter(|| anomaly_alerts(&report, "train", 11))
    });
}

criterion_group!(
    benches,
    bench_conformance,
    bench_custom_rules,
    bench_alert_formatting
);
criterion_main!(benches);
