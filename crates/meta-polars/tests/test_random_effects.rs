//! End-to-end random-effects runs through the DataFrame API

mod common;

use approx::assert_relative_eq;
use common::{extract_f64, extract_str, extract_u64, study_df};
use meta_polars::{ColumnMap, I2Policy, MetaAnalysisExt, RandomEffectsConfig};
use polars::prelude::*;

fn two_study_df() -> DataFrame {
    study_df(
        &["Rattus norvegicus", "Rattus norvegicus"],
        &["hippocampus", "hippocampus"],
        &[10, 20],
        &[2.0, 4.0],
        &[0.5, 0.3],
    )
}

#[test]
fn test_two_study_summary() {
    let summary = two_study_df()
        .meta_random_effects(&ColumnMap::default(), &RandomEffectsConfig::default())
        .unwrap();

    assert_eq!(summary.height(), 1);
    assert_eq!(extract_str(&summary, "specie_str", 0), "Rattus norvegicus");
    assert_eq!(extract_str(&summary, "structure_renamed", 0), "hippocampus");

    let esu1 = 0.5 * (1.0 - 3.0 / 31.0);
    let esu2 = 0.3 * (1.0 - 3.0 / 71.0);
    let es_mean = (2.0 * esu1 + 4.0 * esu2) / 6.0;
    let se_mean = 1.0 / 6.0_f64.sqrt();

    assert_relative_eq!(extract_f64(&summary, "ES_mean", 0), es_mean, epsilon = 1e-12);
    assert_relative_eq!(extract_f64(&summary, "SE_mean", 0), se_mean, epsilon = 1e-12);
    assert_relative_eq!(extract_f64(&summary, "z", 0), es_mean / se_mean, epsilon = 1e-12);
    let half_width = 1.96 * se_mean;
    assert_relative_eq!(extract_f64(&summary, "high_CI", 0), es_mean + half_width, epsilon = 1e-12);
    assert_relative_eq!(extract_f64(&summary, "low_CI", 0), es_mean - half_width, epsilon = 1e-12);
    assert_eq!(extract_f64(&summary, "I_val", 0), 0.0);
    assert_eq!(extract_f64(&summary, "v0", 0), 0.0);
    assert_eq!(extract_u64(&summary, "k_val", 0), 2);
}

#[test]
fn test_summary_columns() {
    let summary = two_study_df()
        .meta_random_effects(&ColumnMap::default(), &RandomEffectsConfig::default())
        .unwrap();
    let names: Vec<&str> = summary.get_column_names().iter().map(|n| n.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "specie_str",
            "structure_renamed",
            "ES_mean",
            "SE_mean",
            "z",
            "high_CI",
            "low_CI",
            "I_val",
            "k_val",
            "Q",
            "v0",
            "p_value",
        ]
    );
}

#[test]
fn test_heterogeneous_group() {
    // n = 1000 keeps the small-sample correction near 1
    let df = study_df(
        &["Mus musculus"; 3],
        &["cortex"; 3],
        &[1000, 1000, 1000],
        &[10.0, 10.0, 10.0],
        &[-1.0, 0.0, 1.0],
    );
    let stages = df
        .meta_random_effects_stages(&ColumnMap::default(), &RandomEffectsConfig::default())
        .unwrap();

    assert_relative_eq!(extract_f64(&stages.random_variance, "Q", 0), 20.0, epsilon = 1e-12);
    assert_relative_eq!(extract_f64(&stages.random_variance, "v0", 0), 0.9, epsilon = 1e-12);
    assert_eq!(extract_u64(&stages.random_variance, "k", 0), 3);

    // wi_corr = 1 / (0.1 + 0.9)
    for row in 0..3 {
        assert_relative_eq!(extract_f64(&stages.corrected, "wi_corr", row), 1.0, epsilon = 1e-12);
    }
    assert_relative_eq!(extract_f64(&stages.constants, "sum_wi_corr", 0), 3.0, epsilon = 1e-12);

    let summary = &stages.summary;
    assert_relative_eq!(extract_f64(summary, "I_val", 0), 90.0, epsilon = 1e-9);
    assert_relative_eq!(extract_f64(summary, "ES_mean", 0), 0.0, epsilon = 1e-12);
    assert_relative_eq!(extract_f64(summary, "p_value", 0), 1.0, epsilon = 1e-12);
}

#[test]
fn test_groups_sorted_by_key() {
    let df = study_df(
        &["Rattus norvegicus", "Mus musculus", "Mus musculus", "Rattus norvegicus"],
        &["cortex", "striatum", "amygdala", "cortex"],
        &[10, 20, 30, 40],
        &[1.0, 2.0, 3.0, 4.0],
        &[0.1, 0.2, 0.3, 0.4],
    );
    let summary = df
        .meta_random_effects(&ColumnMap::default(), &RandomEffectsConfig::default())
        .unwrap();

    assert_eq!(summary.height(), 3);
    assert_eq!(extract_str(&summary, "specie_str", 0), "Mus musculus");
    assert_eq!(extract_str(&summary, "structure_renamed", 0), "amygdala");
    assert_eq!(extract_str(&summary, "structure_renamed", 1), "striatum");
    assert_eq!(extract_str(&summary, "specie_str", 2), "Rattus norvegicus");
    assert_eq!(extract_u64(&summary, "k_val", 2), 2);
}

#[test]
fn test_single_study_group_reports_nan() {
    let df = study_df(&["Gallus gallus"], &["optic tectum"], &[12], &[2.0], &[0.4]);
    let stages = df
        .meta_random_effects_stages(&ColumnMap::default(), &RandomEffectsConfig::default())
        .unwrap();

    assert!(extract_f64(&stages.random_variance, "v0", 0).is_nan());
    assert_eq!(extract_f64(&stages.corrected, "wi_corr", 0), 0.0);
    assert!(extract_f64(&stages.summary, "ES_mean", 0).is_nan());
    assert_eq!(extract_u64(&stages.summary, "k_val", 0), 1);
}

#[test]
fn test_single_study_group_inexact_weight() {
    // 0.1 * 0.1 / 0.1 does not round back to 0.1
    let df = study_df(&["Gallus gallus"], &["optic tectum"], &[12], &[0.1], &[0.4]);
    let summary = df
        .meta_random_effects(&ColumnMap::default(), &RandomEffectsConfig::default())
        .unwrap();

    assert!(!extract_f64(&summary, "v0", 0).is_finite());
    assert!(extract_f64(&summary, "ES_mean", 0).is_nan());
}

#[test]
fn test_effect_counts() {
    let df = study_df(
        &["Mus musculus", "Mus musculus", "Danio rerio"],
        &["cortex", "cortex", "telencephalon"],
        &[10, 20, 30],
        &[1.0, 2.0, 3.0],
        &[0.1, 0.2, 0.3],
    );
    let counts = df.meta_effect_counts(&ColumnMap::default()).unwrap();

    assert_eq!(counts.width(), 3);
    assert_eq!(extract_str(&counts, "specie_str", 0), "Danio rerio");
    assert_eq!(extract_u64(&counts, "k_val", 0), 1);
    assert_eq!(extract_u64(&counts, "k_val", 1), 2);
}

#[test]
fn test_custom_columns_and_config() {
    let df = df![
        "taxon" => ["Homo sapiens", "Homo sapiens", "Homo sapiens"],
        "sample_size" => [15i32, 25, 35],
        "w" => [3.0f32, 5.0, 7.0],
        "g" => [0.2, 0.6, -0.1],
    ]
    .unwrap();
    let columns = ColumnMap::new()
        .with_n("sample_size")
        .with_weight_factor("w")
        .with_standardized_es("g")
        .with_group_by(["taxon"]);
    let json = r#"{"i2_policy": "raw", "interval": {"level": 0.9}}"#;
    let config = RandomEffectsConfig::from_json(json).unwrap();
    assert_eq!(config.i2_policy, I2Policy::Raw);

    let summary = df.meta_random_effects(&columns, &config).unwrap();
    assert_eq!(summary.height(), 1);
    assert_eq!(extract_str(&summary, "taxon", 0), "Homo sapiens");

    let es_mean = extract_f64(&summary, "ES_mean", 0);
    let se_mean = extract_f64(&summary, "SE_mean", 0);
    assert_relative_eq!(
        extract_f64(&summary, "high_CI", 0) - es_mean,
        1.6448536269514722 * se_mean,
        epsilon = 1e-6
    );
}
