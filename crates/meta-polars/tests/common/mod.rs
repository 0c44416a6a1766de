//! Common test utilities for meta-polars tests

#![allow(dead_code)]

use polars::prelude::*;

/// Study table with the default column names
pub fn study_df(
    species: &[&str],
    structures: &[&str],
    n: &[i64],
    weights: &[f64],
    effects: &[f64],
) -> DataFrame {
    df![
        "specie_str" => species,
        "structure_renamed" => structures,
        "n" => n,
        "weight factor" => weights,
        "standardized es" => effects,
    ]
    .unwrap()
}

/// Extract one f64 value from a result DataFrame
pub fn extract_f64(df: &DataFrame, col_name: &str, row: usize) -> f64 {
    df.column(col_name)
        .unwrap()
        .f64()
        .unwrap()
        .get(row)
        .unwrap()
}

/// Extract one count value from a result DataFrame
pub fn extract_u64(df: &DataFrame, col_name: &str, row: usize) -> u64 {
    df.column(col_name)
        .unwrap()
        .u64()
        .unwrap()
        .get(row)
        .unwrap()
}

/// Extract one string value from a result DataFrame
pub fn extract_str(df: &DataFrame, col_name: &str, row: usize) -> String {
    df.column(col_name)
        .unwrap()
        .str()
        .unwrap()
        .get(row)
        .unwrap()
        .to_string()
}
