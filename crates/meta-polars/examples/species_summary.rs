//! Random-effects summary of a small brain-structure study table
//!
//! Run with: RUST_LOG=debug cargo run -p meta-polars --example species_summary

use meta_polars::{ColumnMap, MetaAnalysisExt, RandomEffectsConfig};
use polars::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Random-Effects Meta-Analysis ===\n");

    let studies = df![
        "specie_str" => [
            "Mus musculus", "Mus musculus", "Mus musculus",
            "Rattus norvegicus", "Rattus norvegicus",
            "Gallus gallus",
        ],
        "structure_renamed" => [
            "hippocampus", "hippocampus", "hippocampus",
            "hippocampus", "hippocampus",
            "optic tectum",
        ],
        "n" => [12i64, 18, 30, 10, 20, 12],
        "weight factor" => [2.5, 4.0, 7.5, 2.0, 4.0, 2.0],
        "standardized es" => [0.8, 0.1, 0.45, 0.5, 0.3, 0.4],
    ]?;

    println!("1. Per-study standardization");
    let standardized = studies.meta_standardize(&ColumnMap::default())?;
    println!("{}\n", standardized);

    println!("2. Effect sizes per group");
    println!("{}\n", studies.meta_effect_counts(&ColumnMap::default())?);

    println!("3. Pooled estimates (95% interval, multiplier 1.96)");
    let summary =
        studies.meta_random_effects(&ColumnMap::default(), &RandomEffectsConfig::default())?;
    println!("{}\n", summary);

    println!("4. Exact 90% interval");
    let config = RandomEffectsConfig::new().with_confidence_level(0.9);
    let stages = studies.meta_random_effects_stages(&ColumnMap::default(), &config)?;
    println!("Between-study variance:\n{}", stages.random_variance);
    println!("Summary:\n{}", stages.summary);
    println!("\nGroups with a single study report no pooled mean (NaN).");

    Ok(())
}
