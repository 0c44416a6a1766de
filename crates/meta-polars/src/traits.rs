//! Extension trait for meta-analysis on Polars DataFrames

use meta_random::RandomEffectsConfig;
use polars::prelude::*;

use crate::{ColumnMap, Result};

/// Intermediate tables of one random-effects run, as DataFrames
#[derive(Debug, Clone)]
pub struct MetaStageFrames {
    /// Per-study standardized quantities (input columns plus derived ones)
    pub standardized: DataFrame,
    /// Level-1 sums with `Q` and floored `v0`, one row per group
    pub random_variance: DataFrame,
    /// Per-study corrected quantities with group keys
    pub corrected: DataFrame,
    /// Level-2 sums, one row per group
    pub constants: DataFrame,
    /// Final summary, one row per group
    pub summary: DataFrame,
}

/// Extension trait for meta-analysis operations on Polars DataFrames
pub trait MetaAnalysisExt {
    /// Add the per-study derived columns
    ///
    /// # Returns
    /// The input frame plus `vi_SE2`, `standardized_ESU`, `wES`, `wES2`
    /// and `w2`
    fn meta_standardize(&self, columns: &ColumnMap) -> Result<DataFrame>;

    /// Count effect sizes per group
    ///
    /// # Returns
    /// DataFrame with the key columns and `k_val`
    fn meta_effect_counts(&self, columns: &ColumnMap) -> Result<DataFrame>;

    /// Run the random-effects analysis per group
    ///
    /// # Arguments
    /// * `columns` - Input column names
    /// * `config` - I² policy, interval width and execution strategy
    ///
    /// # Returns
    /// DataFrame with the key columns and `ES_mean`, `SE_mean`, `z`,
    /// `high_CI`, `low_CI`, `I_val`, `k_val`, `Q`, `v0`, `p_value`
    fn meta_random_effects(
        &self,
        columns: &ColumnMap,
        config: &RandomEffectsConfig,
    ) -> Result<DataFrame>;

    /// Run the random-effects analysis and keep every intermediate table
    fn meta_random_effects_stages(
        &self,
        columns: &ColumnMap,
        config: &RandomEffectsConfig,
    ) -> Result<MetaStageFrames>;
}
