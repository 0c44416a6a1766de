//! Staged random-effects pipeline
//!
//! Runs the full analysis over a table of study records:
//!
//! 1. per-study standardization
//! 2. level-1 group aggregation
//! 3. Q and v0 per group
//! 4. v0 floored at zero
//! 5. per-study corrections (explicit key join of v0)
//! 6. level-2 group aggregation ("constants")
//! 7. pooled mean, standard error, z, CI and I²
//! 8. effect size counts
//!
//! The pipeline holds only its configuration; every stage is a pure
//! function of the previous stage's tables.

use meta_core::{aggregate, GroupTable, Result};
use meta_effect::{standardize_all, StandardizedStudy, StudyRecord};
use tracing::{debug, instrument};

use crate::config::RandomEffectsConfig;
use crate::corrections::{apply_corrections, calculate_constants, CorrectedStudy, CorrectedSums};
use crate::summary::{
    calculate_mean_se, calculate_number_es, summarize, GroupSummary, MeanSeParams, PooledEstimate,
};
use crate::variance::{compute_random_variance, zero_if_negative, RandomVariance};

/// Every intermediate table of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineStages {
    /// Stage 1: per-study derived quantities, in input order
    pub standardized: Vec<StandardizedStudy>,
    /// Stages 2-4: level-1 sums with Q and floored v0
    pub random_variance: GroupTable<RandomVariance>,
    /// Stage 5: corrected studies, in input order
    pub corrected: Vec<CorrectedStudy>,
    /// Stage 6: level-2 sums
    pub constants: GroupTable<CorrectedSums>,
    /// Stage 7: pooled estimates
    pub pooled: GroupTable<PooledEstimate>,
    /// Stage 8: effect size counts
    pub counts: GroupTable<usize>,
    /// Pooled estimates joined with counts
    pub summary: GroupTable<GroupSummary>,
}

/// Random-effects meta-analysis over grouped studies
#[derive(Debug, Clone)]
pub struct RandomEffectsPipeline {
    config: RandomEffectsConfig,
    params: MeanSeParams,
}

impl RandomEffectsPipeline {
    /// Create a pipeline, validating the configuration
    pub fn new(config: RandomEffectsConfig) -> Result<Self> {
        let params = MeanSeParams::from_config(&config)?;
        Ok(Self { config, params })
    }

    pub fn config(&self) -> &RandomEffectsConfig {
        &self.config
    }

    /// Run the analysis and return one summary row per group
    pub fn run(&self, records: &[StudyRecord]) -> Result<GroupTable<GroupSummary>> {
        self.run_stages(records).map(|stages| stages.summary)
    }

    /// Run the analysis and keep every intermediate table
    #[instrument(skip_all, fields(studies = records.len()))]
    pub fn run_stages(&self, records: &[StudyRecord]) -> Result<PipelineStages> {
        let standardized = standardize_all(records, self.config.execution);

        let level1 = aggregate(&standardized);
        debug!("Aggregated {} studies into {} groups", standardized.len(), level1.len());

        let random_variance = zero_if_negative(compute_random_variance(&level1));
        let degenerate = random_variance.values().filter(|rv| rv.is_degenerate()).count();
        if degenerate > 0 {
            debug!("{} groups have no valid between-study variance", degenerate);
        }

        let corrected = apply_corrections(&standardized, &random_variance, self.config.execution)?;
        let constants = calculate_constants(&corrected);
        let pooled = calculate_mean_se(&random_variance, &constants, &self.params)?;
        let counts = calculate_number_es(&standardized);
        let summary = summarize(&pooled, &counts)?;

        let without_estimate = summary.values().filter(|s| !s.has_estimate()).count();
        debug!(
            "Pooled {} groups ({} without an estimate)",
            summary.len(),
            without_estimate
        );

        Ok(PipelineStages {
            standardized,
            random_variance,
            corrected,
            constants,
            pooled,
            counts,
            summary,
        })
    }
}
