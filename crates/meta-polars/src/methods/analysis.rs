//! `MetaAnalysisExt` for DataFrame

use meta_core::{ExecutionStrategy, GroupKey};
use meta_effect::{standardize_all, StudyRecord};
use meta_random::{calculate_number_es, RandomEffectsConfig, RandomEffectsPipeline};
use polars::prelude::*;
use tracing::{debug, instrument};

use super::extract::{numeric_inputs, study_records};
use super::frames::{
    constants_frame, corrected_frame, counts_frame, random_variance_frame, standardized_columns,
    standardized_frame, summary_frame,
};
use crate::{ColumnMap, MetaAnalysisExt, MetaStageFrames, Result};

impl MetaAnalysisExt for DataFrame {
    #[instrument(skip_all, fields(rows = self.height()))]
    fn meta_standardize(&self, columns: &ColumnMap) -> Result<DataFrame> {
        let inputs = numeric_inputs(self, columns)?;
        // Standardization is per row, so every input row is kept
        let records: Vec<StudyRecord> = (0..self.height())
            .map(|row| {
                StudyRecord::new(
                    GroupKey::new(Vec::<String>::new()),
                    inputs.n[row],
                    inputs.weight_factor[row],
                    inputs.standardized_es[row],
                )
            })
            .collect();

        let studies = standardize_all(&records, ExecutionStrategy::Sequential);
        Ok(self.hstack(&standardized_columns(&studies))?)
    }

    #[instrument(skip_all, fields(rows = self.height()))]
    fn meta_effect_counts(&self, columns: &ColumnMap) -> Result<DataFrame> {
        let records = study_records(self, columns)?;
        let studies = standardize_all(&records, ExecutionStrategy::Sequential);
        let counts = calculate_number_es(&studies);
        debug!("Counted {} studies in {} groups", studies.len(), counts.len());
        counts_frame(&columns.group_by, &counts)
    }

    fn meta_random_effects(
        &self,
        columns: &ColumnMap,
        config: &RandomEffectsConfig,
    ) -> Result<DataFrame> {
        self.meta_random_effects_stages(columns, config)
            .map(|stages| stages.summary)
    }

    #[instrument(skip_all, fields(rows = self.height()))]
    fn meta_random_effects_stages(
        &self,
        columns: &ColumnMap,
        config: &RandomEffectsConfig,
    ) -> Result<MetaStageFrames> {
        let records = study_records(self, columns)?;
        let pipeline = RandomEffectsPipeline::new(config.clone())?;
        let stages = pipeline.run_stages(&records)?;

        let keys = &columns.group_by;
        let inputs = [
            columns.n.as_str(),
            columns.weight_factor.as_str(),
            columns.standardized_es.as_str(),
        ];
        Ok(MetaStageFrames {
            standardized: standardized_frame(keys, inputs, &stages.standardized)?,
            random_variance: random_variance_frame(keys, &stages.random_variance)?,
            corrected: corrected_frame(keys, &stages.corrected)?,
            constants: constants_frame(keys, &stages.constants)?,
            summary: summary_frame(keys, &stages.summary)?,
        })
    }
}
