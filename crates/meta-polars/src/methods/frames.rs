//! Building result DataFrames from pipeline tables

use meta_core::{GroupKey, GroupTable};
use meta_effect::StandardizedStudy;
use meta_random::{CorrectedStudy, CorrectedSums, GroupSummary, RandomVariance};
use polars::prelude::*;

use crate::Result;

pub(crate) fn float_column(name: &str, values: impl IntoIterator<Item = f64>) -> Column {
    Series::new(PlSmallStr::from(name), values.into_iter().collect::<Vec<f64>>()).into()
}

pub(crate) fn count_column(name: &str, values: impl IntoIterator<Item = usize>) -> Column {
    let counts: Vec<u64> = values.into_iter().map(|k| k as u64).collect();
    Series::new(PlSmallStr::from(name), counts).into()
}

/// One String column per key part, in the order of `names`
pub(crate) fn key_columns<'a>(
    names: &[String],
    keys: impl IntoIterator<Item = &'a GroupKey>,
) -> Result<Vec<Column>> {
    let mut parts: Vec<Vec<String>> = vec![Vec::new(); names.len()];
    for key in keys {
        if key.width() != names.len() {
            let err =
                meta_core::Error::key_width_mismatch(names.len(), key.width(), "result frame");
            return Err(err.into());
        }
        for (column, part) in parts.iter_mut().zip(key.parts()) {
            column.push(part.clone());
        }
    }

    Ok(names
        .iter()
        .zip(parts)
        .map(|(name, values)| Series::new(PlSmallStr::from(name.as_str()), values).into())
        .collect())
}

/// Derived per-study columns, row-aligned with `studies`
pub(crate) fn standardized_columns(studies: &[StandardizedStudy]) -> Vec<Column> {
    vec![
        float_column("vi_SE2", studies.iter().map(|s| s.vi_se2)),
        float_column("standardized_ESU", studies.iter().map(|s| s.standardized_esu)),
        float_column("wES", studies.iter().map(|s| s.w_es)),
        float_column("wES2", studies.iter().map(|s| s.w_es2)),
        float_column("w2", studies.iter().map(|s| s.w2)),
    ]
}

/// Retained study rows: key columns, the three inputs and the derived columns
pub(crate) fn standardized_frame(
    names: &[String],
    input_names: [&str; 3],
    studies: &[StandardizedStudy],
) -> Result<DataFrame> {
    let mut columns = key_columns(names, studies.iter().map(|s| &s.record.group))?;
    let [n, weight_factor, standardized_es] = input_names;
    columns.push(float_column(n, studies.iter().map(|s| s.record.n)));
    columns.push(float_column(weight_factor, studies.iter().map(|s| s.record.weight_factor)));
    columns.push(float_column(standardized_es, studies.iter().map(|s| s.record.standardized_es)));
    columns.extend(standardized_columns(studies));
    Ok(DataFrame::new(columns)?)
}

pub(crate) fn counts_frame(names: &[String], counts: &GroupTable<usize>) -> Result<DataFrame> {
    let mut columns = key_columns(names, counts.keys())?;
    columns.push(count_column("k_val", counts.values().copied()));
    Ok(DataFrame::new(columns)?)
}

pub(crate) fn random_variance_frame(
    names: &[String],
    table: &GroupTable<RandomVariance>,
) -> Result<DataFrame> {
    let rows: Vec<&RandomVariance> = table.values().collect();
    let mut columns = key_columns(names, table.keys())?;
    columns.extend([
        float_column("sum_wi", rows.iter().map(|rv| rv.sums.sum_wi)),
        float_column("sum_wi2", rows.iter().map(|rv| rv.sums.sum_wi2)),
        count_column("k", rows.iter().map(|rv| rv.k())),
        float_column("wxES", rows.iter().map(|rv| rv.sums.sum_wx_es)),
        float_column("wxES2", rows.iter().map(|rv| rv.sums.sum_wx_es2)),
        float_column("Q", rows.iter().map(|rv| rv.q)),
        float_column("v0", rows.iter().map(|rv| rv.v0)),
    ]);
    Ok(DataFrame::new(columns)?)
}

pub(crate) fn corrected_frame(names: &[String], corrected: &[CorrectedStudy]) -> Result<DataFrame> {
    let mut columns = key_columns(names, corrected.iter().map(|c| &c.group))?;
    columns.extend([
        float_column("standardized_ESU", corrected.iter().map(|c| c.standardized_esu)),
        float_column("vi_SE2", corrected.iter().map(|c| c.vi_se2)),
        float_column("v0", corrected.iter().map(|c| c.v0)),
        float_column("v0_plus_vi", corrected.iter().map(|c| c.v0_plus_vi)),
        float_column("wi_corr", corrected.iter().map(|c| c.wi_corr)),
        float_column("wxES_corr", corrected.iter().map(|c| c.wx_es_corr)),
        float_column("wxESsq_corr", corrected.iter().map(|c| c.wx_essq_corr)),
        float_column("SE_corr", corrected.iter().map(|c| c.se_corr)),
    ]);
    Ok(DataFrame::new(columns)?)
}

pub(crate) fn constants_frame(
    names: &[String],
    table: &GroupTable<CorrectedSums>,
) -> Result<DataFrame> {
    let rows: Vec<&CorrectedSums> = table.values().collect();
    let mut columns = key_columns(names, table.keys())?;
    columns.extend([
        float_column("sum_wxES_corr", rows.iter().map(|c| c.sum_wx_es_corr)),
        float_column("sum_wxESsq_corr", rows.iter().map(|c| c.sum_wx_essq_corr)),
        float_column("sum_wi_corr", rows.iter().map(|c| c.sum_wi_corr)),
    ]);
    Ok(DataFrame::new(columns)?)
}

pub(crate) fn summary_frame(
    names: &[String],
    table: &GroupTable<GroupSummary>,
) -> Result<DataFrame> {
    let rows: Vec<&GroupSummary> = table.values().collect();
    let mut columns = key_columns(names, table.keys())?;
    columns.extend([
        float_column("ES_mean", rows.iter().map(|s| s.es_mean)),
        float_column("SE_mean", rows.iter().map(|s| s.se_mean)),
        float_column("z", rows.iter().map(|s| s.z)),
        float_column("high_CI", rows.iter().map(|s| s.high_ci)),
        float_column("low_CI", rows.iter().map(|s| s.low_ci)),
        float_column("I_val", rows.iter().map(|s| s.i_val)),
        count_column("k_val", rows.iter().map(|s| s.k_val)),
        float_column("Q", rows.iter().map(|s| s.q)),
        float_column("v0", rows.iter().map(|s| s.v0)),
        float_column("p_value", rows.iter().map(|s| s.p_value)),
    ]);
    Ok(DataFrame::new(columns)?)
}
