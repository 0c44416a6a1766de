//! Reading study records out of a DataFrame

use meta_core::GroupKey;
use meta_effect::StudyRecord;
use polars::prelude::*;
use tracing::warn;

use crate::{ColumnMap, Error, Result};

/// Numeric column as f64 values; nulls become NaN
pub(crate) fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| Error::InvalidColumn(name.to_string()))?;

    let floats = match column.dtype() {
        DataType::Float64 => column.clone(),
        DataType::Float32
        | DataType::Int64
        | DataType::Int32
        | DataType::UInt64
        | DataType::UInt32 => column.cast(&DataType::Float64)?,
        dt => {
            return Err(Error::TypeMismatch {
                column: name.to_string(),
                expected: "numeric".to_string(),
                got: format!("{:?}", dt),
            });
        }
    };

    Ok(floats
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

/// Key column values as strings, whatever the column dtype
fn key_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(|_| Error::InvalidColumn(name.to_string()))?;
    let strings = column.cast(&DataType::String)?;

    Ok(strings
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// The three numeric input columns
pub(crate) struct NumericInputs {
    pub n: Vec<f64>,
    pub weight_factor: Vec<f64>,
    pub standardized_es: Vec<f64>,
}

pub(crate) fn numeric_inputs(df: &DataFrame, columns: &ColumnMap) -> Result<NumericInputs> {
    Ok(NumericInputs {
        n: numeric_values(df, &columns.n)?,
        weight_factor: numeric_values(df, &columns.weight_factor)?,
        standardized_es: numeric_values(df, &columns.standardized_es)?,
    })
}

/// Build one record per row. Rows with a null key value belong to no
/// group and are skipped.
pub(crate) fn study_records(df: &DataFrame, columns: &ColumnMap) -> Result<Vec<StudyRecord>> {
    columns.validate_grouping()?;

    let inputs = numeric_inputs(df, columns)?;
    let keys = columns
        .group_by
        .iter()
        .map(|name| key_values(df, name))
        .collect::<Result<Vec<_>>>()?;

    let mut records = Vec::with_capacity(df.height());
    let mut skipped = 0usize;
    for row in 0..df.height() {
        let parts: Option<Vec<String>> = keys.iter().map(|col| col[row].clone()).collect();
        match parts {
            Some(parts) => records.push(StudyRecord::new(
                GroupKey::new(parts),
                inputs.n[row],
                inputs.weight_factor[row],
                inputs.standardized_es[row],
            )),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Skipped {} rows with a null group key", skipped);
    }
    Ok(records)
}
