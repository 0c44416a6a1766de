//! Weighted group aggregation
//!
//! One reduction shape is used twice in a random-effects analysis: once
//! over the fixed-effect weights of each study and once over the corrected
//! random-effects weights. Row types describe which of their fields play
//! the four roles by implementing [`WeightedEffect`]; [`aggregate`] does the
//! grouping and summing.

use serde::{Deserialize, Serialize};

use crate::group::{GroupKey, GroupTable};
use crate::numeric::nan_to_zero;

/// A row that contributes weighted effect quantities to its group
pub trait WeightedEffect {
    /// Group the row belongs to
    fn group(&self) -> &GroupKey;

    /// Weight `w`
    fn weight(&self) -> f64;

    /// Squared weight `w²`. Rows where this is NaN (missing) are not counted.
    fn weight_squared(&self) -> f64;

    /// Weighted effect `w·ES`
    fn weighted_effect(&self) -> f64;

    /// Weighted squared effect `w·ES²`
    fn weighted_effect_squared(&self) -> f64;
}

/// Per-group sums of the four weighted quantities
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightedSums {
    /// Σ w
    pub sum_wi: f64,
    /// Σ w²
    pub sum_wi2: f64,
    /// Number of contributing rows (non-missing w²)
    pub k: usize,
    /// Σ w·ES
    pub sum_wx_es: f64,
    /// Σ w·ES²
    pub sum_wx_es2: f64,
}

impl WeightedSums {
    /// Add one row. Missing (NaN) values contribute nothing to the sums.
    pub fn push<R: WeightedEffect + ?Sized>(&mut self, row: &R) {
        let w2 = row.weight_squared();
        self.sum_wi += nan_to_zero(row.weight());
        self.sum_wi2 += nan_to_zero(w2);
        self.sum_wx_es += nan_to_zero(row.weighted_effect());
        self.sum_wx_es2 += nan_to_zero(row.weighted_effect_squared());
        if !w2.is_nan() {
            self.k += 1;
        }
    }

    /// Degrees of freedom `k - 1` (zero for an empty group)
    pub fn degrees_of_freedom(&self) -> f64 {
        self.k.saturating_sub(1) as f64
    }
}

/// Group `rows` by key and sum the weighted quantities of each group
pub fn aggregate<R: WeightedEffect>(rows: &[R]) -> GroupTable<WeightedSums> {
    GroupTable::fold_rows(rows, |r| r.group(), |acc: &mut WeightedSums, r| acc.push(*r))
}

/// Number of contributing rows per group
pub fn count_per_group<R: WeightedEffect>(rows: &[R]) -> GroupTable<usize> {
    aggregate(rows).map(|_, sums| sums.k)
}
