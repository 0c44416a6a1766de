//! Between-study (random-effects) variance
//!
//! The Q statistic measures the dispersion of effect sizes within a group;
//! under homogeneity it follows a chi-square distribution with `k - 1`
//! degrees of freedom. The between-study variance estimate is
//!
//! v0 = (Q - (k - 1)) / (Σw - Σw² / Σw)
//!
//! (Lipsey & Wilson, 2001; Nakagawa & Cuthill, 2007). For a group with a
//! single study the denominator is exactly zero, so v0 is NaN or infinite.
//! That group simply has no valid v0; it is not an error.

use meta_core::{GroupTable, WeightedSums};
use serde::{Deserialize, Serialize};

/// Q and v0 of one group, with the level-1 sums they came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomVariance {
    /// Level-1 weighted sums
    pub sums: WeightedSums,
    /// Heterogeneity statistic Q
    pub q: f64,
    /// Between-study variance estimate
    pub v0: f64,
}

impl RandomVariance {
    /// Compute Q and v0 from a group's weighted sums
    pub fn from_sums(sums: WeightedSums) -> Self {
        let q = (sums.sum_wx_es2 - sums.sum_wx_es * sums.sum_wx_es / sums.sum_wi).abs();
        let df = sums.k as f64 - 1.0;
        let v0 = (q - df) / variance_denominator(&sums);
        Self { sums, q, v0 }
    }

    /// Denominator `Σw - Σw²/Σw` of the v0 estimate
    pub fn denominator(&self) -> f64 {
        variance_denominator(&self.sums)
    }

    /// Number of studies in the group
    pub fn k(&self) -> usize {
        self.sums.k
    }

    /// True when v0 could not be estimated (single-study groups)
    pub fn is_degenerate(&self) -> bool {
        !self.v0.is_finite()
    }
}

/// `(Σw · Σw - Σw²) / Σw`; a single study gives `w·w - w·w`, exactly zero
fn variance_denominator(sums: &WeightedSums) -> f64 {
    (sums.sum_wi * sums.sum_wi - sums.sum_wi2) / sums.sum_wi
}

/// Q and v0 for every group
pub fn compute_random_variance(sums: &GroupTable<WeightedSums>) -> GroupTable<RandomVariance> {
    sums.clone().map(|_, s| RandomVariance::from_sums(s))
}

/// Floor a variance estimate at zero. NaN passes through.
#[inline]
pub fn floor_variance(v0: f64) -> f64 {
    if v0 < 0.0 {
        0.0
    } else {
        v0
    }
}

/// Replace every negative v0 with zero; all other values are unchanged.
///
/// A negative between-study variance is not a valid random-effects model,
/// so such groups are treated as homogeneous.
pub fn zero_if_negative(table: GroupTable<RandomVariance>) -> GroupTable<RandomVariance> {
    table.map(|_, rv| RandomVariance {
        v0: floor_variance(rv.v0),
        ..rv
    })
}
