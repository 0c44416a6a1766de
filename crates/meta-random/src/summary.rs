//! Pooled mean effect, confidence interval and study counts
//!
//! For each group (Nakagawa & Cuthill, 2007, eqs. 16-19):
//!
//! - `ES_mean = Σ wxES_corr / Σ wi_corr`
//! - `SE_mean = 1 / √Σ wi_corr`
//! - `z = ES_mean / SE_mean`
//! - `CI = ES_mean ± z_crit · SE_mean`
//! - `I_val = I²(Q, k - 1)`
//!
//! These values are not cleaned: a group whose corrected weights all
//! collapsed to zero reports NaN, meaning no valid pooled estimate.

use meta_core::{count_per_group, GroupTable, Result};
use meta_effect::StandardizedStudy;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::config::{standard_normal, RandomEffectsConfig};
use crate::corrections::CorrectedSums;
use crate::heterogeneity::I2Policy;
use crate::variance::RandomVariance;

const CONSTANTS_TABLE: &str = "constants";
const COUNTS_TABLE: &str = "effect size counts";

/// Pooled random-effects estimate of one group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PooledEstimate {
    pub es_mean: f64,
    pub se_mean: f64,
    pub z: f64,
    /// Two-sided normal p-value of `z`
    pub p_value: f64,
    pub high_ci: f64,
    pub low_ci: f64,
    /// I² in percent
    pub i_val: f64,
    /// Heterogeneity statistic Q
    pub q: f64,
    /// Floored between-study variance
    pub v0: f64,
    /// Studies contributing to Q
    pub k: usize,
}

/// Parameters of the mean/CI stage
#[derive(Debug, Clone)]
pub struct MeanSeParams {
    /// Interval multiplier applied to `SE_mean`
    pub z_critical: f64,
    pub i2_policy: I2Policy,
    /// Standard normal used for p-values
    pub normal: Normal,
}

impl MeanSeParams {
    /// Interval multiplier and I² policy taken from a validated config
    pub fn from_config(config: &RandomEffectsConfig) -> Result<Self> {
        Ok(Self {
            z_critical: config.interval.z_critical()?,
            i2_policy: config.i2_policy,
            normal: standard_normal()?,
        })
    }
}

impl PooledEstimate {
    pub fn new(
        constants: &CorrectedSums,
        variance: &RandomVariance,
        params: &MeanSeParams,
    ) -> Self {
        let es_mean = constants.sum_wx_es_corr / constants.sum_wi_corr;
        let se_mean = (1.0 / constants.sum_wi_corr).sqrt();
        let z = es_mean / se_mean;
        let half_width = params.z_critical * se_mean;

        Self {
            es_mean,
            se_mean,
            z,
            p_value: two_sided_p_value(&params.normal, z),
            high_ci: es_mean + half_width,
            low_ci: es_mean - half_width,
            i_val: params.i2_policy.apply(variance.q, variance.k() as f64 - 1.0),
            q: variance.q,
            v0: variance.v0,
            k: variance.k(),
        }
    }
}

fn two_sided_p_value(normal: &Normal, z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    2.0 * (1.0 - normal.cdf(z.abs()))
}

/// Join the level-2 constants with the level-1 Q/k table and compute the
/// pooled estimate of every group
pub fn calculate_mean_se(
    variance: &GroupTable<RandomVariance>,
    constants: &GroupTable<CorrectedSums>,
    params: &MeanSeParams,
) -> Result<GroupTable<PooledEstimate>> {
    variance.join(constants, CONSTANTS_TABLE, |_, rv, c| PooledEstimate::new(c, rv, params))
}

/// Number of effect sizes per group
pub fn calculate_number_es(studies: &[StandardizedStudy]) -> GroupTable<usize> {
    count_per_group(studies)
}

/// Final per-group output row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub es_mean: f64,
    pub se_mean: f64,
    pub z: f64,
    pub p_value: f64,
    pub high_ci: f64,
    pub low_ci: f64,
    pub i_val: f64,
    /// Number of effect sizes in the group
    pub k_val: usize,
    pub q: f64,
    pub v0: f64,
}

impl GroupSummary {
    pub fn new(pooled: &PooledEstimate, k_val: usize) -> Self {
        Self {
            es_mean: pooled.es_mean,
            se_mean: pooled.se_mean,
            z: pooled.z,
            p_value: pooled.p_value,
            high_ci: pooled.high_ci,
            low_ci: pooled.low_ci,
            i_val: pooled.i_val,
            k_val,
            q: pooled.q,
            v0: pooled.v0,
        }
    }

    /// True when the group produced a usable pooled mean
    pub fn has_estimate(&self) -> bool {
        self.es_mean.is_finite()
    }
}

/// Attach the study counts to the pooled estimates
pub fn summarize(
    pooled: &GroupTable<PooledEstimate>,
    counts: &GroupTable<usize>,
) -> Result<GroupTable<GroupSummary>> {
    pooled.join(counts, COUNTS_TABLE, |_, p, &k| GroupSummary::new(p, k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use meta_core::{GroupKey, WeightedSums};

    fn params(policy: I2Policy) -> MeanSeParams {
        MeanSeParams {
            z_critical: 1.96,
            i2_policy: policy,
            normal: standard_normal().unwrap(),
        }
    }

    fn variance(q: f64, k: usize, v0: f64) -> RandomVariance {
        RandomVariance {
            sums: WeightedSums {
                k,
                ..WeightedSums::default()
            },
            q,
            v0,
        }
    }

    #[test]
    fn test_pooled_estimate() {
        let constants = CorrectedSums {
            sum_wx_es_corr: 3.0,
            sum_wx_essq_corr: 2.0,
            sum_wi_corr: 4.0,
        };
        let p = PooledEstimate::new(&constants, &variance(10.0, 6, 0.2), &params(I2Policy::Clamp));

        assert_relative_eq!(p.es_mean, 0.75);
        assert_relative_eq!(p.se_mean, 0.5);
        assert_relative_eq!(p.z, 1.5);
        assert_relative_eq!(p.high_ci, 0.75 + 1.96 * 0.5);
        assert_relative_eq!(p.low_ci, 0.75 - 1.96 * 0.5);
        assert_relative_eq!(p.i_val, 50.0);
        assert_relative_eq!(p.p_value, 0.133614, epsilon = 1e-5);
        assert_eq!(p.k, 6);
        assert_eq!(p.v0, 0.2);
    }

    #[test]
    fn test_collapsed_group_has_no_estimate() {
        let constants = CorrectedSums::default();
        let degenerate = variance(0.0, 1, f64::NAN);
        let p = PooledEstimate::new(&constants, &degenerate, &params(I2Policy::Clamp));
        assert!(p.es_mean.is_nan());
        assert!(p.se_mean.is_infinite());
        assert!(p.z.is_nan());
        assert!(p.p_value.is_nan());
        assert_eq!(p.i_val, 0.0);
        assert!(!GroupSummary::new(&p, 1).has_estimate());

        let raw = PooledEstimate::new(&constants, &degenerate, &params(I2Policy::Raw));
        assert!(raw.i_val.is_nan());
    }

    #[test]
    fn test_summarize_requires_counts() {
        let key = GroupKey::new(["Homo sapiens", "striatum"]);
        let constants = CorrectedSums {
            sum_wx_es_corr: 1.0,
            sum_wx_essq_corr: 1.0,
            sum_wi_corr: 1.0,
        };
        let pooled: GroupTable<PooledEstimate> = vec![(
            key.clone(),
            PooledEstimate::new(&constants, &variance(1.0, 2, 0.0), &params(I2Policy::Clamp)),
        )]
        .into_iter()
        .collect();

        let counts: GroupTable<usize> = vec![(key.clone(), 2)].into_iter().collect();
        let summary = summarize(&pooled, &counts).unwrap();
        assert_eq!(summary.get(&key).unwrap().k_val, 2);

        assert!(summarize(&pooled, &GroupTable::new()).is_err());
    }
}
