//! Random-effects weight corrections
//!
//! Each study is joined with its group's between-study variance v0 and
//! re-weighted:
//!
//! - `v0_plus_vi = vi + v0`
//! - `wi_corr = 1 / v0_plus_vi`
//! - `wxES_corr = wi_corr · ESU`
//! - `wxESsq_corr = wi_corr · ESU²`
//! - `SE_corr = 1 / √wi_corr`
//!
//! Degenerate groups leave NaN or infinite values behind. Every field is
//! computed first and then cleaned (NaN to zero, then infinities to zero),
//! so a collapsed study contributes nothing to its group's constants.

use meta_core::{
    aggregate, clean_non_finite, try_map_rows, CleanNonFinite, ExecutionStrategy, GroupKey,
    GroupTable, Result, WeightedEffect,
};
use meta_effect::StandardizedStudy;
use serde::{Deserialize, Serialize};

use crate::variance::RandomVariance;

/// Table name used in join errors
const VARIANCE_TABLE: &str = "random variance";

/// A study re-weighted with its group's between-study variance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectedStudy {
    pub group: GroupKey,
    /// Bias-corrected effect size
    pub standardized_esu: f64,
    /// Within-study sampling variance
    pub vi_se2: f64,
    /// Group between-study variance joined onto this study
    pub v0: f64,
    pub v0_plus_vi: f64,
    pub wi_corr: f64,
    pub wx_es_corr: f64,
    pub wx_essq_corr: f64,
    pub se_corr: f64,
}

impl CorrectedStudy {
    /// Re-weight one study with the given v0. The result is not cleaned.
    pub fn from_parts(study: &StandardizedStudy, v0: f64) -> Self {
        let esu = study.standardized_esu;
        let v0_plus_vi = study.vi_se2 + v0;
        let wi_corr = 1.0 / v0_plus_vi;

        Self {
            group: study.record.group.clone(),
            standardized_esu: esu,
            vi_se2: study.vi_se2,
            v0,
            v0_plus_vi,
            wi_corr,
            wx_es_corr: wi_corr * esu,
            wx_essq_corr: wi_corr * esu * esu,
            se_corr: 1.0 / wi_corr.sqrt(),
        }
    }
}

impl CleanNonFinite for CorrectedStudy {
    fn clean_non_finite(self) -> Self {
        Self {
            group: self.group,
            standardized_esu: clean_non_finite(self.standardized_esu),
            vi_se2: clean_non_finite(self.vi_se2),
            v0: clean_non_finite(self.v0),
            v0_plus_vi: clean_non_finite(self.v0_plus_vi),
            wi_corr: clean_non_finite(self.wi_corr),
            wx_es_corr: clean_non_finite(self.wx_es_corr),
            wx_essq_corr: clean_non_finite(self.wx_essq_corr),
            se_corr: clean_non_finite(self.se_corr),
        }
    }

    fn is_finite(&self) -> bool {
        [
            self.standardized_esu,
            self.vi_se2,
            self.v0,
            self.v0_plus_vi,
            self.wi_corr,
            self.wx_es_corr,
            self.wx_essq_corr,
            self.se_corr,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Level-2 aggregation: corrected weights count as magnitudes
impl WeightedEffect for CorrectedStudy {
    fn group(&self) -> &GroupKey {
        &self.group
    }

    fn weight(&self) -> f64 {
        self.wi_corr.abs()
    }

    fn weight_squared(&self) -> f64 {
        self.wi_corr * self.wi_corr
    }

    fn weighted_effect(&self) -> f64 {
        self.wx_es_corr
    }

    fn weighted_effect_squared(&self) -> f64 {
        self.wx_essq_corr
    }
}

/// Join every study with its group's v0 and apply the random-effects
/// correction. Fails if a study's group has no row in `variance`.
pub fn apply_corrections(
    studies: &[StandardizedStudy],
    variance: &GroupTable<RandomVariance>,
    strategy: ExecutionStrategy,
) -> Result<Vec<CorrectedStudy>> {
    try_map_rows(strategy, studies, |study| {
        let rv = variance.lookup(&study.record.group, VARIANCE_TABLE)?;
        Ok(CorrectedStudy::from_parts(study, rv.v0).clean_non_finite())
    })
}

/// Per-group sums of the corrected quantities
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrectedSums {
    pub sum_wx_es_corr: f64,
    pub sum_wx_essq_corr: f64,
    /// Σ |wi_corr|
    pub sum_wi_corr: f64,
}

impl CleanNonFinite for CorrectedSums {
    fn clean_non_finite(self) -> Self {
        Self {
            sum_wx_es_corr: clean_non_finite(self.sum_wx_es_corr),
            sum_wx_essq_corr: clean_non_finite(self.sum_wx_essq_corr),
            sum_wi_corr: clean_non_finite(self.sum_wi_corr),
        }
    }

    fn is_finite(&self) -> bool {
        self.sum_wx_es_corr.is_finite()
            && self.sum_wx_essq_corr.is_finite()
            && self.sum_wi_corr.is_finite()
    }
}

/// Sum the corrected quantities per group, then clean non-finite sums
pub fn calculate_constants(corrected: &[CorrectedStudy]) -> GroupTable<CorrectedSums> {
    aggregate(corrected).map(|_, sums| {
        CorrectedSums {
            sum_wx_es_corr: sums.sum_wx_es,
            sum_wx_essq_corr: sums.sum_wx_es2,
            sum_wi_corr: sums.sum_wi,
        }
        .clean_non_finite()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use meta_core::{Error, WeightedSums};
    use meta_effect::{standardize, StudyRecord};

    const SEQUENTIAL: ExecutionStrategy = ExecutionStrategy::Sequential;

    fn key(s: &str) -> GroupKey {
        GroupKey::new([s, "amygdala"])
    }

    fn study(group: &str, n: f64, w: f64, es: f64) -> StandardizedStudy {
        standardize(&StudyRecord::new(key(group), n, w, es))
    }

    fn variance_table(entries: &[(&str, f64)]) -> GroupTable<RandomVariance> {
        entries
            .iter()
            .map(|&(g, v0)| {
                (
                    key(g),
                    RandomVariance {
                        sums: WeightedSums::default(),
                        q: 0.0,
                        v0,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_correction_values() {
        let s = study("a", 10.0, 2.0, 0.5);
        let c = CorrectedStudy::from_parts(&s, 0.5);
        assert_relative_eq!(c.v0_plus_vi, 1.0);
        assert_relative_eq!(c.wi_corr, 1.0);
        assert_relative_eq!(c.wx_es_corr, s.standardized_esu);
        assert_relative_eq!(c.wx_essq_corr, s.standardized_esu * s.standardized_esu);
        assert_relative_eq!(c.se_corr, 1.0);
    }

    #[test]
    fn test_zero_v0_keeps_fixed_weights() {
        let s = study("a", 20.0, 4.0, 0.3);
        let c = CorrectedStudy::from_parts(&s, 0.0);
        assert_relative_eq!(c.wi_corr, 4.0);
        assert_relative_eq!(c.se_corr, 0.5);
    }

    #[test]
    fn test_apply_corrections_cleans_nan() {
        let studies = vec![study("a", 10.0, 2.0, 0.5)];
        let variance = variance_table(&[("a", f64::NAN)]);
        let corrected = apply_corrections(&studies, &variance, SEQUENTIAL).unwrap();

        let c = &corrected[0];
        assert!(c.is_finite());
        assert_eq!(c.v0, 0.0);
        assert_eq!(c.wi_corr, 0.0);
        assert_eq!(c.wx_es_corr, 0.0);
        assert_eq!(c.se_corr, 0.0);
        // Untouched inputs survive
        assert_relative_eq!(c.vi_se2, 0.5);
    }

    #[test]
    fn test_apply_corrections_cleans_infinity() {
        // vi = 0.5 and v0 = -0.5 give v0_plus_vi = 0, so wi_corr = inf
        let studies = vec![study("a", 10.0, 2.0, 0.5)];
        let variance = variance_table(&[("a", -0.5)]);
        let raw = CorrectedStudy::from_parts(&studies[0], -0.5);
        assert!(raw.wi_corr.is_infinite());

        let corrected = apply_corrections(&studies, &variance, SEQUENTIAL).unwrap();
        assert!(corrected[0].is_finite());
        assert_eq!(corrected[0].wi_corr, 0.0);
        assert_eq!(corrected[0].wx_essq_corr, 0.0);
    }

    #[test]
    fn test_apply_corrections_infinite_v0() {
        let studies = vec![study("a", 10.0, 2.0, 0.5)];
        let variance = variance_table(&[("a", f64::INFINITY)]);
        let corrected = apply_corrections(&studies, &variance, SEQUENTIAL).unwrap();
        assert!(corrected[0].is_finite());
        assert_eq!(corrected[0].wi_corr, 0.0);
        assert_eq!(corrected[0].se_corr, 0.0);
    }

    #[test]
    fn test_apply_corrections_missing_group() {
        let studies = vec![study("a", 10.0, 2.0, 0.5), study("b", 10.0, 2.0, 0.5)];
        let variance = variance_table(&[("a", 0.1)]);
        let err = apply_corrections(&studies, &variance, SEQUENTIAL).unwrap_err();
        assert!(matches!(err, Error::MissingGroup(k, _) if k == key("b")));
    }

    #[test]
    fn test_calculate_constants_uses_absolute_weights() {
        let mut negative = CorrectedStudy::from_parts(&study("a", 10.0, 2.0, 0.5), 0.0);
        negative.wi_corr = -2.0;
        let positive = CorrectedStudy::from_parts(&study("a", 20.0, 4.0, 0.3), 0.0);

        let constants = calculate_constants(&[negative.clone(), positive.clone()]);
        let a = constants.get(&key("a")).unwrap();
        assert_relative_eq!(a.sum_wi_corr, 6.0);
        assert_relative_eq!(a.sum_wx_es_corr, negative.wx_es_corr + positive.wx_es_corr);
        assert_relative_eq!(a.sum_wx_essq_corr, negative.wx_essq_corr + positive.wx_essq_corr);
    }

    #[test]
    fn test_calculate_constants_cleans_sums() {
        let mut overflow = CorrectedStudy::from_parts(&study("a", 10.0, 2.0, 0.5), 0.0);
        overflow.wx_es_corr = f64::MAX;
        let constants = calculate_constants(&[overflow.clone(), overflow]);
        let a = constants.get(&key("a")).unwrap();
        assert_eq!(a.sum_wx_es_corr, 0.0);
        assert!(a.is_finite());
    }
}
