//! Study records and per-study standardization
//!
//! Computes the per-study quantities of a meta-analysis from the raw
//! inputs (Hedges & Olkin, 1985):
//!
//! | field | formula |
//! |---|---|
//! | `vi_se2` | `1 / w` |
//! | `standardized_esu` | `ES · (1 - 3/(4n - 9))` |
//! | `w_es` | `ES · w` |
//! | `w_es2` | `w · ES²` |
//! | `w2` | `w²` |

use meta_core::{map_rows, ExecutionStrategy, GroupKey, WeightedEffect};
use serde::{Deserialize, Serialize};

use crate::correction::unbiased_effect_size;

/// One primary study observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyRecord {
    /// Grouping values (species, structure)
    pub group: GroupKey,
    /// Sample size
    pub n: f64,
    /// Inverse-variance weight
    pub weight_factor: f64,
    /// Standardized effect size as reported
    pub standardized_es: f64,
}

impl StudyRecord {
    /// Create a new study record
    pub fn new(group: GroupKey, n: f64, weight_factor: f64, standardized_es: f64) -> Self {
        Self {
            group,
            n,
            weight_factor,
            standardized_es,
        }
    }
}

/// A study record with its derived per-study quantities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizedStudy {
    /// The input record, unchanged
    pub record: StudyRecord,
    /// Sampling variance `1 / w`
    pub vi_se2: f64,
    /// Bias-corrected effect size
    pub standardized_esu: f64,
    /// `ES · w`
    pub w_es: f64,
    /// `w · ES²`
    pub w_es2: f64,
    /// `w²`
    pub w2: f64,
}

impl StandardizedStudy {
    pub fn group(&self) -> &GroupKey {
        &self.record.group
    }
}

/// Derive the per-study quantities of one record
pub fn standardize(record: &StudyRecord) -> StandardizedStudy {
    let w = record.weight_factor;
    let es = record.standardized_es;

    StandardizedStudy {
        record: record.clone(),
        vi_se2: 1.0 / w,
        standardized_esu: unbiased_effect_size(es, record.n),
        w_es: es * w,
        w_es2: w * es * es,
        w2: w * w,
    }
}

/// Standardize every record, preserving row order
pub fn standardize_all(
    records: &[StudyRecord],
    strategy: ExecutionStrategy,
) -> Vec<StandardizedStudy> {
    map_rows(strategy, records, standardize)
}

/// Level-1 aggregation uses the raw weights and the uncorrected effect
impl WeightedEffect for StandardizedStudy {
    fn group(&self) -> &GroupKey {
        &self.record.group
    }

    fn weight(&self) -> f64 {
        self.record.weight_factor
    }

    fn weight_squared(&self) -> f64 {
        self.w2
    }

    fn weighted_effect(&self) -> f64 {
        self.w_es
    }

    fn weighted_effect_squared(&self) -> f64 {
        self.w_es2
    }
}
