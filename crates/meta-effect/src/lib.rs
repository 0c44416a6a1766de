//! Per-study effect size standardization
//!
//! Turns raw study records (sample size, inverse-variance weight and
//! standardized effect size) into the per-study quantities a random-effects
//! meta-analysis needs, including the Hedges & Olkin small-sample bias
//! correction.
//!
//! # Example
//!
//! ```rust
//! use meta_core::GroupKey;
//! use meta_effect::{standardize, StudyRecord};
//!
//! let record = StudyRecord::new(GroupKey::new(["Mus musculus", "cortex"]), 10.0, 2.0, 0.5);
//! let study = standardize(&record);
//!
//! assert_eq!(study.vi_se2, 0.5);
//! assert_eq!(study.w2, 4.0);
//! assert!(study.standardized_esu < 0.5);
//! ```

mod correction;
mod study;

pub use correction::{small_sample_correction, unbiased_effect_size};
pub use study::{standardize, standardize_all, StandardizedStudy, StudyRecord};
