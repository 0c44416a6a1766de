//! Random-effects meta-analysis per study group
//!
//! This crate pools standardized effect sizes across studies that share a
//! group key (e.g. species and brain structure) under a random-effects
//! model (Hedges & Olkin, 1985; Lipsey & Wilson, 2001; Nakagawa & Cuthill,
//! 2007). Heterogeneity is reported as Q and I² (Higgins & Thompson, 2002).
//!
//! Each stage is a public free function, so intermediate tables can be
//! inspected or recombined; [`RandomEffectsPipeline`] runs them in order.
//!
//! # Example
//!
//! ```rust
//! use meta_core::GroupKey;
//! use meta_effect::StudyRecord;
//! use meta_random::{RandomEffectsConfig, RandomEffectsPipeline};
//!
//! let cortex = GroupKey::new(["Mus musculus", "cortex"]);
//! let studies = vec![
//!     StudyRecord::new(cortex.clone(), 10.0, 2.0, 0.5),
//!     StudyRecord::new(cortex.clone(), 20.0, 4.0, 0.3),
//!     StudyRecord::new(cortex.clone(), 16.0, 3.0, 0.9),
//! ];
//!
//! let pipeline = RandomEffectsPipeline::new(RandomEffectsConfig::default()).unwrap();
//! let summary = pipeline.run(&studies).unwrap();
//!
//! let row = summary.get(&cortex).unwrap();
//! assert_eq!(row.k_val, 3);
//! assert!(row.low_ci < row.es_mean && row.es_mean < row.high_ci);
//! ```

mod config;
mod corrections;
mod heterogeneity;
mod pipeline;
mod summary;
mod variance;

pub use config::{IntervalWidth, RandomEffectsConfig, Z_95};
pub use corrections::{apply_corrections, calculate_constants, CorrectedStudy, CorrectedSums};
pub use heterogeneity::{i_squared, I2Policy};
pub use pipeline::{PipelineStages, RandomEffectsPipeline};
pub use summary::{
    calculate_mean_se, calculate_number_es, summarize, GroupSummary, MeanSeParams, PooledEstimate,
};
pub use variance::{compute_random_variance, floor_variance, zero_if_negative, RandomVariance};
