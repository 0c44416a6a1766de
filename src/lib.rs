//! Random-effects meta-analysis over grouped study tables
//!
//! This crate re-exports the workspace crates:
//!
//! - [`meta_core`]: group keys, keyed tables, weighted sums and errors
//! - [`meta_effect`]: study records and the small-sample correction
//! - [`meta_random`]: between-study variance, corrections and pooled estimates
//! - `meta_polars`: the same pipeline over Polars DataFrames (feature `polars`)
//!
//! # Example
//!
//! ```rust
//! use meta_stats::prelude::*;
//!
//! let key = GroupKey::new(["Mus musculus", "cortex"]);
//! let records = vec![
//!     StudyRecord::new(key.clone(), 10.0, 2.0, 0.5),
//!     StudyRecord::new(key.clone(), 20.0, 4.0, 0.3),
//! ];
//!
//! let pipeline = RandomEffectsPipeline::new(RandomEffectsConfig::default())?;
//! let summary = pipeline.run(&records)?;
//! assert_eq!(summary.get(&key).map(|s| s.k_val), Some(2));
//! # Ok::<(), meta_stats::meta_core::Error>(())
//! ```

pub use meta_core;
pub use meta_effect;
pub use meta_random;

#[cfg(feature = "polars")]
pub use meta_polars;

/// Commonly used types
pub mod prelude {
    pub use meta_core::{ExecutionStrategy, GroupKey, GroupTable};
    pub use meta_effect::StudyRecord;
    pub use meta_random::{
        GroupSummary, I2Policy, IntervalWidth, RandomEffectsConfig, RandomEffectsPipeline,
    };

    #[cfg(feature = "polars")]
    pub use meta_polars::{ColumnMap, MetaAnalysisExt};
}
