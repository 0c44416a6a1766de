//! Polars integration for random-effects meta-analysis
//!
//! Reads study tables from a DataFrame, runs the grouped random-effects
//! pipeline and returns the results as DataFrames, one row per group.
//!
//! # Example
//!
//! ```rust,ignore
//! use polars::prelude::*;
//! use meta_polars::{ColumnMap, MetaAnalysisExt, RandomEffectsConfig};
//!
//! let df = df![
//!     "specie_str" => ["Mus musculus", "Mus musculus"],
//!     "structure_renamed" => ["cortex", "cortex"],
//!     "n" => [10i64, 20],
//!     "weight factor" => [2.0, 4.0],
//!     "standardized es" => [0.5, 0.3],
//! ]?;
//!
//! let summary = df.meta_random_effects(&ColumnMap::default(), &RandomEffectsConfig::default())?;
//! ```

mod config;
mod error;
mod methods;
mod traits;

pub use config::*;
pub use error::{Error, Result};
pub use traits::*;

// Re-export commonly used types from dependencies
pub use meta_core::ExecutionStrategy;
pub use meta_random::{I2Policy, IntervalWidth, RandomEffectsConfig};
