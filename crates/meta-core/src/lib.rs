//! Core types for random-effects meta-analysis
//!
//! This crate provides the building blocks shared by the meta-stats crates:
//!
//! - [`GroupKey`] and [`GroupTable`]: key-ordered group tables with explicit
//!   key joins
//! - [`WeightedEffect`] and [`aggregate`]: the weighted group reduction used
//!   at both aggregation levels of a random-effects analysis
//! - [`numeric`]: NaN/infinity cleanup for degenerate groups
//! - [`execution`]: sequential or parallel per-row mapping
//!
//! # Example
//!
//! ```rust
//! use meta_core::{aggregate, GroupKey, WeightedEffect};
//!
//! struct Study {
//!     key: GroupKey,
//!     w: f64,
//!     es: f64,
//! }
//!
//! impl WeightedEffect for Study {
//!     fn group(&self) -> &GroupKey { &self.key }
//!     fn weight(&self) -> f64 { self.w }
//!     fn weight_squared(&self) -> f64 { self.w * self.w }
//!     fn weighted_effect(&self) -> f64 { self.w * self.es }
//!     fn weighted_effect_squared(&self) -> f64 { self.w * self.es * self.es }
//! }
//!
//! let key = GroupKey::new(["Mus musculus", "cortex"]);
//! let studies = vec![
//!     Study { key: key.clone(), w: 2.0, es: 0.5 },
//!     Study { key: key.clone(), w: 4.0, es: 0.3 },
//! ];
//! let sums = aggregate(&studies);
//! assert_eq!(sums.get(&key).unwrap().sum_wi, 6.0);
//! ```

pub mod aggregate;
pub mod error;
pub mod execution;
pub mod group;
pub mod numeric;

pub use aggregate::{aggregate, count_per_group, WeightedEffect, WeightedSums};
pub use error::{Error, Result};
pub use execution::{map_rows, try_map_rows, ExecutionStrategy};
pub use group::{GroupKey, GroupTable};
pub use numeric::{clean_non_finite, CleanNonFinite};
