//! Row-wise execution strategy
//!
//! Per-study stages are independent across rows, so they may run on a
//! rayon pool when the `parallel` feature is enabled. Without the feature
//! every strategy runs sequentially in the current thread.

use serde::{Deserialize, Serialize};

/// Execution strategy for per-row stages
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    /// Process rows sequentially
    #[default]
    Sequential,
    /// Process rows in parallel (requires the `parallel` feature)
    Parallel,
}

impl ExecutionStrategy {
    /// Check if rows will actually be processed in parallel
    pub fn is_parallel(&self) -> bool {
        cfg!(feature = "parallel") && matches!(self, Self::Parallel)
    }
}

/// Map `f` over every row, preserving row order
pub fn map_rows<T, U, F>(strategy: ExecutionStrategy, rows: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    match strategy {
        #[cfg(feature = "parallel")]
        ExecutionStrategy::Parallel => {
            use rayon::prelude::*;
            rows.par_iter().map(f).collect()
        }
        _ => rows.iter().map(f).collect(),
    }
}

/// Fallible variant of [`map_rows`]; stops at the first error
pub fn try_map_rows<T, U, E, F>(strategy: ExecutionStrategy, rows: &[T], f: F) -> Result<Vec<U>, E>
where
    T: Sync,
    U: Send,
    E: Send,
    F: Fn(&T) -> Result<U, E> + Sync + Send,
{
    match strategy {
        #[cfg(feature = "parallel")]
        ExecutionStrategy::Parallel => {
            use rayon::prelude::*;
            rows.par_iter().map(f).collect()
        }
        _ => rows.iter().map(f).collect(),
    }
}
