//! Non-finite value handling
//!
//! Degenerate groups (one study, zero weights) produce NaN or infinite
//! intermediate values. Stages that own such values clean them with
//! [`clean_non_finite`]: NaN becomes zero first, then infinities become
//! zero, so neither sentinel survives.

use num_traits::Float;

/// Replace NaN with zero
#[inline]
pub fn nan_to_zero<T: Float>(value: T) -> T {
    if value.is_nan() {
        T::zero()
    } else {
        value
    }
}

/// Replace positive or negative infinity with zero
#[inline]
pub fn inf_to_zero<T: Float>(value: T) -> T {
    if value.is_infinite() {
        T::zero()
    } else {
        value
    }
}

/// NaN to zero, then infinity to zero
#[inline]
pub fn clean_non_finite<T: Float>(value: T) -> T {
    inf_to_zero(nan_to_zero(value))
}

/// Rows whose numeric fields can all be cleaned of non-finite values
pub trait CleanNonFinite {
    /// Apply [`clean_non_finite`] to every numeric field
    fn clean_non_finite(self) -> Self;

    /// True when every numeric field is finite
    fn is_finite(&self) -> bool;
}
