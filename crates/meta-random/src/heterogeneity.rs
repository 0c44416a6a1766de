//! Heterogeneity statistic I²
//!
//! I² is the percentage of total variation across studies that is due to
//! heterogeneity rather than chance (Higgins & Thompson, 2002):
//!
//! I² = (Q - df) / Q × 100
//!
//! The bare formula is negative whenever `Q < df` and undefined at `Q = 0`.
//! By convention I² is floored at zero so that a random-effects summary is
//! never reported as more precise than a fixed-effect one. [`I2Policy`]
//! selects between the floored and the bare statistic.

use serde::{Deserialize, Serialize};

/// How I² is reported when the bare formula falls below zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum I2Policy {
    /// Floor at zero; `Q = 0` also reports zero and NaN passes through
    #[default]
    Clamp,
    /// The bare formula, including negative and undefined values
    Raw,
}

impl I2Policy {
    /// I² for heterogeneity `q` with `df` degrees of freedom
    pub fn apply(&self, q: f64, df: f64) -> f64 {
        match self {
            Self::Raw => i_squared(q, df),
            Self::Clamp if q == 0.0 => 0.0,
            Self::Clamp => {
                let i2 = i_squared(q, df);
                if i2 < 0.0 {
                    0.0
                } else {
                    i2
                }
            }
        }
    }
}

/// Bare I² statistic in percent
#[inline]
pub fn i_squared(q: f64, df: f64) -> f64 {
    (q - df) / q * 100.0
}
