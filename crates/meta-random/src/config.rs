//! Configuration for the random-effects pipeline

use meta_core::{Error, ExecutionStrategy, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::heterogeneity::I2Policy;

/// Normal-approximation multiplier of the conventional 95% interval
pub const Z_95: f64 = 1.96;

/// How the confidence interval half-width is scaled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalWidth {
    /// Fixed multiplier of the standard error (1.96 by default)
    Multiplier(f64),
    /// Two-sided confidence level in (0, 1); the multiplier is the
    /// standard normal quantile at `(1 + level) / 2`
    Level(f64),
}

impl Default for IntervalWidth {
    fn default() -> Self {
        Self::Multiplier(Z_95)
    }
}

impl IntervalWidth {
    /// Multiplier applied to the standard error
    pub fn z_critical(&self) -> Result<f64> {
        match *self {
            Self::Multiplier(z) if z.is_finite() && z > 0.0 => Ok(z),
            Self::Multiplier(z) => Err(Error::InvalidParameter(format!(
                "Interval multiplier {z} must be positive and finite"
            ))),
            Self::Level(level) if level > 0.0 && level < 1.0 => {
                let normal = standard_normal()?;
                Ok(normal.inverse_cdf((1.0 + level) / 2.0))
            }
            Self::Level(level) => Err(Error::invalid_confidence_level(level)),
        }
    }
}

/// Random-effects pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomEffectsConfig {
    /// I² floor policy
    pub i2_policy: I2Policy,
    /// Confidence interval width
    pub interval: IntervalWidth,
    /// Strategy for per-study stages
    pub execution: ExecutionStrategy,
}

impl RandomEffectsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_i2_policy(mut self, policy: I2Policy) -> Self {
        self.i2_policy = policy;
        self
    }

    pub fn with_interval(mut self, interval: IntervalWidth) -> Self {
        self.interval = interval;
        self
    }

    /// Shorthand for [`IntervalWidth::Level`]
    pub fn with_confidence_level(self, level: f64) -> Self {
        self.with_interval(IntervalWidth::Level(level))
    }

    pub fn with_execution(mut self, execution: ExecutionStrategy) -> Self {
        self.execution = execution;
        self
    }

    /// Check that the configuration describes a usable interval
    pub fn validate(&self) -> Result<()> {
        self.interval.z_critical().map(|_| ())
    }

    /// Parse and validate a JSON configuration. Missing fields take their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

pub(crate) fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| Error::Computation(e.to_string()))
}
