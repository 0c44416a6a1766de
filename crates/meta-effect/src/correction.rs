//! Small-sample bias correction
//!
//! Standardized mean differences overestimate the population effect in
//! small samples. Hedges & Olkin (1985) correct them with
//!
//! J(n) = 1 - 3 / (4n - 9)
//!
//! (see also Nakagawa & Cuthill, 2007). The factor is undefined at
//! `4n = 9`, which no integer sample size reaches; `n = 2` divides by -1
//! and yields `J = 4`. Neither case is rejected here.

/// Bias correction factor `J(n)` for a study with `n` observations
#[inline]
pub fn small_sample_correction(n: f64) -> f64 {
    1.0 - 3.0 / (4.0 * n - 9.0)
}

/// Bias-corrected effect size `ES · J(n)`
#[inline]
pub fn unbiased_effect_size(standardized_es: f64, n: f64) -> f64 {
    standardized_es * small_sample_correction(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_correction_factor() {
        assert_relative_eq!(small_sample_correction(10.0), 1.0 - 3.0 / 31.0);
        assert_relative_eq!(small_sample_correction(20.0), 1.0 - 3.0 / 71.0);

        // Large samples barely change
        let j_large = small_sample_correction(1000.0);
        assert!(j_large > 0.999 && j_large < 1.0);
    }

    #[test]
    fn test_tiny_samples() {
        // 4·2 - 9 = -1
        assert_relative_eq!(small_sample_correction(2.0), 4.0);
        // 4·(9/4) - 9 = 0
        assert!(small_sample_correction(2.25).is_infinite());
    }

    #[test]
    fn test_unbiased_effect_size_shrinks() {
        let g = unbiased_effect_size(0.5, 10.0);
        assert!(g < 0.5 && g > 0.0);
        assert_relative_eq!(g, 0.5 * (28.0 / 31.0), epsilon = 1e-12);

        let negative = unbiased_effect_size(-0.5, 10.0);
        assert_relative_eq!(negative, -g);
    }
}
