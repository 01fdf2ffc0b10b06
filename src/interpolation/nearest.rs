//! Nearest neighbor interpolation.
//!
//! This method selects the value of the nearest sample. Used for spline order 0,
//! it reproduces the input exactly at integer indices and never smooths.

use super::common;
use super::Interpolator;

/// Nearest neighbor interpolator
pub struct NearestInterpolator;

impl Interpolator for NearestInterpolator {
    fn sample(&self, coefficients: &[f64], index: f64) -> f64 {
        if coefficients.is_empty() {
            return 0.0;
        }
        // Halves round up, matching a degree-0 B-spline centred on each sample
        let nearest = common::clamp_index((index + 0.5).floor(), coefficients.len()) as usize;
        coefficients[nearest]
    }

    fn order(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        "nearest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_exact_indices() {
        let line = [1.0, 2.0, 3.0, 4.0, 5.0];
        let interpolator = NearestInterpolator;

        assert_eq!(interpolator.sample(&line, 0.0), 1.0);
        assert_eq!(interpolator.sample(&line, 2.0), 3.0);
        assert_eq!(interpolator.sample(&line, 4.0), 5.0);
    }

    #[test]
    fn test_nearest_fractional_indices() {
        let line = [1.0, 2.0, 3.0, 4.0, 5.0];
        let interpolator = NearestInterpolator;

        assert_eq!(interpolator.sample(&line, 0.2), 1.0);
        assert_eq!(interpolator.sample(&line, 0.7), 2.0);
        assert_eq!(interpolator.sample(&line, 2.5), 4.0);

        // Out of bounds clamps to the edge samples
        assert_eq!(interpolator.sample(&line, -1.0), 1.0);
        assert_eq!(interpolator.sample(&line, 5.5), 5.0);
    }

    #[test]
    fn test_nearest_prepare_is_identity() {
        let mut line = vec![3.0, -1.0, 7.5];
        NearestInterpolator.prepare(&mut line);
        assert_eq!(line, vec![3.0, -1.0, 7.5]);
    }
}
