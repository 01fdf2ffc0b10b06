//! Linear interpolation.
//!
//! Degree-1 spline: each value is a weighted mean of the two bracketing samples.

use super::common;
use super::Interpolator;

/// Linear interpolator
pub struct LinearInterpolator;

impl Interpolator for LinearInterpolator {
    fn sample(&self, coefficients: &[f64], index: f64) -> f64 {
        let len = coefficients.len();
        if len == 0 {
            return 0.0;
        }
        let index = common::clamp_index(index, len);
        let i0 = index.floor() as usize;
        let i1 = (i0 + 1).min(len - 1);
        let (w0, w1) = common::linear_weight(index - i0 as f64);
        coefficients[i0] * w0 + coefficients[i1] * w1
    }

    fn order(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "linear"
    }
}
