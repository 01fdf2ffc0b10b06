//! B-spline interpolation of degree 2 to 5.
//!
//! Samples are first converted into B-spline coefficients by a recursive
//! prefilter (causal and anti-causal passes per pole) so that the resulting
//! spline passes through every input sample. Both the prefilter and the
//! evaluation extend the line with mirror symmetry.

use super::common::mirror_index;
use super::Interpolator;
use crate::error::{CharneyError, Result};

/// Highest supported spline degree
pub const MAX_ORDER: usize = 5;

/// B-spline interpolator of a fixed degree
#[derive(Debug, Clone, Copy)]
pub struct SplineInterpolator {
    order: usize,
}

impl SplineInterpolator {
    /// Create a spline interpolator; degrees 2 through 5 are supported here,
    /// lower degrees have dedicated interpolators.
    pub fn new(order: usize) -> Result<Self> {
        if !(2..=MAX_ORDER).contains(&order) {
            return Err(CharneyError::Interpolation {
                message: format!("Spline order must be between 2 and {MAX_ORDER}, got {order}"),
            });
        }
        Ok(Self { order })
    }
}

impl Interpolator for SplineInterpolator {
    fn prepare(&self, line: &mut [f64]) {
        spline_filter_1d(line, self.order);
    }

    fn sample(&self, coefficients: &[f64], index: f64) -> f64 {
        let len = coefficients.len();
        match len {
            0 => return 0.0,
            1 => return coefficients[0],
            _ => {}
        }

        let order = self.order;
        let half = (order / 2) as isize;
        let start = if order % 2 == 1 {
            index.floor() as isize - half
        } else {
            (index + 0.5).floor() as isize - half
        };

        (0..=order)
            .map(|k| {
                let i = start + k as isize;
                bspline(order, index - i as f64) * coefficients[mirror_index(i, len)]
            })
            .sum()
    }

    fn order(&self) -> usize {
        self.order
    }

    fn name(&self) -> &str {
        "spline"
    }
}

/// Poles of the B-spline prefilter for a given degree.
fn poles(order: usize) -> Vec<f64> {
    match order {
        2 => vec![8f64.sqrt() - 3.0],
        3 => vec![3f64.sqrt() - 2.0],
        4 => vec![
            (664.0 - 438976f64.sqrt()).sqrt() + 304f64.sqrt() - 19.0,
            (664.0 + 438976f64.sqrt()).sqrt() - 304f64.sqrt() - 19.0,
        ],
        5 => vec![
            (67.5 - 4436.25f64.sqrt()).sqrt() + 26.25f64.sqrt() - 6.5,
            (67.5 + 4436.25f64.sqrt()).sqrt() - 26.25f64.sqrt() - 6.5,
        ],
        _ => Vec::new(),
    }
}

/// Convert samples into interpolating B-spline coefficients in place.
///
/// Degrees below 2 and lines shorter than two samples are left untouched.
pub fn spline_filter_1d(line: &mut [f64], order: usize) {
    let n = line.len();
    if order < 2 || n < 2 {
        return;
    }

    let poles = poles(order);
    let gain: f64 = poles
        .iter()
        .map(|&z| (1.0 - z) * (1.0 - 1.0 / z))
        .product();
    for value in line.iter_mut() {
        *value *= gain;
    }

    for &z in &poles {
        line[0] = initial_causal_coefficient(line, z);
        for k in 1..n {
            line[k] += z * line[k - 1];
        }

        line[n - 1] = initial_anticausal_coefficient(line, z);
        for k in (0..n - 1).rev() {
            line[k] = z * (line[k + 1] - line[k]);
        }
    }
}

/// Initial value of the causal recursion under mirror symmetry.
fn initial_causal_coefficient(line: &[f64], z: f64) -> f64 {
    let n = line.len();
    let iz = 1.0 / z;
    let mut zn = z;
    let mut z2n = z.powi(n as i32 - 1);
    let mut sum = line[0] + z2n * line[n - 1];
    z2n *= z2n * iz;
    for &value in &line[1..n - 1] {
        sum += (zn + z2n) * value;
        zn *= z;
        z2n *= iz;
    }
    sum / (1.0 - zn * zn)
}

/// Initial value of the anti-causal recursion under mirror symmetry.
fn initial_anticausal_coefficient(line: &[f64], z: f64) -> f64 {
    let n = line.len();
    (z / (z * z - 1.0)) * (z * line[n - 2] + line[n - 1])
}

/// Centred B-spline basis function of the given degree evaluated at `t`.
pub fn bspline(order: usize, t: f64) -> f64 {
    let x = t.abs();
    match order {
        0 => {
            if (-0.5..0.5).contains(&t) {
                1.0
            } else {
                0.0
            }
        }
        1 => (1.0 - x).max(0.0),
        2 => {
            if x < 0.5 {
                0.75 - x * x
            } else if x < 1.5 {
                0.5 * (x - 1.5) * (x - 1.5)
            } else {
                0.0
            }
        }
        3 => {
            if x < 1.0 {
                2.0 / 3.0 - x * x + 0.5 * x * x * x
            } else if x < 2.0 {
                (2.0 - x).powi(3) / 6.0
            } else {
                0.0
            }
        }
        4 => {
            let x2 = x * x;
            if x < 0.5 {
                x2 * x2 / 4.0 - 5.0 * x2 / 8.0 + 115.0 / 192.0
            } else if x < 1.5 {
                -x2 * x2 / 6.0 + 5.0 * x2 * x / 6.0 - 5.0 * x2 / 4.0 + 5.0 * x / 24.0
                    + 55.0 / 96.0
            } else if x < 2.5 {
                (2.5 - x).powi(4) / 24.0
            } else {
                0.0
            }
        }
        5 => {
            let x2 = x * x;
            if x < 1.0 {
                (66.0 - 60.0 * x2 + 30.0 * x2 * x2 - 10.0 * x2 * x2 * x) / 120.0
            } else if x < 2.0 {
                (51.0 + 75.0 * x - 210.0 * x2 + 150.0 * x2 * x - 45.0 * x2 * x2
                    + 5.0 * x2 * x2 * x)
                    / 120.0
            } else if x < 3.0 {
                (3.0 - x).powi(5) / 120.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [f64; 7] = [0.0, 2.0, -1.5, 4.0, 3.0, 0.5, -2.0];

    #[test]
    fn test_order_bounds() {
        assert!(SplineInterpolator::new(1).is_err());
        assert!(SplineInterpolator::new(6).is_err());
        for order in 2..=MAX_ORDER {
            assert_eq!(SplineInterpolator::new(order).unwrap().order(), order);
        }
    }

    #[test]
    fn test_basis_partition_of_unity() {
        for order in 0..=MAX_ORDER {
            for step in 0..10 {
                let offset = step as f64 / 10.0;
                let total: f64 = (-4..=4).map(|k| bspline(order, offset - k as f64)).sum();
                assert!(
                    (total - 1.0).abs() < 1e-12,
                    "order {order} offset {offset}: {total}"
                );
            }
        }
    }

    #[test]
    fn test_spline_passes_through_samples() {
        for order in 2..=MAX_ORDER {
            let interpolator = SplineInterpolator::new(order).unwrap();
            let mut coefficients = SAMPLES.to_vec();
            interpolator.prepare(&mut coefficients);

            for (i, &expected) in SAMPLES.iter().enumerate() {
                let actual = interpolator.sample(&coefficients, i as f64);
                assert!(
                    (actual - expected).abs() < 1e-9,
                    "order {order} index {i}: expected {expected}, got {actual}"
                );
            }
        }
    }

    #[test]
    fn test_spline_preserves_constants() {
        for order in 2..=MAX_ORDER {
            let interpolator = SplineInterpolator::new(order).unwrap();
            let mut coefficients = vec![2.5; 6];
            interpolator.prepare(&mut coefficients);

            for step in 0..=50 {
                let index = step as f64 / 10.0;
                let value = interpolator.sample(&coefficients, index);
                assert!((value - 2.5).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_two_sample_line() {
        let interpolator = SplineInterpolator::new(3).unwrap();
        let mut coefficients = vec![1.0, 3.0];
        interpolator.prepare(&mut coefficients);

        assert!((interpolator.sample(&coefficients, 0.0) - 1.0).abs() < 1e-9);
        assert!((interpolator.sample(&coefficients, 1.0) - 3.0).abs() < 1e-9);
        let middle = interpolator.sample(&coefficients, 0.5);
        assert!((middle - 2.0).abs() < 1e-9);
    }
}
