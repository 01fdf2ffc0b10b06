//! Interpolation algorithms for gridded data.
//!
//! This module provides the 1-D resampling kernels (nearest, linear and B-spline
//! of degree 2 to 5) and the separable zoom used to upsample 2-D fields.

pub mod common;
pub mod linear;
pub mod nearest;
pub mod spline;

use ndarray::{Array2, ArrayView2, Axis};

use crate::error::{CharneyError, Result};

pub use spline::MAX_ORDER;

/// Trait for 1-D interpolation kernels
pub trait Interpolator {
    /// Turn a line of samples into the coefficients [`Interpolator::sample`] expects.
    ///
    /// The default leaves the samples untouched.
    fn prepare(&self, _line: &mut [f64]) {}

    /// Interpolate a value at a fractional index into prepared coefficients
    fn sample(&self, coefficients: &[f64], index: f64) -> f64;

    /// Polynomial degree of the kernel
    fn order(&self) -> usize;

    /// Get the name of this interpolation method
    fn name(&self) -> &str;
}

/// Get an interpolator by spline order (0 = nearest, 1 = linear, 2..=5 = B-spline)
pub fn get_interpolator(order: usize) -> Result<Box<dyn Interpolator>> {
    match order {
        0 => Ok(Box::new(nearest::NearestInterpolator)),
        1 => Ok(Box::new(linear::LinearInterpolator)),
        2..=MAX_ORDER => Ok(Box::new(spline::SplineInterpolator::new(order)?)),
        _ => Err(CharneyError::InvalidParameter {
            param: "interpolation_order".to_string(),
            message: format!("Unsupported interpolation order {order}, expected 0 to {MAX_ORDER}"),
        }),
    }
}

/// Resample `data` along one axis to `out_len` points.
///
/// Output sample `i` is taken at fractional input index `i * (n - 1) / (out_len - 1)`,
/// so both ends of the axis are preserved.
pub fn zoom_axis(
    data: ArrayView2<f64>,
    axis: Axis,
    out_len: usize,
    interpolator: &dyn Interpolator,
) -> Result<Array2<f64>> {
    if axis.index() > 1 {
        return Err(CharneyError::Interpolation {
            message: format!("Axis {} out of range for a 2-D array", axis.index()),
        });
    }

    let in_len = data.len_of(axis);
    let mut shape = [data.nrows(), data.ncols()];
    shape[axis.index()] = out_len;
    let mut out = Array2::<f64>::zeros(shape);

    let coords = common::zoom_coordinates(in_len, out_len);
    let mut coefficients = Vec::with_capacity(in_len);

    for (lane, mut out_lane) in data.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
        coefficients.clear();
        coefficients.extend(lane.iter().copied());
        interpolator.prepare(&mut coefficients);

        for (target, &index) in out_lane.iter_mut().zip(&coords) {
            *target = interpolator.sample(&coefficients, index);
        }
    }

    Ok(out)
}

/// Upsample a 2-D array by an integer factor along both axes.
///
/// The spline is separable, so resampling one axis after the other is the same
/// as evaluating the tensor-product spline.
pub fn zoom(data: ArrayView2<f64>, factor: usize, order: usize) -> Result<Array2<f64>> {
    if factor == 0 {
        return Err(CharneyError::InvalidParameter {
            param: "upsample_factor".to_string(),
            message: "Upsample factor must be at least 1".to_string(),
        });
    }

    let interpolator = get_interpolator(order)?;
    let rows = zoom_axis(data, Axis(0), data.nrows() * factor, interpolator.as_ref())?;
    zoom_axis(rows.view(), Axis(1), data.ncols() * factor, interpolator.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_get_interpolator() {
        assert_eq!(get_interpolator(0).unwrap().name(), "nearest");
        assert_eq!(get_interpolator(1).unwrap().name(), "linear");
        assert_eq!(get_interpolator(3).unwrap().order(), 3);
        assert!(get_interpolator(6).is_err());
    }

    #[test]
    fn test_zoom_shape_and_corners() {
        let data = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];

        for order in 0..=MAX_ORDER {
            let zoomed = zoom(data.view(), 2, order).unwrap();
            assert_eq!(zoomed.shape(), &[4, 6]);
            assert!((zoomed[[0, 0]] - 1.0).abs() < 1e-9);
            assert!((zoomed[[0, 5]] - 3.0).abs() < 1e-9);
            assert!((zoomed[[3, 0]] - 4.0).abs() < 1e-9);
            assert!((zoomed[[3, 5]] - 6.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zoom_linear_plane_is_exact() {
        // A bilinear ramp is reproduced by the linear kernel everywhere
        let data = array![[0.0, 1.0, 2.0], [10.0, 11.0, 12.0], [20.0, 21.0, 22.0]];
        let zoomed = zoom(data.view(), 3, 1).unwrap();

        let n = zoomed.nrows();
        for i in 0..n {
            for j in 0..zoomed.ncols() {
                let y = i as f64 * 2.0 / (n - 1) as f64;
                let x = j as f64 * 2.0 / (zoomed.ncols() - 1) as f64;
                assert!((zoomed[[i, j]] - (10.0 * y + x)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_zoom_factor_one_is_identity() {
        let data = array![[1.0, -2.0, 3.5], [0.0, 7.0, -6.0], [2.0, 2.0, 9.0]];
        for order in 0..=MAX_ORDER {
            let zoomed = zoom(data.view(), 1, order).unwrap();
            for (a, b) in zoomed.iter().zip(data.iter()) {
                assert!((a - b).abs() < 1e-9, "order {order}: {a} != {b}");
            }
        }
    }

    #[test]
    fn test_zoom_rejects_zero_factor() {
        let data = array![[1.0, 2.0], [3.0, 4.0]];
        assert!(zoom(data.view(), 0, 2).is_err());
    }
}
