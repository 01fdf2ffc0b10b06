//! Longitude seam handling.
//!
//! Utilities for periodic longitude axes: closing the seam at the date line or
//! prime meridian by repeating the first column, and wrapping longitudes between
//! reference frames.

use ndarray::{concatenate, s, Array2, ArrayView2, Axis};

use crate::error::{CharneyError, Result};

/// Append a copy of the first longitude column to the end of the grid.
///
/// The new coordinate is the last longitude plus one grid step. Longitudes must
/// be evenly spaced.
pub fn add_cyclic_point(values: ArrayView2<f64>, lon: &[f64]) -> Result<(Array2<f64>, Vec<f64>)> {
    if values.ncols() != lon.len() {
        return Err(CharneyError::InvalidCoordinates {
            message: format!(
                "Longitude axis has {} values but the field has {} columns",
                lon.len(),
                values.ncols()
            ),
        });
    }

    let step = longitude_step(lon)?;

    let first = values.slice_move(s![.., 0..1]);
    let extended = concatenate(Axis(1), &[values, first])?;
    let mut lon_cyclic = lon.to_vec();
    lon_cyclic.push(lon[lon.len() - 1] + step);

    Ok((extended, lon_cyclic))
}

/// The spacing of an evenly spaced longitude axis
pub fn longitude_step(lon: &[f64]) -> Result<f64> {
    if lon.len() < 2 {
        return Err(CharneyError::InvalidCoordinates {
            message: format!(
                "At least two longitudes are needed to close the seam, got {}",
                lon.len()
            ),
        });
    }

    let step = lon[1] - lon[0];
    if step == 0.0 || !step.is_finite() {
        return Err(CharneyError::InvalidCoordinates {
            message: format!("Invalid longitude step {step}"),
        });
    }

    let tolerance = 1e-8 + 1e-5 * step.abs();
    if let Some(w) = lon.windows(2).find(|w| ((w[1] - w[0]) - step).abs() > tolerance) {
        return Err(CharneyError::InvalidCoordinates {
            message: format!(
                "Longitudes must be evenly spaced: step {} between {} and {}, expected {}",
                w[1] - w[0],
                w[0],
                w[1],
                step
            ),
        });
    }

    Ok(step)
}

/// Shift a longitude by whole turns into `[base, base + 360)`
pub fn wrap_longitude(lon: f64, base: f64) -> f64 {
    let wrapped = base + (lon - base).rem_euclid(360.0);
    if wrapped >= base + 360.0 {
        base
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_add_cyclic_point() {
        let values = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let lon = [0.0, 120.0, 240.0];

        let (extended, lon_cyclic) = add_cyclic_point(values.view(), &lon).unwrap();

        assert_eq!(extended.shape(), &[2, 4]);
        assert_eq!(extended.column(3), values.column(0));
        assert_eq!(lon_cyclic, vec![0.0, 120.0, 240.0, 360.0]);
    }

    #[test]
    fn test_add_cyclic_point_on_sliced_view() {
        let values = array![[1.0, 2.0, 3.0, 9.0], [4.0, 5.0, 6.0, 9.0]];
        let (extended, lon_cyclic) =
            add_cyclic_point(values.slice(s![.., ..3]), &[0.0, 120.0, 240.0]).unwrap();

        assert_eq!(extended, array![[1.0, 2.0, 3.0, 1.0], [4.0, 5.0, 6.0, 4.0]]);
        assert_eq!(lon_cyclic.last(), Some(&360.0));
    }

    #[test]
    fn test_add_cyclic_point_keeps_missing_values() {
        let values = array![[f64::NAN, 2.0], [4.0, 5.0]];
        let (extended, _) = add_cyclic_point(values.view(), &[-180.0, 0.0]).unwrap();
        assert!(extended[[0, 2]].is_nan());
        assert_eq!(extended[[1, 2]], 4.0);
    }

    #[test]
    fn test_add_cyclic_point_rejects_uneven_spacing() {
        let values = array![[1.0, 2.0, 3.0]];
        let result = add_cyclic_point(values.view(), &[0.0, 10.0, 30.0]);
        assert!(matches!(
            result,
            Err(CharneyError::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn test_add_cyclic_point_rejects_mismatched_axis() {
        let values = array![[1.0, 2.0, 3.0]];
        assert!(add_cyclic_point(values.view(), &[0.0, 10.0]).is_err());
        assert!(longitude_step(&[5.0]).is_err());
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(-25.0, 0.0), 335.0);
        assert_eq!(wrap_longitude(55.0, 0.0), 55.0);
        assert_eq!(wrap_longitude(350.0, -180.0), -10.0);
        assert_eq!(wrap_longitude(360.0, 0.0), 0.0);
    }
}
