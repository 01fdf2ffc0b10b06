//! Seam-aware, mask-preserving upsampling of coarse fields.
//!
//! The smoother closes the longitude seam, fills missing cells with zero so the
//! spline can run, upsamples with a B-spline of the requested degree and finally
//! blanks every fine cell whose coarse source cell was missing. The spline is
//! never allowed to fabricate values inside a region without data.

use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cyclic::add_cyclic_point;
use super::field::{missing_mask, MissingMask, ScalarField};
use crate::error::{CharneyError, Result};
use crate::interpolation::{self, common::linspace, MAX_ORDER};

/// Value written into fine cells that map back to a missing coarse cell
pub const BLANK_VALUE: f64 = 0.0;

/// Parameters of the smoothing pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingParams {
    /// Number of fine cells per coarse cell along each axis
    #[serde(default = "default_upsample_factor")]
    pub upsample_factor: usize,

    /// Spline degree, 0 (nearest) to 5
    #[serde(default = "default_interpolation_order")]
    pub interpolation_order: usize,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            upsample_factor: default_upsample_factor(),
            interpolation_order: default_interpolation_order(),
        }
    }
}

fn default_upsample_factor() -> usize {
    2
}

fn default_interpolation_order() -> usize {
    2
}

impl SmoothingParams {
    /// Validate the parameters
    pub fn validate(&self) -> Result<()> {
        if self.upsample_factor == 0 {
            return Err(CharneyError::invalid_parameter(
                "upsample_factor",
                "must be at least 1",
            ));
        }
        if self.interpolation_order > MAX_ORDER {
            return Err(CharneyError::invalid_parameter(
                "interpolation_order",
                format!("must be between 0 and {MAX_ORDER}, got {}", self.interpolation_order),
            ));
        }
        Ok(())
    }
}

/// A smoothed field on the fine grid
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedField {
    /// Upsampled values, [`BLANK_VALUE`] wherever `mask` is set
    pub values: Array2<f64>,
    /// Fine-resolution missing mask
    pub mask: MissingMask,
    /// Fine latitude axis
    pub lat: Vec<f64>,
    /// Fine longitude axis, including the closed seam
    pub lon: Vec<f64>,
    /// Upsample factor that produced this grid
    pub upsample_factor: usize,
}

impl SmoothedField {
    /// Shape as (latitude count, longitude count)
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Number of masked fine cells
    pub fn missing_count(&self) -> usize {
        self.mask.iter().filter(|m| **m).count()
    }
}

/// Upsamples coarse fields without leaking data across the seam or into gaps
#[derive(Debug, Clone, Copy)]
pub struct GridSmoother {
    params: SmoothingParams,
}

impl GridSmoother {
    /// Create a smoother, rejecting invalid parameters
    pub fn new(params: SmoothingParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// The parameters this smoother runs with
    pub fn params(&self) -> SmoothingParams {
        self.params
    }

    /// Smooth a field onto a grid `upsample_factor` times denser.
    pub fn smooth(&self, field: &ScalarField) -> Result<SmoothedField> {
        let factor = self.params.upsample_factor;
        let (n_lat, n_lon) = field.shape();
        if n_lat < 2 || n_lon < 2 {
            return Err(CharneyError::InvalidCoordinates {
                message: format!(
                    "Cannot smooth a {n_lat}x{n_lon} grid, both axes need at least two points"
                ),
            });
        }

        // Close the seam before anything else so the spline sees the wrap
        let (extended, lon_cyclic) = add_cyclic_point(field.values(), field.lon())?;

        let coarse_mask = missing_mask(extended.view());
        let filled = extended.mapv(|v| if v.is_finite() { v } else { 0.0 });

        let lat_fine = fine_axis(field.lat(), factor);
        let lon_fine = fine_axis(&lon_cyclic, factor);

        let mut values =
            interpolation::zoom(filled.view(), factor, self.params.interpolation_order)?;

        let mask = Array2::from_shape_fn(values.dim(), |(i, j)| {
            coarse_mask[[i / factor, j / factor]]
        });
        Zip::from(&mut values).and(&mask).for_each(|value, &missing| {
            if missing {
                *value = BLANK_VALUE;
            }
        });

        let smoothed = SmoothedField {
            values,
            mask,
            lat: lat_fine,
            lon: lon_fine,
            upsample_factor: factor,
        };

        debug!(
            coarse_shape = ?(n_lat, n_lon),
            fine_shape = ?smoothed.shape(),
            order = self.params.interpolation_order,
            missing_fine = smoothed.missing_count(),
            "Smoothed field"
        );

        Ok(smoothed)
    }
}

/// Smooth a field with the given upsample factor and spline order.
pub fn smooth(
    field: &ScalarField,
    upsample_factor: usize,
    interpolation_order: usize,
) -> Result<SmoothedField> {
    GridSmoother::new(SmoothingParams {
        upsample_factor,
        interpolation_order,
    })?
    .smooth(field)
}

/// Evenly spaced axis over the same span with `factor` times as many points
fn fine_axis(coords: &[f64], factor: usize) -> Vec<f64> {
    let min = coords.iter().copied().fold(f64::INFINITY, f64::min);
    let max = coords.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    linspace(min, max, coords.len() * factor, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, s};

    fn scenario_field() -> ScalarField {
        let values = array![[1.0, 2.0, f64::NAN], [f64::NAN, 5.0, 6.0]];
        ScalarField::new(values, vec![-10.0, 10.0], vec![0.0, 120.0, 240.0]).unwrap()
    }

    #[test]
    fn test_smoothing_params_validation() {
        assert!(SmoothingParams::default().validate().is_ok());
        assert!(GridSmoother::new(SmoothingParams {
            upsample_factor: 0,
            interpolation_order: 2,
        })
        .is_err());
        assert!(GridSmoother::new(SmoothingParams {
            upsample_factor: 2,
            interpolation_order: 6,
        })
        .is_err());
    }

    #[test]
    fn test_degenerate_grid_is_rejected() {
        let field = ScalarField::new(array![[1.0, 2.0, 3.0]], vec![0.0], vec![0.0, 1.0, 2.0])
            .unwrap();
        assert!(smooth(&field, 2, 2).is_err());

        let field = ScalarField::new(array![[1.0], [2.0]], vec![0.0, 1.0], vec![0.0]).unwrap();
        assert!(smooth(&field, 2, 2).is_err());
    }

    #[test]
    fn test_scenario_shape_and_axes() {
        let smoothed = smooth(&scenario_field(), 2, 2).unwrap();

        // 2x3 plus the seam column is 2x4, doubled to 4x8
        assert_eq!(smoothed.shape(), (4, 8));
        assert_eq!(smoothed.lat.len(), 4);
        assert_eq!(smoothed.lon.len(), 8);
        assert_eq!(smoothed.lat[0], -10.0);
        assert_eq!(smoothed.lat[3], 10.0);
        assert_eq!(smoothed.lon[0], 0.0);
        assert_eq!(smoothed.lon[7], 360.0);
    }

    #[test]
    fn test_scenario_missing_blocks_are_blank() {
        let smoothed = smooth(&scenario_field(), 2, 2).unwrap();

        let expected_mask = array![
            [false, false, false, false, true, true, false, false],
            [false, false, false, false, true, true, false, false],
            [true, true, false, false, false, false, true, true],
            [true, true, false, false, false, false, true, true],
        ];
        assert_eq!(smoothed.mask, expected_mask);

        for ((i, j), &missing) in smoothed.mask.indexed_iter() {
            if missing {
                assert_eq!(smoothed.values[[i, j]], BLANK_VALUE);
            }
        }
    }

    #[test]
    fn test_scenario_quadrants_track_source_values() {
        // Linear pulls hardest toward the zero-filled neighbours
        for (order, tolerance) in [(1, 1.5), (2, 1.0), (3, 1.0)] {
            let smoothed = smooth(&scenario_field(), 2, order).unwrap();

            // Present source cells: (0,0)=1, (0,1)=2, (1,1)=5, (1,2)=6, seam (0,3)=1
            for &((ci, cj), source) in &[((0, 0), 1.0), ((0, 1), 2.0), ((1, 1), 5.0), ((1, 2), 6.0)] {
                let block = smoothed.values.slice(s![2 * ci..2 * ci + 2, 2 * cj..2 * cj + 2]);
                let mean = block.mean().unwrap();
                assert!(
                    (mean - source).abs() < tolerance,
                    "order {order}, cell ({ci},{cj}): block mean {mean}, source {source}"
                );
            }
            // Corners sit exactly on source samples
            assert!((smoothed.values[[0, 0]] - 1.0).abs() < 1e-9);
            assert!((smoothed.values[[0, 7]] - 1.0).abs() < 1e-9);
            assert!((smoothed.values[[3, 7]] - 0.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_no_missing_values_gives_clear_mask() {
        let values = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        let field = ScalarField::new(values, vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0]).unwrap();

        for order in 0..=MAX_ORDER {
            let smoothed = smooth(&field, 3, order).unwrap();
            assert!(smoothed.mask.iter().all(|m| !m));
            assert_eq!(smoothed.missing_count(), 0);
        }
    }

    #[test]
    fn test_missing_blocks_never_leak() {
        let mut values = Array2::from_shape_fn((4, 5), |(i, j)| (i * 5 + j) as f64);
        values[[1, 2]] = f64::NAN;
        values[[3, 0]] = f64::NAN;
        values[[0, 4]] = f64::NAN;
        let field = ScalarField::new(
            values.clone(),
            vec![0.0, 1.0, 2.0, 3.0],
            vec![0.0, 72.0, 144.0, 216.0, 288.0],
        )
        .unwrap();

        for factor in 1..=4 {
            let smoothed = smooth(&field, factor, 3).unwrap();
            for ((ci, cj), &value) in values.indexed_iter() {
                if value.is_nan() {
                    let block = smoothed.mask.slice(s![
                        ci * factor..(ci + 1) * factor,
                        cj * factor..(cj + 1) * factor
                    ]);
                    assert!(block.iter().all(|m| *m), "factor {factor} cell ({ci},{cj})");
                }
            }
            // (3,0) is missing, so the seam copy in the last column is missing too
            let seam = smoothed
                .mask
                .slice(s![3 * factor..4 * factor, 5 * factor..6 * factor]);
            assert!(seam.iter().all(|m| *m));
        }
    }

    #[test]
    fn test_seam_column_repeats_first_column() {
        let values = array![[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]];
        let field = ScalarField::new(values, vec![0.0, 1.0], vec![-180.0, -90.0, 0.0, 90.0])
            .unwrap();

        let smoothed = smooth(&field, 1, 0).unwrap();
        let last = smoothed.values.ncols() - 1;
        assert_eq!(smoothed.values.column(last), smoothed.values.column(0));
        assert_eq!(smoothed.lon[last], 180.0);
    }

    #[test]
    fn test_identity_smoothing() {
        let values = array![[1.5, f64::NAN, -2.0], [0.25, 4.0, f64::NAN]];
        let field = ScalarField::new(values.clone(), vec![0.0, 5.0], vec![0.0, 5.0, 10.0])
            .unwrap();

        let smoothed = smooth(&field, 1, 0).unwrap();
        assert_eq!(smoothed.shape(), (2, 4));

        for ((i, j), &original) in values.indexed_iter() {
            if original.is_nan() {
                assert!(smoothed.mask[[i, j]]);
                assert_eq!(smoothed.values[[i, j]], BLANK_VALUE);
            } else {
                assert!(!smoothed.mask[[i, j]]);
                assert!((smoothed.values[[i, j]] - original).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_all_missing_field() {
        let values = Array2::from_elem((3, 4), f64::NAN);
        let field = ScalarField::new(values, vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0, 3.0])
            .unwrap();

        let smoothed = smooth(&field, 2, 3).unwrap();
        assert_eq!(smoothed.shape(), (6, 10));
        assert!(smoothed.mask.iter().all(|m| *m));
        assert!(smoothed.values.iter().all(|v| *v == 0.0));
    }
}
