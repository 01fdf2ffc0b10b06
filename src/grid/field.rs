//! Scalar fields on a latitude/longitude grid.

use ndarray::{Array2, ArrayView2, Axis};
use serde::Serialize;

use crate::error::{CharneyError, Result};

/// Boolean grid, `true` where the underlying value is missing.
pub type MissingMask = Array2<bool>;

/// A 2-D field indexed by (latitude index, longitude index).
///
/// Missing cells (no data, or not significant) hold NaN. Latitudes are strictly
/// ascending; longitudes may use any reference frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    values: Array2<f64>,
    lat: Vec<f64>,
    lon: Vec<f64>,
}

/// Summary statistics of a field, ignoring missing cells
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldStats {
    /// Smallest present value, `None` when every cell is missing
    pub min: Option<f64>,
    /// Largest present value
    pub max: Option<f64>,
    /// Mean of present values
    pub mean: Option<f64>,
    /// Number of missing cells
    pub missing: usize,
    /// Total number of cells
    pub total: usize,
}

impl ScalarField {
    /// Create a field, checking the shape and latitude ordering invariants.
    pub fn new(values: Array2<f64>, lat: Vec<f64>, lon: Vec<f64>) -> Result<Self> {
        if values.dim() != (lat.len(), lon.len()) {
            return Err(CharneyError::InvalidCoordinates {
                message: format!(
                    "Field shape {:?} does not match coordinates ({} lat, {} lon)",
                    values.shape(),
                    lat.len(),
                    lon.len()
                ),
            });
        }

        if lat.iter().chain(lon.iter()).any(|c| !c.is_finite()) {
            return Err(CharneyError::InvalidCoordinates {
                message: "Coordinates must be finite".to_string(),
            });
        }

        if lat.windows(2).any(|w| w[1] <= w[0]) {
            return Err(CharneyError::InvalidCoordinates {
                message: "Latitudes must be strictly ascending".to_string(),
            });
        }

        Ok(Self { values, lat, lon })
    }

    /// Create a field from a grid whose latitudes may run north to south.
    ///
    /// A strictly descending latitude axis is reversed together with the rows.
    pub fn from_grid(values: Array2<f64>, mut lat: Vec<f64>, lon: Vec<f64>) -> Result<Self> {
        let descending = lat.len() > 1 && lat.windows(2).all(|w| w[1] < w[0]);
        if descending {
            lat.reverse();
            let mut flipped = values;
            flipped.invert_axis(Axis(0));
            return Self::new(flipped.as_standard_layout().into_owned(), lat, lon);
        }
        Self::new(values, lat, lon)
    }

    /// The field values, NaN where missing
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Latitude coordinates (ascending)
    pub fn lat(&self) -> &[f64] {
        &self.lat
    }

    /// Longitude coordinates
    pub fn lon(&self) -> &[f64] {
        &self.lon
    }

    /// Shape as (latitude count, longitude count)
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Mask of missing cells
    pub fn missing_mask(&self) -> MissingMask {
        missing_mask(self.values.view())
    }

    /// Number of missing cells
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| is_missing(**v)).count()
    }

    /// Summary statistics over the present cells
    pub fn stats(&self) -> FieldStats {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut present = 0usize;

        for &value in self.values.iter().filter(|v| !is_missing(**v)) {
            min = min.min(value);
            max = max.max(value);
            sum += value;
            present += 1;
        }

        let total = self.values.len();
        if present == 0 {
            return FieldStats {
                min: None,
                max: None,
                mean: None,
                missing: total,
                total,
            };
        }

        FieldStats {
            min: Some(min),
            max: Some(max),
            mean: Some(sum / present as f64),
            missing: total - present,
            total,
        }
    }
}

/// Whether a value counts as missing (NaN or otherwise non-finite)
pub fn is_missing(value: f64) -> bool {
    !value.is_finite()
}

/// Mask of the missing cells of an array
pub fn missing_mask(values: ArrayView2<f64>) -> MissingMask {
    values.mapv(is_missing)
}
