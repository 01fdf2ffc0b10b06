//! Relative (percentage) change against a control run.
//!
//! The difference field of an experiment is divided by the climatology of the
//! control run and expressed in percent.

use ndarray::{s, Array2, ArrayView3, Axis, Zip};
use serde::{Deserialize, Serialize};

use crate::error::{CharneyError, Result};
use crate::grid::ScalarField;

/// What happens to missing difference cells before dividing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Treat missing differences as zero change
    #[default]
    ZeroFill,
    /// Keep missing differences missing
    Preserve,
}

/// Percentage change `100 * diff / control`, cell by cell.
///
/// Cells where the control value is zero or missing become missing. Both fields
/// must share the same grid.
pub fn relative_change(
    diff: &ScalarField,
    control: &ScalarField,
    policy: MissingPolicy,
) -> Result<ScalarField> {
    if diff.shape() != control.shape() {
        return Err(CharneyError::InvalidCoordinates {
            message: format!(
                "Difference field {:?} and control field {:?} have different shapes",
                diff.shape(),
                control.shape()
            ),
        });
    }
    if !same_axis(diff.lat(), control.lat()) || !same_axis(diff.lon(), control.lon()) {
        return Err(CharneyError::InvalidCoordinates {
            message: "Difference and control fields are on different grids".to_string(),
        });
    }

    let mut values = Array2::<f64>::zeros(diff.shape());
    Zip::from(&mut values)
        .and(&diff.values())
        .and(&control.values())
        .for_each(|out, &d, &c| {
            let d = match policy {
                MissingPolicy::ZeroFill if !d.is_finite() => 0.0,
                _ => d,
            };
            *out = if c.is_finite() && c != 0.0 {
                100.0 * d / c
            } else {
                f64::NAN
            };
        });

    ScalarField::new(values, diff.lat().to_vec(), diff.lon().to_vec())
}

/// Time mean of the sum of several (time, lat, lon) components, skipping the
/// first `skip_steps` time steps.
pub fn control_climatology(
    components: &[ArrayView3<f64>],
    skip_steps: usize,
) -> Result<Array2<f64>> {
    let Some(first) = components.first() else {
        return Err(CharneyError::invalid_parameter(
            "components",
            "at least one control component is required",
        ));
    };

    let shape = first.dim();
    if let Some(other) = components.iter().find(|c| c.dim() != shape) {
        return Err(CharneyError::InvalidCoordinates {
            message: format!(
                "Control components have different shapes: {:?} and {:?}",
                shape,
                other.dim()
            ),
        });
    }

    if shape.0 <= skip_steps {
        return Err(CharneyError::DataNotFound {
            message: format!(
                "Control run has {} time steps, need more than the {} skipped",
                shape.0, skip_steps
            ),
        });
    }

    let mut total = first.slice(s![skip_steps.., .., ..]).to_owned();
    for component in &components[1..] {
        total += &component.slice(s![skip_steps.., .., ..]);
    }

    total
        .mean_axis(Axis(0))
        .ok_or_else(|| CharneyError::DataNotFound {
            message: "Control run has no time steps to average".to_string(),
        })
}

fn same_axis(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| (x - y).abs() <= 1e-6 * x.abs().max(1.0))
}
