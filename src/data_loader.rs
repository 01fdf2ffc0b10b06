//! NetCDF data loading functionality.
//!
//! This module reads 2-D lat/lon fields and control-run climatologies out of
//! NetCDF files. Fill values are converted to NaN so that they flow through the
//! rest of the pipeline as missing cells.

use ndarray::{Array2, ArrayView3, Array3};
use netcdf::Variable as NetCDFVariable;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{CharneyError, Result};
use crate::grid::ScalarField;
use crate::relative::control_climatology;

/// Attributes whose value marks missing data
const FILL_ATTRIBUTES: [&str; 2] = ["_FillValue", "missing_value"];

/// Load a 2-D field and its latitude/longitude coordinates.
///
/// Leading dimensions of length one (a single time step, say) are squeezed away.
/// A descending latitude axis is flipped so the field is south to north.
pub fn load_field(path: &Path, variable: &str, lat_name: &str, lon_name: &str) -> Result<ScalarField> {
    let file = open_file(path)?;

    let var = find_variable(&file, variable)?;
    let dims = var_dimensions(&var);
    let values = read_values(&var)?;

    let lat = read_coordinate(&file, lat_name)?;
    let lon = read_coordinate(&file, lon_name)?;

    let grid_dims: Vec<(String, usize)> = dims
        .iter()
        .filter(|(_, len)| *len != 1)
        .cloned()
        .collect();
    if grid_dims.len() != 2 {
        return Err(CharneyError::InvalidParameter {
            param: "variable".to_string(),
            message: format!(
                "Variable {} must be two-dimensional after squeezing, has dimensions {:?}",
                variable, dims
            ),
        });
    }

    let grid = Array2::from_shape_vec((grid_dims[0].1, grid_dims[1].1), values)?;

    // Some files store (lon, lat); bring them to (lat, lon)
    let grid = if grid_dims[0].0 == lon_name && grid_dims[1].0 == lat_name {
        debug!(variable = variable, "Transposing (lon, lat) variable");
        grid.reversed_axes().as_standard_layout().into_owned()
    } else {
        grid
    };

    info!(
        path = %path.display(),
        variable = variable,
        shape = ?grid.dim(),
        "Loaded field"
    );

    ScalarField::from_grid(grid, lat, lon)
}

/// Load a control run and reduce it to the time-mean sum of `components`.
///
/// Each component must be a (time, lat, lon) variable; the first `skip_steps`
/// time steps are discarded as spin-up.
pub fn load_control_climatology(
    path: &Path,
    components: &[String],
    skip_steps: usize,
    lat_name: &str,
    lon_name: &str,
) -> Result<ScalarField> {
    let file = open_file(path)?;

    let mut arrays: Vec<Array3<f64>> = Vec::with_capacity(components.len());
    for name in components {
        let var = find_variable(&file, name)?;
        let dims = var_dimensions(&var);
        if dims.len() != 3 {
            return Err(CharneyError::InvalidParameter {
                param: "components".to_string(),
                message: format!(
                    "Control variable {} must be (time, lat, lon), has dimensions {:?}",
                    name, dims
                ),
            });
        }
        let values = read_values(&var)?;
        let array = Array3::from_shape_vec((dims[0].1, dims[1].1, dims[2].1), values)?;
        debug!(component = %name, shape = ?array.dim(), "Read control component");
        arrays.push(array);
    }

    let views: Vec<ArrayView3<f64>> = arrays.iter().map(|a| a.view()).collect();
    let climatology = control_climatology(&views, skip_steps)?;

    let lat = read_coordinate(&file, lat_name)?;
    let lon = read_coordinate(&file, lon_name)?;

    info!(
        path = %path.display(),
        components = %components.join(" + "),
        skip_steps = skip_steps,
        "Loaded control climatology"
    );

    ScalarField::from_grid(climatology, lat, lon)
}

/// Open a NetCDF file read-only
fn open_file(path: &Path) -> Result<netcdf::File> {
    // Check if the file exists
    if !path.exists() {
        return Err(CharneyError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }

    let file = netcdf::open(path)?;
    debug!(
        path = %path.display(),
        variables = file.variables().count(),
        dimensions = file.dimensions().count(),
        "Opened NetCDF file"
    );
    Ok(file)
}

fn find_variable<'f>(file: &'f netcdf::File, name: &str) -> Result<NetCDFVariable<'f>> {
    file.variable(name).ok_or_else(|| CharneyError::DataNotFound {
        message: format!("Variable not found: {}", name),
    })
}

fn var_dimensions(var: &NetCDFVariable) -> Vec<(String, usize)> {
    var.dimensions()
        .iter()
        .map(|dim| (dim.name().to_string(), dim.len()))
        .collect()
}

/// Read a 1-D coordinate variable
fn read_coordinate(file: &netcdf::File, name: &str) -> Result<Vec<f64>> {
    let var = find_variable(file, name)?;
    if var.dimensions().len() != 1 {
        return Err(CharneyError::InvalidCoordinates {
            message: format!("Coordinate {} must be one-dimensional", name),
        });
    }
    read_numeric(&var)
}

/// Read a variable as f64 with CF decoding: fill and missing values become
/// NaN, then packed values are unpacked with `scale_factor` and `add_offset`.
fn read_values(var: &NetCDFVariable) -> Result<Vec<f64>> {
    let mut values = read_numeric(var)?;
    let fills = fill_values(var);
    if !fills.is_empty() {
        let mut replaced = 0usize;
        for value in values.iter_mut() {
            if fills.iter().any(|fill| fill_matches(*value, *fill)) {
                *value = f64::NAN;
                replaced += 1;
            }
        }
        debug!(variable = %var.name(), replaced = replaced, "Replaced fill values");
    }

    let scale = numeric_attribute(var, "scale_factor").first().copied();
    let offset = numeric_attribute(var, "add_offset").first().copied();
    if scale.is_some() || offset.is_some() {
        let (scale, offset) = (scale.unwrap_or(1.0), offset.unwrap_or(0.0));
        values
            .iter_mut()
            .filter(|v| v.is_finite())
            .for_each(|v| *v = *v * scale + offset);
        debug!(variable = %var.name(), scale, offset, "Unpacked values");
    }

    Ok(values)
}

/// Read a numeric variable in whichever storage type it uses
fn read_numeric(var: &NetCDFVariable) -> Result<Vec<f64>> {
    let first_error = match var.get_values::<f64, _>(..) {
        Ok(values) => return Ok(values),
        Err(e) => e,
    };
    if let Ok(values) = var.get_values::<f32, _>(..) {
        return Ok(values.into_iter().map(f64::from).collect());
    }
    if let Ok(values) = var.get_values::<i32, _>(..) {
        return Ok(values.into_iter().map(f64::from).collect());
    }
    if let Ok(values) = var.get_values::<i16, _>(..) {
        return Ok(values.into_iter().map(f64::from).collect());
    }
    if let Ok(values) = var.get_values::<i8, _>(..) {
        return Ok(values.into_iter().map(f64::from).collect());
    }
    warn!(variable = %var.name(), "Variable is not numeric");
    Err(CharneyError::NetCdf(first_error))
}

/// Values of the fill attributes of a variable
fn fill_values(var: &NetCDFVariable) -> Vec<f64> {
    FILL_ATTRIBUTES
        .iter()
        .flat_map(|name| numeric_attribute(var, name))
        .collect()
}

/// Numeric values of a variable attribute; empty when absent or non-numeric
fn numeric_attribute(var: &NetCDFVariable, name: &str) -> Vec<f64> {
    use netcdf::AttributeValue as NcAttributeValue;

    let Some(attr) = var.attribute(name) else {
        return Vec::new();
    };
    match attr.value() {
        Ok(NcAttributeValue::Double(v)) => vec![v],
        Ok(NcAttributeValue::Float(v)) => vec![v as f64],
        Ok(NcAttributeValue::Int(v)) => vec![v as f64],
        Ok(NcAttributeValue::Short(v)) => vec![v as f64],
        Ok(NcAttributeValue::Schar(v)) => vec![v as f64],
        Ok(NcAttributeValue::Doubles(vs)) => vs,
        Ok(NcAttributeValue::Floats(vs)) => vs.into_iter().map(f64::from).collect(),
        Ok(other) => {
            warn!(attribute = name, value = ?other, "Ignoring non-numeric attribute");
            Vec::new()
        }
        Err(e) => {
            warn!(attribute = name, error = %e, "Could not read attribute");
            Vec::new()
        }
    }
}

/// Fill values are compared with a relative tolerance; f32 fills widened to f64
/// do not round-trip exactly.
fn fill_matches(value: f64, fill: f64) -> bool {
    if fill.is_nan() {
        return value.is_nan();
    }
    (value - fill).abs() <= 1e-6 * fill.abs().max(1.0)
}
