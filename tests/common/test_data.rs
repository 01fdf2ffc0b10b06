//! Test data generation utilities.
//!
//! This module writes small NetCDF files shaped like the model output charney
//! reads: a single-time-step difference field and a multi-step control run.

use std::path::Path;

// Use the netcdf crate's error type directly
use netcdf::Error;
type Result<T> = std::result::Result<T, Error>;

/// Fill value written in place of missing cells
pub const FILL_VALUE: f32 = -9999.0;

/// Cell-centered global axes: `n_lat` latitudes south to north and `n_lon`
/// longitudes starting at 0.
pub fn global_axes(n_lat: usize, n_lon: usize) -> (Vec<f64>, Vec<f64>) {
    let lat = (0..n_lat)
        .map(|i| -90.0 + (i as f64 + 0.5) * 180.0 / n_lat as f64)
        .collect();
    let lon = (0..n_lon)
        .map(|j| j as f64 * 360.0 / n_lon as f64)
        .collect();
    (lat, lon)
}

/// Creates a difference file with `difference_of_prec(time, lat, lon)`.
///
/// Latitudes are stored north to south, as many models write them. `value` is
/// called with (lat, lon) in degrees; NaN results are written as fill values.
pub fn create_difference_nc(
    path: &Path,
    size: (usize, usize),
    value: impl Fn(f64, f64) -> f64,
) -> Result<()> {
    let (n_lat, n_lon) = size;
    let (mut lat, lon) = global_axes(n_lat, n_lon);
    lat.reverse();

    let mut file = netcdf::create(path)?;

    file.add_dimension("time", 1)?;
    file.add_dimension("lat", n_lat)?;
    file.add_dimension("lon", n_lon)?;

    file.add_attribute("title", "Precipitation difference test data")?;
    file.add_attribute("institution", "charney test suite")?;

    add_axes(&mut file, &lat, &lon)?;

    let data: Vec<f32> = lat
        .iter()
        .flat_map(|&la| lon.iter().map(move |&lo| (la, lo)))
        .map(|(la, lo)| {
            let v = value(la, lo);
            if v.is_nan() {
                FILL_VALUE
            } else {
                v as f32
            }
        })
        .collect();

    let mut var = file.add_variable::<f32>("difference_of_prec", &["time", "lat", "lon"])?;
    var.put_attribute("units", "mm/day")?;
    var.put_attribute("_FillValue", FILL_VALUE)?;
    var.put_values(&data, ..)?;

    Ok(())
}

/// Creates a control run with constant large-scale and convective precipitation.
///
/// The first `spin_up` steps hold `spin_up_value` in both components so that
/// tests can tell whether they were skipped.
pub fn create_control_nc(
    path: &Path,
    size: (usize, usize),
    steps: usize,
    spin_up: usize,
    components: (f32, f32),
    spin_up_value: f32,
) -> Result<()> {
    let (n_lat, n_lon) = size;
    let (lat, lon) = global_axes(n_lat, n_lon);
    let cells = n_lat * n_lon;

    let mut file = netcdf::create(path)?;

    file.add_dimension("time", steps)?;
    file.add_dimension("lat", n_lat)?;
    file.add_dimension("lon", n_lon)?;

    file.add_attribute("title", "Control run test data")?;

    add_axes(&mut file, &lat, &lon)?;

    {
        let mut time = file.add_variable::<f64>("time", &["time"])?;
        time.put_attribute("units", "months since 2000-01-01")?;
        let values: Vec<f64> = (0..steps).map(|t| t as f64).collect();
        time.put_values(&values, ..)?;
    }

    for (name, value) in [("precls", components.0), ("precnv", components.1)] {
        let data: Vec<f32> = (0..steps)
            .flat_map(|t| {
                let v = if t < spin_up { spin_up_value } else { value };
                std::iter::repeat(v).take(cells)
            })
            .collect();

        let mut var = file.add_variable::<f32>(name, &["time", "lat", "lon"])?;
        var.put_attribute("units", "mm/day")?;
        var.put_values(&data, ..)?;
    }

    Ok(())
}

fn add_axes(file: &mut netcdf::FileMut, lat: &[f64], lon: &[f64]) -> Result<()> {
    {
        let mut lat_var = file.add_variable::<f64>("lat", &["lat"])?;
        lat_var.put_attribute("units", "degrees_north")?;
        lat_var.put_values(lat, ..)?;
    }
    {
        let mut lon_var = file.add_variable::<f64>("lon", &["lon"])?;
        lon_var.put_attribute("units", "degrees_east")?;
        lon_var.put_values(lon, ..)?;
    }
    Ok(())
}
