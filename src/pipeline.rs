//! The end-to-end plotting pipeline.
//!
//! load → (relative change) → smooth → colormap → levels → render → save

use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::colormaps::{
    centered_midpoint, get_colormap, Colormap, ColormapRemapper, RemappedColormap,
};
use crate::config::{Config, Mode};
use crate::error::{CharneyError, Result};
use crate::grid::{GridSmoother, ScalarField};
use crate::levels::ContourLevels;
use crate::logging::{log_field_stats, log_timed_operation};
use crate::relative::relative_change;
use crate::render;

/// What a run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Written image
    pub output: PathBuf,
    /// Shape of the smoothed grid
    pub fine_shape: (usize, usize),
    /// Masked cells on the smoothed grid
    pub missing_cells: usize,
    /// Number of contour levels
    pub level_count: usize,
    /// Midpoint the colormap was remapped to
    pub midpoint: f64,
}

/// Run the configured figure from the input files.
#[cfg(feature = "netcdf")]
pub fn run(config: &Config) -> Result<RunSummary> {
    use crate::logging::{log_operation_end, log_operation_start};
    use std::time::Instant;

    let start = Instant::now();
    let input = config.input_path()?;
    log_operation_start("run", Some(&input.display().to_string()));

    let result = load_and_plot(input, config);
    log_operation_end("run", start, result.is_ok());
    result
}

#[cfg(feature = "netcdf")]
fn load_and_plot(input: &std::path::Path, config: &Config) -> Result<RunSummary> {
    use crate::data_loader::{load_control_climatology, load_field};

    let diff = load_field(
        input,
        &config.input.variable,
        &config.input.lat,
        &config.input.lon,
    )?;

    let control = match (&config.mode, &config.control) {
        (Mode::Relative, Some(control)) => Some(load_control_climatology(
            &control.path,
            &control.components,
            control.skip_steps,
            &config.input.lat,
            &config.input.lon,
        )?),
        _ => None,
    };

    let field = derive_field(diff, control.as_ref(), config)?;
    plot_field(&field, config)
}

/// The field that gets plotted: the difference itself, or its percentage of the
/// control climatology in relative mode.
pub fn derive_field(
    diff: ScalarField,
    control: Option<&ScalarField>,
    config: &Config,
) -> Result<ScalarField> {
    log_field_stats("difference", diff.shape(), &diff.stats());

    match config.mode {
        Mode::Absolute => Ok(diff),
        Mode::Relative => {
            let (Some(settings), Some(control)) = (&config.control, control) else {
                return Err(CharneyError::Config {
                    message: "Relative mode needs a control climatology".to_string(),
                });
            };
            log_field_stats("control", control.shape(), &control.stats());

            let relative = relative_change(&diff, control, settings.policy)?;
            log_field_stats("relative", relative.shape(), &relative.stats());
            Ok(relative)
        }
    }
}

/// Smooth, color and render a field, writing the figure to the configured output.
pub fn plot_field(field: &ScalarField, config: &Config) -> Result<RunSummary> {
    let smoother = GridSmoother::new(config.smoothing)?;
    let smoothed = log_timed_operation("smooth", || smoother.smooth(field))?;

    let levels = config.levels.build()?;
    let colormap = build_colormap(config, &levels)?;

    let outside = field
        .values()
        .iter()
        .filter(|v| v.is_finite() && (**v < levels.min() || **v > levels.max()))
        .count();
    if outside > 0 {
        warn!(
            cells = outside,
            min_level = levels.min(),
            max_level = levels.max(),
            "Values outside the contour levels are left blank"
        );
    }

    let options = config.render.options();
    let image = log_timed_operation("render", || {
        render::render(&smoothed, &levels, &colormap, &options)
    })?;
    render::save(&image, &config.render.output)?;

    let summary = RunSummary {
        output: config.render.output.clone(),
        fine_shape: smoothed.shape(),
        missing_cells: smoothed.missing_count(),
        level_count: levels.len(),
        midpoint: colormap_midpoint(config, &levels)?,
    };

    info!(
        output = %summary.output.display(),
        fine_shape = ?summary.fine_shape,
        missing_cells = summary.missing_cells,
        levels = summary.level_count,
        "Figure written"
    );

    Ok(summary)
}

/// Remap the configured source colormap around the resolved midpoint.
pub fn build_colormap(config: &Config, levels: &ContourLevels) -> Result<RemappedColormap> {
    let settings = &config.colormap;
    let source = get_colormap(&settings.source)?;
    let midpoint = colormap_midpoint(config, levels)?;

    let remapper = ColormapRemapper::new(
        settings.start,
        midpoint,
        settings.stop,
        settings.zero_band_alpha,
    )?
    .with_anchor(settings.anchor);

    Ok(remapper.build(source.as_ref()).with_name(format!("{}_shifted", source.name())))
}

/// Configured midpoint, or the one that centers zero between the outer levels
fn colormap_midpoint(config: &Config, levels: &ContourLevels) -> Result<f64> {
    match config.colormap.midpoint {
        Some(midpoint) => Ok(midpoint),
        None => centered_midpoint(levels.min(), levels.max()),
    }
}
