//! # charney
//!
//! Smooth, centered diverging contour maps of gridded climate-model differences.
//!
//! This library turns a coarse latitude/longitude difference field (an experiment
//! minus a control run, with insignificant cells blanked out) into a contour map
//! whose colormap is centered on zero.
//!
//! ## Key Features
//!
//! - **Midpoint colormap remapping**: shift the center of any diverging colormap
//!   so that zero sits where it belongs in an asymmetric level range
//! - **Seam-free smoothing**: spline upsampling that closes the longitude seam
//!   and never lets data bleed into missing cells
//! - **Relative change**: percentage of a control-run climatology
//! - **Figure output**: plate carrée filled contours written as PNG or JPEG
//!
//! ## Architecture
//!
//! - **Data Layer**: loads NetCDF fields into [`grid::ScalarField`]s
//! - **Processing**: [`grid::GridSmoother`] and [`colormaps::ColormapRemapper`]
//! - **Output**: [`render`] draws the smoothed field with the remapped colormap
//! - **Pipeline**: [`pipeline`] wires the pieces together from a [`Config`]

pub mod colormaps;
pub mod config;
#[cfg(feature = "netcdf")]
pub mod data_loader;
pub mod error;
pub mod grid;
pub mod interpolation;
pub mod levels;
pub mod logging;
pub mod pipeline;
pub mod relative;
pub mod render;

pub use colormaps::{ColormapRemapper, RemappedColormap};
pub use config::{Config, Preset};
pub use error::{CharneyError, Result};
pub use grid::{GridSmoother, ScalarField, SmoothedField};
pub use levels::ContourLevels;
pub use logging::{
    generate_operation_id, init_tracing, log_error, log_field_stats, log_operation_end,
    log_operation_start, log_timed_operation,
};
pub use pipeline::RunSummary;
