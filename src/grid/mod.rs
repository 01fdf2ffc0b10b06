//! Gridded scalar fields and the smoothing pipeline applied to them.
//!
//! - [`field`]: the lat/lon field type and its missing mask
//! - [`cyclic`]: closing the longitude seam, longitude wrapping
//! - [`smoother`]: seam removal, spline upsampling and re-masking

pub mod cyclic;
pub mod field;
pub mod smoother;

pub use cyclic::{add_cyclic_point, wrap_longitude};
pub use field::{missing_mask, FieldStats, MissingMask, ScalarField};
pub use smoother::{smooth, GridSmoother, SmoothedField, SmoothingParams, BLANK_VALUE};
