//! Colormap implementations for contour rendering.
//!
//! This module provides the source diverging ramps and the midpoint remap that
//! recenters them on zero.

pub mod colormap;
pub mod diverging;
pub mod shifted;

pub use colormap::{get_colormap, Colormap, Reversed, Rgba, COLORMAP_NAMES};

// Re-export commonly used colormaps
pub use diverging::{Balance, GradientColormap};
pub use shifted::{
    build, build_with_anchor, centered_midpoint, ColorStop, ColormapRemapper, RemappedColormap,
    ZeroBandAnchor,
};
