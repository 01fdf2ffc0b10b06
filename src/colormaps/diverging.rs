//! Diverging colormaps (two-hue progression with a neutral center).
//!
//! These colormaps are suitable for signed deviations from zero, such as the
//! difference between two model runs.

use colorgrad::{Color, CustomGradient, Gradient};

use super::colormap::{Colormap, Rgba};
use crate::error::{CharneyError, Result};

/// Anchor colors of the `balance` ramp: deep blue through a near-white center to
/// deep red.
const BALANCE_ANCHORS: [(f64, [u8; 3]); 11] = [
    (0.0, [24, 28, 67]),
    (0.1, [31, 58, 138]),
    (0.2, [12, 94, 190]),
    (0.3, [61, 135, 193]),
    (0.4, [149, 179, 203]),
    (0.5, [241, 236, 236]),
    (0.6, [216, 162, 143]),
    (0.7, [196, 107, 83]),
    (0.8, [168, 50, 42]),
    (0.9, [122, 15, 30]),
    (1.0, [60, 9, 18]),
];

/// Balance colormap - blue to red through an off-white center
pub struct Balance {
    gradient: Gradient,
}

impl Balance {
    /// Build the balance ramp
    pub fn new() -> Result<Self> {
        let colors: Vec<Color> = BALANCE_ANCHORS
            .iter()
            .map(|(_, [r, g, b])| {
                Color::new(
                    *r as f64 / 255.0,
                    *g as f64 / 255.0,
                    *b as f64 / 255.0,
                    1.0,
                )
            })
            .collect();
        let positions: Vec<f64> = BALANCE_ANCHORS.iter().map(|(p, _)| *p).collect();

        let gradient = CustomGradient::new()
            .colors(&colors)
            .domain(&positions)
            .build()
            .map_err(|e| CharneyError::InvalidParameter {
                param: "colormap".to_string(),
                message: format!("Failed to build balance colormap: {}", e),
            })?;

        Ok(Self { gradient })
    }
}

impl Colormap for Balance {
    fn rgba(&self, value: f64) -> Rgba {
        color_to_rgba(&self.gradient.at(value.clamp(0.0, 1.0)))
    }

    fn name(&self) -> &str {
        "balance"
    }
}

/// A named colorgrad preset used as a colormap
pub struct GradientColormap {
    name: String,
    gradient: Gradient,
}

impl GradientColormap {
    /// Wrap a gradient defined over [0, 1]
    pub fn new(name: &str, gradient: Gradient) -> Self {
        Self {
            name: name.to_string(),
            gradient,
        }
    }
}

impl Colormap for GradientColormap {
    fn rgba(&self, value: f64) -> Rgba {
        color_to_rgba(&self.gradient.at(value.clamp(0.0, 1.0)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn color_to_rgba(color: &Color) -> Rgba {
    [color.r, color.g, color.b, color.a]
}
