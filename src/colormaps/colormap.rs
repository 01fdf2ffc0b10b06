//! Colormap trait and utilities.
//!
//! This module defines the common interface for all colormaps and the lookup of
//! named source ramps.

use crate::error::{CharneyError, Result};

/// RGBA color with channels in [0, 1]
pub type Rgba = [f64; 4];

/// Trait for color mapping implementations
pub trait Colormap {
    /// Map a normalized value (0.0 to 1.0) to an RGBA color with channels in [0, 1]
    fn rgba(&self, value: f64) -> Rgba;

    /// Get the name of this colormap
    fn name(&self) -> &str;
}

impl<C: Colormap + ?Sized> Colormap for Box<C> {
    fn rgba(&self, value: f64) -> Rgba {
        (**self).rgba(value)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// A colormap traversed from its top end to its bottom end
pub struct Reversed {
    inner: Box<dyn Colormap>,
    name: String,
}

impl Reversed {
    /// Reverse a colormap; the name gains an `_r` suffix
    pub fn new(inner: Box<dyn Colormap>) -> Self {
        let name = format!("{}_r", inner.name());
        Self { inner, name }
    }
}

impl Colormap for Reversed {
    fn rgba(&self, value: f64) -> Rgba {
        self.inner.rgba(1.0 - value.clamp(0.0, 1.0))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Get a colormap by name; an `_r` suffix reverses any known ramp
pub fn get_colormap(name: &str) -> Result<Box<dyn Colormap>> {
    use super::diverging::{Balance, GradientColormap};

    let lower = name.to_lowercase();
    if let Some(base) = lower.strip_suffix("_r") {
        return Ok(Box::new(Reversed::new(get_colormap(base)?)));
    }

    match lower.as_str() {
        "balance" => Ok(Box::new(Balance::new()?)),
        "rdbu" => Ok(Box::new(GradientColormap::new("rdbu", colorgrad::rd_bu()))),
        "brbg" => Ok(Box::new(GradientColormap::new("brbg", colorgrad::br_bg()))),
        "puor" => Ok(Box::new(GradientColormap::new("puor", colorgrad::pu_or()))),
        "rdylbu" => Ok(Box::new(GradientColormap::new("rdylbu", colorgrad::rd_yl_bu()))),
        "spectral" => Ok(Box::new(GradientColormap::new(
            "spectral",
            colorgrad::spectral(),
        ))),
        _ => Err(CharneyError::InvalidParameter {
            param: "colormap".to_string(),
            message: format!(
                "Unknown colormap: {}. Must be one of: {} (append _r to reverse)",
                name,
                COLORMAP_NAMES.join(", ")
            ),
        }),
    }
}

/// Names accepted by [`get_colormap`], without the `_r` variants
pub const COLORMAP_NAMES: &[&str] = &["balance", "rdbu", "brbg", "puor", "rdylbu", "spectral"];

/// Quantize a [0, 1] color to 8 bits per channel
pub fn to_rgba8(color: Rgba) -> [u8; 4] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Blend a translucent color over an opaque background
pub fn composite_over(color: Rgba, background: [f64; 3]) -> [f64; 3] {
    let alpha = color[3].clamp(0.0, 1.0);
    [
        color[0] * alpha + background[0] * (1.0 - alpha),
        color[1] * alpha + background[1] * (1.0 - alpha),
        color[2] * alpha + background[2] * (1.0 - alpha),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ramp;

    impl Colormap for Ramp {
        fn rgba(&self, value: f64) -> Rgba {
            let v = value.clamp(0.0, 1.0);
            [v, 0.0, 1.0 - v, 1.0]
        }

        fn name(&self) -> &str {
            "ramp"
        }
    }

    #[test]
    fn test_to_rgba8() {
        assert_eq!(to_rgba8([0.0, 0.5, 1.0, 1.0]), [0, 128, 255, 255]);
        assert_eq!(to_rgba8([-0.2, 1.3, 0.2, 0.0]), [0, 255, 51, 0]);
    }

    #[test]
    fn test_reversed() {
        let reversed = Reversed::new(Box::new(Ramp));
        assert_eq!(reversed.name(), "ramp_r");
        assert_eq!(reversed.rgba(0.0), Ramp.rgba(1.0));
        assert_eq!(reversed.rgba(0.25), Ramp.rgba(0.75));
    }

    #[test]
    fn test_get_colormap() {
        for name in COLORMAP_NAMES {
            assert_eq!(get_colormap(name).unwrap().name(), *name);
        }
        assert_eq!(get_colormap("balance_r").unwrap().name(), "balance_r");
        assert_eq!(get_colormap("RdBu").unwrap().name(), "rdbu");
        assert!(get_colormap("jet").is_err());
    }

    #[test]
    fn test_unknown_colormap_lists_names() {
        match get_colormap("jet_r") {
            Err(CharneyError::InvalidParameter { param, message }) => {
                assert_eq!(param, "colormap");
                assert!(message.contains("Unknown colormap: jet"));
                for name in COLORMAP_NAMES {
                    assert!(message.contains(name), "{name} missing from: {message}");
                }
            }
            other => panic!("Expected InvalidParameter, got {:?}", other.map(|c| c.name().to_string())),
        }
    }

    #[test]
    fn test_composite_over_white() {
        let white = [1.0, 1.0, 1.0];
        assert_eq!(composite_over([0.0, 0.0, 0.0, 1.0], white), [0.0, 0.0, 0.0]);
        assert_eq!(composite_over([0.0, 0.0, 0.0, 0.0], white), white);
        let blended = composite_over([0.0, 0.5, 1.0, 0.2], white);
        assert!((blended[0] - 0.8).abs() < 1e-12);
        assert!((blended[1] - 0.9).abs() < 1e-12);
        assert!((blended[2] - 1.0).abs() < 1e-12);
    }
}
