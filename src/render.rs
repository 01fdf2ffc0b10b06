//! Filled-contour rendering of smoothed fields.
//!
//! A deliberately thin renderer: plate carrée raster over a lon/lat extent, one
//! flat color per contour band, composited over white, with an optional
//! proportional colorbar underneath. Coastlines, gridlines, titles and legends
//! are not drawn.

use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::colormaps::colormap::{composite_over, to_rgba8};
use crate::colormaps::Colormap;
use crate::error::{CharneyError, Result};
use crate::grid::{wrap_longitude, SmoothedField};
use crate::interpolation::common::linear_weight;
use crate::levels::ContourLevels;

const WHITE: [f64; 3] = [1.0, 1.0, 1.0];
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const OUTLINE: Rgb<u8> = Rgb([0, 0, 0]);

/// Geographic window of the map, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl Extent {
    /// Parse an extent string "lon_min,lon_max,lat_min,lat_max"
    pub fn parse(extent: &str) -> Result<Self> {
        let parts: Vec<&str> = extent.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(CharneyError::InvalidParameter {
                param: "extent".to_string(),
                message: "Extent must be in format 'lon_min,lon_max,lat_min,lat_max'".to_string(),
            });
        }

        let mut values = [0.0; 4];
        let names = ["lon_min", "lon_max", "lat_min", "lat_max"];
        for ((value, part), name) in values.iter_mut().zip(&parts).zip(names) {
            *value = part.parse::<f64>().map_err(|_| CharneyError::InvalidParameter {
                param: "extent".to_string(),
                message: format!("Invalid {}: {}", name, part),
            })?;
        }

        let extent = Self {
            lon_min: values[0],
            lon_max: values[1],
            lat_min: values[2],
            lat_max: values[3],
        };
        extent.validate()?;
        Ok(extent)
    }

    /// Check ordering and ranges
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| CharneyError::InvalidParameter {
            param: "extent".to_string(),
            message,
        };

        if !(self.lon_min < self.lon_max) {
            return Err(invalid(format!(
                "lon_min ({}) must be below lon_max ({})",
                self.lon_min, self.lon_max
            )));
        }
        if !(self.lat_min < self.lat_max) {
            return Err(invalid(format!(
                "lat_min ({}) must be below lat_max ({})",
                self.lat_min, self.lat_max
            )));
        }
        if self.lon_max - self.lon_min > 360.0 {
            return Err(invalid("Longitude span cannot exceed 360 degrees".to_string()));
        }
        if self.lat_min < -90.0 || self.lat_max > 90.0 {
            return Err(invalid(
                "Latitude must be in the range -90 to 90".to_string(),
            ));
        }
        Ok(())
    }

    /// Width over height of the plate carrée window
    pub fn aspect_ratio(&self) -> f64 {
        (self.lon_max - self.lon_min) / (self.lat_max - self.lat_min)
    }
}

impl FromStr for Extent {
    type Err = CharneyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Extent::parse(s)
    }
}

/// Rendering options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Map width in pixels; the height follows from the extent
    pub width: u32,
    /// Geographic window
    pub extent: Extent,
    /// Draw a horizontal colorbar below the map
    pub colorbar: bool,
    /// Paint masked cells as background instead of their (blank) value
    pub blank_missing: bool,
}

/// Output image formats supported for figures
pub fn output_format(path: &Path) -> Result<ImageFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("png") => Ok(ImageFormat::Png),
        Some("jpg") | Some("jpeg") => Ok(ImageFormat::Jpeg),
        _ => Err(CharneyError::InvalidParameter {
            param: "output".to_string(),
            message: format!(
                "Unsupported output format for {}. Must be .png, .jpg or .jpeg",
                path.display()
            ),
        }),
    }
}

/// Render the field as filled contours.
pub fn render(
    field: &SmoothedField,
    levels: &ContourLevels,
    colormap: &dyn Colormap,
    options: &RenderOptions,
) -> Result<RgbImage> {
    options.extent.validate()?;
    if options.width < 2 {
        return Err(CharneyError::ImageGeneration {
            message: format!("Image width must be at least 2 pixels, got {}", options.width),
        });
    }

    let (rows, cols) = field.shape();
    if rows < 2 || cols < 2 || field.lat.len() != rows || field.lon.len() != cols {
        return Err(CharneyError::ImageGeneration {
            message: format!("Cannot render a {rows}x{cols} field"),
        });
    }

    // contourf-style coloring: each band takes the color at its midpoint
    let band_colors: Vec<Rgb<u8>> = levels
        .band_midpoints()
        .iter()
        .map(|&mid| to_pixel(composite_over(colormap.rgba(levels.normalize(mid)), WHITE)))
        .collect();

    let width = options.width;
    let map_height = ((width as f64 / options.extent.aspect_ratio()).round() as u32).max(1);
    let (gap, bar_height) = if options.colorbar {
        ((map_height / 20).max(4), (map_height / 16).max(6))
    } else {
        (0, 0)
    };
    let height = map_height + if options.colorbar { 2 * gap + bar_height } else { 0 };

    let mut img: RgbImage = ImageBuffer::from_pixel(width, height, BACKGROUND);

    let extent = options.extent;
    let mut blank = 0usize;
    for y in 0..map_height {
        // Image row 0 is the northern edge
        let lat = extent.lat_max - (y as f64 + 0.5) / map_height as f64 * (extent.lat_max - extent.lat_min);
        for x in 0..width {
            let lon = extent.lon_min + (x as f64 + 0.5) / width as f64 * (extent.lon_max - extent.lon_min);

            let pixel = sample(field, lat, lon)
                .filter(|s| !(options.blank_missing && s.masked))
                .and_then(|s| levels.band_index(s.value))
                .map(|band| band_colors[band]);

            match pixel {
                Some(color) => img.put_pixel(x, y, color),
                None => blank += 1,
            }
        }
    }

    if options.colorbar {
        draw_colorbar(&mut img, levels, &band_colors, map_height + gap, bar_height);
    }

    debug!(
        width = width,
        height = height,
        bands = band_colors.len(),
        blank_pixels = blank,
        "Rendered contour map"
    );

    Ok(img)
}

/// Write a rendered figure, choosing the format from the file extension
pub fn save(img: &RgbImage, path: &Path) -> Result<()> {
    let format = output_format(path)?;
    img.save_with_format(path, format)?;
    info!(path = %path.display(), width = img.width(), height = img.height(), "Saved figure");
    Ok(())
}

/// A field value looked up at a geographic location
#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    value: f64,
    masked: bool,
}

/// Bilinear lookup on the fine grid; `None` outside the field.
fn sample(field: &SmoothedField, lat: f64, lon: f64) -> Option<Sample> {
    let (rows, cols) = field.shape();
    let lat0 = field.lat[0];
    let lat1 = field.lat[rows - 1];
    let lon0 = field.lon[0];
    let lon1 = field.lon[cols - 1];

    let fi = (lat - lat0) / (lat1 - lat0) * (rows - 1) as f64;
    let fj = (wrap_longitude(lon, lon0) - lon0) / (lon1 - lon0) * (cols - 1) as f64;
    if !(0.0..=(rows - 1) as f64).contains(&fi) || !(0.0..=(cols - 1) as f64).contains(&fj) {
        return None;
    }

    let i0 = (fi.floor() as usize).min(rows - 2);
    let j0 = (fj.floor() as usize).min(cols - 2);
    let (wi0, wi1) = linear_weight(fi - i0 as f64);
    let (wj0, wj1) = linear_weight(fj - j0 as f64);

    let v = &field.values;
    let value = wi0 * (wj0 * v[[i0, j0]] + wj1 * v[[i0, j0 + 1]])
        + wi1 * (wj0 * v[[i0 + 1, j0]] + wj1 * v[[i0 + 1, j0 + 1]]);
    let masked = field.mask[[fi.round() as usize, fj.round() as usize]];

    Some(Sample { value, masked })
}

fn draw_colorbar(
    img: &mut RgbImage,
    levels: &ContourLevels,
    band_colors: &[Rgb<u8>],
    top: u32,
    bar_height: u32,
) {
    let width = img.width();
    let margin = width / 10;
    let bar_width = width.saturating_sub(2 * margin).max(1);
    let span = levels.max() - levels.min();

    for x in 0..bar_width {
        let value = levels.min() + (x as f64 + 0.5) / bar_width as f64 * span;
        let Some(band) = levels.band_index(value) else {
            continue;
        };
        for y in top..top + bar_height {
            img.put_pixel(margin + x, y, band_colors[band]);
        }
    }

    // Outline
    let right = (margin + bar_width).min(width) - 1;
    let bottom = top + bar_height - 1;
    for x in margin..=right {
        img.put_pixel(x, top, OUTLINE);
        img.put_pixel(x, bottom, OUTLINE);
    }
    for y in top..=bottom {
        img.put_pixel(margin, y, OUTLINE);
        img.put_pixel(right, y, OUTLINE);
    }
}

fn to_pixel(rgb: [f64; 3]) -> Rgb<u8> {
    let [r, g, b, _] = to_rgba8([rgb[0], rgb[1], rgb[2], 1.0]);
    Rgb([r, g, b])
}
