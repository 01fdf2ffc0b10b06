//! Image testing utilities.

use image::{ImageFormat, RgbImage};
use std::path::Path;

const WHITE: [u8; 3] = [255, 255, 255];

/// Load a written figure as RGB
pub fn load_rgb(path: &Path) -> RgbImage {
    image::open(path)
        .unwrap_or_else(|e| panic!("Failed to open {}: {}", path.display(), e))
        .to_rgb8()
}

/// Check that the bytes on disk are in the expected format
pub fn assert_image_format(path: &Path, expected_format: ImageFormat) {
    let bytes = std::fs::read(path).unwrap();
    let actual = image::guess_format(&bytes).expect("Could not detect image format");
    assert_eq!(actual, expected_format, "Unexpected format for {}", path.display());
}

/// Fraction of pixels in rows `rows` that are not background white
pub fn painted_fraction(image: &RgbImage, rows: std::ops::Range<u32>) -> f64 {
    let mut painted = 0usize;
    let mut total = 0usize;
    for y in rows {
        for x in 0..image.width() {
            total += 1;
            if image.get_pixel(x, y).0 != WHITE {
                painted += 1;
            }
        }
    }
    painted as f64 / total.max(1) as f64
}

/// Whether every pixel of column `x` within `rows` is painted
pub fn column_painted(image: &RgbImage, x: u32, rows: std::ops::Range<u32>) -> bool {
    rows.into_iter().all(|y| image.get_pixel(x, y).0 != WHITE)
}
