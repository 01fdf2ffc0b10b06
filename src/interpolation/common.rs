//! Common utilities for interpolation algorithms.
//!
//! This module provides shared functionality used by the resampling kernels:
//! boundary handling, index clamping and evenly spaced sample positions.

/// Reflect an integer index into `0..len` with whole-sample symmetry.
///
/// The sequence `a b c d` is extended as `... c b | a b c d | c b ...`, the edge
/// sample is not repeated.
pub fn mirror_index(index: isize, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let folded = index.rem_euclid(period);
    if folded >= len as isize {
        (period - folded) as usize
    } else {
        folded as usize
    }
}

/// Clamp an index to valid bounds
pub fn clamp_index(index: f64, size: usize) -> f64 {
    index.max(0.0).min((size - 1) as f64)
}

/// Get the weight for linear interpolation
pub fn linear_weight(fraction: f64) -> (f64, f64) {
    (1.0 - fraction, fraction)
}

/// Evenly spaced values over `[start, stop]` (or `[start, stop)` without `endpoint`).
///
/// Values are computed as `start + i * step` and, with `endpoint`, the last value
/// is exactly `stop`.
pub fn linspace(start: f64, stop: f64, num: usize, endpoint: bool) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let div = if endpoint { num - 1 } else { num } as f64;
            let step = (stop - start) / div;
            let mut values: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
            if endpoint {
                values[num - 1] = stop;
            }
            values
        }
    }
}

/// Fractional source indices sampled by a zoom from `in_len` to `out_len` points.
///
/// The first and last output samples land exactly on the first and last input
/// samples.
pub fn zoom_coordinates(in_len: usize, out_len: usize) -> Vec<f64> {
    if out_len <= 1 || in_len <= 1 {
        return vec![0.0; out_len];
    }
    let scale = (in_len - 1) as f64 / (out_len - 1) as f64;
    (0..out_len).map(|i| i as f64 * scale).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_index() {
        // a b c d -> c b | a b c d | c b
        assert_eq!(mirror_index(-2, 4), 2);
        assert_eq!(mirror_index(-1, 4), 1);
        assert_eq!(mirror_index(0, 4), 0);
        assert_eq!(mirror_index(3, 4), 3);
        assert_eq!(mirror_index(4, 4), 2);
        assert_eq!(mirror_index(5, 4), 1);
        assert_eq!(mirror_index(6, 4), 0);
        assert_eq!(mirror_index(7, 1), 0);
    }

    #[test]
    fn test_clamp_index() {
        assert_eq!(clamp_index(-1.0, 10), 0.0);
        assert_eq!(clamp_index(5.5, 10), 5.5);
        assert_eq!(clamp_index(15.0, 10), 9.0);
    }

    #[test]
    fn test_linear_weight() {
        let (w0, w1) = linear_weight(0.3);
        assert!((w0 - 0.7).abs() < 1e-10);
        assert!((w1 - 0.3).abs() < 1e-10);
        assert!((w0 + w1 - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 5, true), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(0.0, 1.0, 4, false), vec![0.0, 0.25, 0.5, 0.75]);
        assert_eq!(linspace(3.0, 7.0, 1, true), vec![3.0]);
        assert!(linspace(0.0, 1.0, 0, true).is_empty());
    }

    #[test]
    fn test_zoom_coordinates() {
        let coords = zoom_coordinates(3, 6);
        assert_eq!(coords.len(), 6);
        assert_eq!(coords[0], 0.0);
        assert!((coords[5] - 2.0).abs() < 1e-12);
        assert!((coords[1] - 0.4).abs() < 1e-12);
    }
}
