//! Assertion utilities for testing.
//!
//! Floating-point comparisons and checks on smoothed fields.

use charney::SmoothedField;

/// Default epsilon for floating-point comparisons
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Assert that two floating-point values are approximately equal.
///
/// # Panics
///
/// Panics if the absolute difference between `actual` and `expected` is greater than `epsilon`.
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: Option<f64>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    let diff = (actual - expected).abs();

    assert!(
        diff <= epsilon,
        "Values not approximately equal: actual = {}, expected = {}, diff = {}, epsilon = {}",
        actual,
        expected,
        diff,
        epsilon
    );
}

/// Assert that every fine cell of a masked coarse cell is masked and blank.
///
/// `coarse_missing(i, j)` answers for the coarse grid extended by the cyclic
/// column.
pub fn assert_blocks_masked(field: &SmoothedField, coarse_missing: impl Fn(usize, usize) -> bool) {
    let factor = field.upsample_factor;
    for ((i, j), &masked) in field.mask.indexed_iter() {
        let expected = coarse_missing(i / factor, j / factor);
        assert_eq!(
            masked, expected,
            "Mask mismatch at fine cell ({}, {}), coarse cell ({}, {})",
            i,
            j,
            i / factor,
            j / factor
        );
        if masked {
            assert_eq!(field.values[[i, j]], 0.0, "Masked cell ({}, {}) is not blank", i, j);
        }
    }
}
