//! Contour level lists.
//!
//! Levels are the boundaries between filled contour bands. They must be strictly
//! ascending. A narrow `(-eps, +eps)` pair can be inserted so that values that are
//! exactly zero (including blanked, insignificant cells) fall into a band of
//! their own, which the shifted colormap renders as near-white.

use serde::{Deserialize, Serialize};

use crate::error::{CharneyError, Result};
use crate::interpolation::common::linspace;

/// A strictly ascending list of contour levels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContourLevels(Vec<f64>);

impl ContourLevels {
    /// Validate and wrap a level list
    pub fn new(levels: Vec<f64>) -> Result<Self> {
        if levels.len() < 2 {
            return Err(CharneyError::invalid_parameter(
                "levels",
                format!("at least two levels are needed, got {}", levels.len()),
            ));
        }
        if levels.iter().any(|l| !l.is_finite()) {
            return Err(CharneyError::invalid_parameter(
                "levels",
                "levels must be finite",
            ));
        }
        if let Some(w) = levels.windows(2).find(|w| w[1] <= w[0]) {
            return Err(CharneyError::invalid_parameter(
                "levels",
                format!("levels must be strictly increasing ({} then {})", w[0], w[1]),
            ));
        }
        Ok(Self(levels))
    }

    /// `num` evenly spaced levels from `start` to `stop` inclusive
    pub fn linspace(start: f64, stop: f64, num: usize) -> Result<Self> {
        Self::new(linspace(start, stop, num, true))
    }

    /// Drop the first `n` levels
    pub fn skip_first(self, n: usize) -> Result<Self> {
        Self::new(self.0.into_iter().skip(n).collect())
    }

    /// Insert the `-eps`, `+eps` pair that isolates zero in its own band
    pub fn with_zero_band(self, eps: f64) -> Result<Self> {
        if !(eps > 0.0 && eps.is_finite()) {
            return Err(CharneyError::invalid_parameter(
                "zero_band",
                format!("half-width must be positive, got {eps}"),
            ));
        }
        let mut levels = self.0;
        levels.push(-eps);
        levels.push(eps);
        levels.sort_by(f64::total_cmp);
        Self::new(levels)
    }

    /// The levels as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of levels
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, a level list holds at least two levels
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowest level
    pub fn min(&self) -> f64 {
        self.0[0]
    }

    /// Highest level
    pub fn max(&self) -> f64 {
        self.0[self.0.len() - 1]
    }

    /// Number of bands between consecutive levels
    pub fn band_count(&self) -> usize {
        self.0.len() - 1
    }

    /// Band containing `value`, `None` outside the level range.
    ///
    /// Bands are half-open `[l_k, l_k+1)` except the last, which includes the top
    /// level.
    pub fn band_index(&self, value: f64) -> Option<usize> {
        if value.is_nan() || value < self.min() || value > self.max() {
            return None;
        }
        if value == self.max() {
            return Some(self.band_count() - 1);
        }
        Some(self.0.partition_point(|&l| l <= value) - 1)
    }

    /// Midpoint of every band
    pub fn band_midpoints(&self) -> Vec<f64> {
        self.0.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }

    /// Position of `value` within the level range, in [0, 1] for values inside
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max() - self.min();
        if span > 0.0 {
            (value - self.min()) / span
        } else {
            0.5
        }
    }
}

/// How a level list is generated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LevelSpec {
    /// Evenly spaced levels, optionally dropping the first `skip`
    Linspace {
        start: f64,
        stop: f64,
        num: usize,
        #[serde(default)]
        skip: usize,
    },
    /// An explicit list
    Explicit { values: Vec<f64> },
}

/// Level configuration: a generator plus an optional zero band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelsConfig {
    /// Level generator
    #[serde(flatten)]
    pub spec: LevelSpec,

    /// Half-width of the zero band, if any
    #[serde(default)]
    pub zero_band: Option<f64>,
}

impl LevelsConfig {
    /// Build the level list
    pub fn build(&self) -> Result<ContourLevels> {
        let levels = match &self.spec {
            LevelSpec::Linspace {
                start,
                stop,
                num,
                skip,
            } => ContourLevels::linspace(*start, *stop, *num)?.skip_first(*skip)?,
            LevelSpec::Explicit { values } => ContourLevels::new(values.clone())?,
        };

        match self.zero_band {
            Some(eps) => levels.with_zero_band(eps),
            None => Ok(levels),
        }
    }
}
