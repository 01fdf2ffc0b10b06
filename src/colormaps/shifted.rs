//! Midpoint-shifted colormaps.
//!
//! A diverging ramp puts its neutral color at 0.5. When the data range is not
//! symmetric around zero (say -2 to +4) the neutral color has to move so that it
//! still marks zero. [`ColormapRemapper`] samples a source ramp over
//! `[start, stop]` and re-indexes the samples so that the middle sample lands on
//! `midpoint` instead of 0.5, stretching one half of the ramp and compressing the
//! other.
//!
//! Optionally the samples around the center are made translucent, which renders
//! the "not significant" band as near-white when drawn over a white background.

use serde::{Deserialize, Serialize};

use super::colormap::{Colormap, Rgba};
use crate::error::{CharneyError, Result};
use crate::interpolation::common::linspace;

/// Number of samples taken from the source ramp
pub const SAMPLE_COUNT: usize = 257;

/// Samples placed below the midpoint; the rest cover `[midpoint, 1]`
const LOWER_COUNT: usize = 128;

/// Open window, in anchor coordinates, whose samples get the zero-band alpha
pub const ZERO_BAND_WINDOW: (f64, f64) = (0.49, 0.51);

/// What the zero-band window is measured against.
///
/// The window is only meaningful with [`SAMPLE_COUNT`] samples: it always covers
/// the same handful of samples around the center of the sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroBandAnchor {
    /// The sample's fractional index `k / 256` in the unstretched sampling. The
    /// center sample always qualifies, so the remapped ramp is translucent
    /// exactly at `midpoint`.
    #[default]
    SampleCenter,
    /// The position sampled from the source ramp. The translucent band follows
    /// the source ramp's own center, wherever the remap moves it.
    SourceCenter,
}

/// One stop of a single color channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStop {
    /// Position in [0, 1]
    pub position: f64,
    /// Channel value in [0, 1]
    pub value: f64,
}

/// All channels of a remapped colormap at one position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Position in [0, 1]
    pub position: f64,
    /// Red, green and blue in [0, 1]
    pub color: [f64; 3],
    /// Opacity in [0, 1]
    pub alpha: f64,
}

/// Piecewise-linear colormap built from per-channel stops
#[derive(Debug, Clone, PartialEq)]
pub struct RemappedColormap {
    name: String,
    red: Vec<ChannelStop>,
    green: Vec<ChannelStop>,
    blue: Vec<ChannelStop>,
    alpha: Vec<ChannelStop>,
}

impl RemappedColormap {
    /// Rename the colormap
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Red channel stops
    pub fn red(&self) -> &[ChannelStop] {
        &self.red
    }

    /// Green channel stops
    pub fn green(&self) -> &[ChannelStop] {
        &self.green
    }

    /// Blue channel stops
    pub fn blue(&self) -> &[ChannelStop] {
        &self.blue
    }

    /// Alpha channel stops
    pub fn alpha(&self) -> &[ChannelStop] {
        &self.alpha
    }

    /// Number of stops per channel
    pub fn len(&self) -> usize {
        self.red.len()
    }

    /// Whether the colormap has no stops
    pub fn is_empty(&self) -> bool {
        self.red.is_empty()
    }

    /// Iterate over the stops of all channels together
    pub fn stops(&self) -> impl Iterator<Item = ColorStop> + '_ {
        self.red
            .iter()
            .zip(&self.green)
            .zip(&self.blue)
            .zip(&self.alpha)
            .map(|(((r, g), b), a)| ColorStop {
                position: r.position,
                color: [r.value, g.value, b.value],
                alpha: a.value,
            })
    }
}

impl Colormap for RemappedColormap {
    fn rgba(&self, value: f64) -> Rgba {
        let x = value.clamp(0.0, 1.0);
        [
            eval_channel(&self.red, x),
            eval_channel(&self.green, x),
            eval_channel(&self.blue, x),
            eval_channel(&self.alpha, x),
        ]
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Linear interpolation between the stops bracketing `x`
fn eval_channel(stops: &[ChannelStop], x: f64) -> f64 {
    let Some(first) = stops.first() else {
        return 0.0;
    };
    let idx = stops.partition_point(|s| s.position <= x);
    if idx == 0 {
        return first.value;
    }
    if idx == stops.len() {
        return stops[idx - 1].value;
    }

    let lo = stops[idx - 1];
    let hi = stops[idx];
    let width = hi.position - lo.position;
    if width <= 0.0 {
        return hi.value;
    }
    lo.value + (x - lo.position) / width * (hi.value - lo.value)
}

/// Remaps a source ramp so that its center lands on a chosen midpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColormapRemapper {
    start: f64,
    midpoint: f64,
    stop: f64,
    zero_band_alpha: Option<f64>,
    anchor: ZeroBandAnchor,
}

impl ColormapRemapper {
    /// Validate the remap parameters.
    ///
    /// `start` and `stop` must lie in [0, 1] with `start < stop`, `midpoint`
    /// strictly inside (0, 1) and the zero-band alpha, if any, in [0, 1].
    pub fn new(start: f64, midpoint: f64, stop: f64, zero_band_alpha: Option<f64>) -> Result<Self> {
        let unit = 0.0..=1.0;
        if !unit.contains(&start) {
            return Err(CharneyError::invalid_parameter(
                "start",
                format!("must lie in [0, 1], got {start}"),
            ));
        }
        if !unit.contains(&stop) {
            return Err(CharneyError::invalid_parameter(
                "stop",
                format!("must lie in [0, 1], got {stop}"),
            ));
        }
        if start >= stop {
            return Err(CharneyError::invalid_parameter(
                "start",
                format!("must be below stop ({start} >= {stop})"),
            ));
        }
        if !(midpoint > 0.0 && midpoint < 1.0) {
            return Err(CharneyError::invalid_parameter(
                "midpoint",
                format!("must lie strictly between 0 and 1, got {midpoint}"),
            ));
        }
        if let Some(alpha) = zero_band_alpha {
            if !unit.contains(&alpha) {
                return Err(CharneyError::invalid_parameter(
                    "zero_band_alpha",
                    format!("must lie in [0, 1], got {alpha}"),
                ));
            }
        }

        Ok(Self {
            start,
            midpoint,
            stop,
            zero_band_alpha,
            anchor: ZeroBandAnchor::default(),
        })
    }

    /// Choose what the zero-band window is measured against
    pub fn with_anchor(mut self, anchor: ZeroBandAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// The configured midpoint
    pub fn midpoint(&self) -> f64 {
        self.midpoint
    }

    /// Sample `source` and build the remapped ramp.
    pub fn build(&self, source: &dyn Colormap) -> RemappedColormap {
        let regular = linspace(self.start, self.stop, SAMPLE_COUNT, true);
        let mut shifted = linspace(0.0, self.midpoint, LOWER_COUNT, false);
        shifted.extend(linspace(self.midpoint, 1.0, SAMPLE_COUNT - LOWER_COUNT, true));

        let mut cmap = RemappedColormap {
            name: "shifted".to_string(),
            red: Vec::with_capacity(SAMPLE_COUNT),
            green: Vec::with_capacity(SAMPLE_COUNT),
            blue: Vec::with_capacity(SAMPLE_COUNT),
            alpha: Vec::with_capacity(SAMPLE_COUNT),
        };

        let last = (SAMPLE_COUNT - 1) as f64;
        for (k, (&ri, &si)) in regular.iter().zip(&shifted).enumerate() {
            let [r, g, b, mut a] = source.rgba(ri);

            let anchor = match self.anchor {
                ZeroBandAnchor::SampleCenter => k as f64 / last,
                ZeroBandAnchor::SourceCenter => ri,
            };
            if let Some(alpha) = self.zero_band_alpha {
                if anchor > ZERO_BAND_WINDOW.0 && anchor < ZERO_BAND_WINDOW.1 {
                    a = alpha;
                }
            }

            cmap.red.push(ChannelStop { position: si, value: r });
            cmap.green.push(ChannelStop { position: si, value: g });
            cmap.blue.push(ChannelStop { position: si, value: b });
            cmap.alpha.push(ChannelStop { position: si, value: a });
        }

        cmap
    }
}

/// Build a remapped colormap with the default zero-band anchor.
pub fn build(
    source: &dyn Colormap,
    start: f64,
    midpoint: f64,
    stop: f64,
    zero_band_alpha: Option<f64>,
) -> Result<RemappedColormap> {
    Ok(ColormapRemapper::new(start, midpoint, stop, zero_band_alpha)?.build(source))
}

/// Build a remapped colormap with an explicit zero-band anchor.
pub fn build_with_anchor(
    source: &dyn Colormap,
    start: f64,
    midpoint: f64,
    stop: f64,
    zero_band_alpha: Option<f64>,
    anchor: ZeroBandAnchor,
) -> Result<RemappedColormap> {
    Ok(ColormapRemapper::new(start, midpoint, stop, zero_band_alpha)?
        .with_anchor(anchor)
        .build(source))
}

/// Midpoint that puts the ramp center on zero for data spanning `[min, max]`.
///
/// Computed as `1 - max / (max + |min|)`. A zero-width range gives 0.5; a range
/// that does not straddle zero has no interior midpoint and is rejected.
pub fn centered_midpoint(min: f64, max: f64) -> Result<f64> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(CharneyError::invalid_parameter(
            "midpoint",
            format!("invalid data range [{min}, {max}]"),
        ));
    }

    let span = max + min.abs();
    if span == 0.0 || min == max {
        return Ok(0.5);
    }

    let midpoint = 1.0 - max / span;
    if min < 0.0 && max > 0.0 && midpoint > 0.0 && midpoint < 1.0 {
        Ok(midpoint)
    } else {
        Err(CharneyError::invalid_parameter(
            "midpoint",
            format!("data range [{min}, {max}] does not straddle zero"),
        ))
    }
}
