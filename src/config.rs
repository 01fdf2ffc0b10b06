//! Configuration management for charney.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments, with environment variable fallbacks (highest priority)
//! 2. JSON config file
//! 3. Named preset
//! 4. Default values (lowest priority)
//!
//! A JSON file overrides whole sections: a `colormap` section in the file replaces
//! the preset's colormap section, with unspecified fields taking their defaults.

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::colormaps::{get_colormap, ColormapRemapper, ZeroBandAnchor};
use crate::error::{CharneyError, Result};
use crate::grid::SmoothingParams;
use crate::levels::{LevelSpec, LevelsConfig};
use crate::relative::MissingPolicy;
use crate::render::{output_format, Extent, RenderOptions};

/// Command-line arguments for charney
#[derive(Parser, Debug)]
#[command(name = "charney")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the NetCDF file holding the difference field
    pub input: Option<PathBuf>,

    /// Figure variant to start from
    #[arg(short, long, env = "CHARNEY_PRESET", value_enum)]
    pub preset: Option<Preset>,

    /// Path to JSON configuration file
    #[arg(short, long, env = "CHARNEY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output image path (.png, .jpg or .jpeg)
    #[arg(short, long, env = "CHARNEY_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Control run used for relative change
    #[arg(long, env = "CHARNEY_CONTROL")]
    pub control: Option<PathBuf>,

    /// Name of the difference variable
    #[arg(long, env = "CHARNEY_VARIABLE")]
    pub variable: Option<String>,

    /// Map extent as "lon_min,lon_max,lat_min,lat_max"
    #[arg(long, env = "CHARNEY_EXTENT", value_parser = parse_extent, allow_hyphen_values = true)]
    pub extent: Option<Extent>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CHARNEY_LOG_LEVEL")]
    pub log_level: Option<String>,
}

fn parse_extent(s: &str) -> std::result::Result<Extent, String> {
    Extent::parse(s).map_err(|e| e.to_string())
}

/// Named starting points reproducing the two published figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Absolute precipitation difference in mm/day
    #[default]
    Absolute,
    /// Precipitation difference relative to a control run, in percent
    Relative,
}

impl Preset {
    /// The full configuration of this preset
    pub fn config(self) -> Config {
        match self {
            Preset::Absolute => Config {
                input: InputConfig::default(),
                mode: Mode::Absolute,
                control: None,
                colormap: ColormapConfig {
                    source: default_colormap(),
                    start: 2.0 / 8.0,
                    midpoint: Some(4.0 / 8.0),
                    stop: 1.0,
                    zero_band_alpha: Some(0.2),
                    anchor: ZeroBandAnchor::SourceCenter,
                },
                smoothing: SmoothingParams {
                    upsample_factor: 2,
                    interpolation_order: 2,
                },
                levels: LevelsConfig {
                    spec: LevelSpec::Linspace {
                        start: -4.0,
                        stop: 4.0,
                        num: 17,
                        skip: 4,
                    },
                    zero_band: Some(0.2e-2),
                },
                render: RenderConfig::default(),
                log_level: default_log_level(),
            },
            Preset::Relative => Config {
                input: InputConfig::default(),
                mode: Mode::Relative,
                control: Some(ControlConfig::default()),
                colormap: ColormapConfig {
                    source: default_colormap(),
                    start: 4.0 / 12.0,
                    midpoint: Some(6.0 / 12.0),
                    stop: 1.0,
                    zero_band_alpha: None,
                    anchor: ZeroBandAnchor::default(),
                },
                smoothing: SmoothingParams {
                    upsample_factor: 2,
                    interpolation_order: 3,
                },
                levels: LevelsConfig {
                    spec: LevelSpec::Linspace {
                        start: -200.0,
                        stop: 600.0,
                        num: 33,
                        skip: 0,
                    },
                    zero_band: None,
                },
                render: RenderConfig {
                    output: PathBuf::from("precip_relative.png"),
                    ..RenderConfig::default()
                },
                log_level: default_log_level(),
            },
        }
    }
}

/// What quantity is plotted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// The difference field as stored
    #[default]
    Absolute,
    /// Percentage change against the control climatology
    Relative,
}

/// Where the difference field comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// NetCDF file; usually given on the command line
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Difference variable
    #[serde(default = "default_variable")]
    pub variable: String,

    /// Latitude coordinate variable
    #[serde(default = "default_lat")]
    pub lat: String,

    /// Longitude coordinate variable
    #[serde(default = "default_lon")]
    pub lon: String,
}

/// Control run used by relative mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlConfig {
    /// NetCDF file of the control run
    #[serde(default = "default_control_path")]
    pub path: PathBuf,

    /// (time, lat, lon) variables summed into total precipitation
    #[serde(default = "default_components")]
    pub components: Vec<String>,

    /// Spin-up time steps to drop before averaging
    #[serde(default = "default_skip_steps")]
    pub skip_steps: usize,

    /// Treatment of missing difference cells
    #[serde(default)]
    pub policy: MissingPolicy,
}

/// Colormap remap parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColormapConfig {
    /// Source colormap name, `_r` for reversed
    #[serde(default = "default_colormap")]
    pub source: String,

    #[serde(default)]
    pub start: f64,

    /// Where the source center lands; `None` centers zero between the outer levels
    #[serde(default)]
    pub midpoint: Option<f64>,

    #[serde(default = "default_stop")]
    pub stop: f64,

    #[serde(default)]
    pub zero_band_alpha: Option<f64>,

    #[serde(default)]
    pub anchor: ZeroBandAnchor,
}

/// Figure output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Output image path
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Map width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Geographic window
    #[serde(default = "default_extent")]
    pub extent: Extent,

    /// Draw a colorbar below the map
    #[serde(default = "default_colorbar")]
    pub colorbar: bool,

    /// Paint masked cells as background
    #[serde(default)]
    pub blank_missing: bool,
}

impl RenderConfig {
    /// Options handed to the renderer
    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            width: self.width,
            extent: self.extent,
            colorbar: self.colorbar,
            blank_missing: self.blank_missing,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub input: InputConfig,
    pub mode: Mode,
    #[serde(default)]
    pub control: Option<ControlConfig>,
    pub colormap: ColormapConfig,
    pub smoothing: SmoothingParams,
    pub levels: LevelsConfig,
    pub render: RenderConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// A JSON configuration file; every section is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub preset: Option<Preset>,
    #[serde(default)]
    pub input: Option<InputConfig>,
    #[serde(default)]
    pub mode: Option<Mode>,
    #[serde(default)]
    pub control: Option<ControlConfig>,
    #[serde(default)]
    pub colormap: Option<ColormapConfig>,
    #[serde(default)]
    pub smoothing: Option<SmoothingParams>,
    #[serde(default)]
    pub levels: Option<LevelsConfig>,
    #[serde(default)]
    pub render: Option<RenderConfig>,
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Resolve configuration from parsed arguments
    pub fn from_args(args: Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => Self::load_from_file(path)?,
            None => ConfigFile::default(),
        };

        // The preset is the base layer, so it is resolved first
        let preset = args.preset.or(file.preset).unwrap_or_default();
        let mut config = preset.config();
        config.merge(file);

        // Override with command-line arguments
        if let Some(input) = args.input {
            config.input.path = Some(input);
        }
        if let Some(variable) = args.variable {
            config.input.variable = variable;
        }
        if let Some(output) = args.output {
            config.render.output = output;
        }
        if let Some(extent) = args.extent {
            config.render.extent = extent;
        }
        if let Some(control) = args.control {
            config
                .control
                .get_or_insert_with(ControlConfig::default)
                .path = control;
        }
        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }

        Ok(config)
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<ConfigFile> {
        let content = std::fs::read_to_string(path)?;
        let file: ConfigFile = serde_json::from_str(&content)?;
        Ok(file)
    }

    /// Merge a config file into this one (the file takes precedence)
    fn merge(&mut self, other: ConfigFile) {
        if let Some(input) = other.input {
            self.input = input;
        }
        if let Some(mode) = other.mode {
            self.mode = mode;
        }
        if other.control.is_some() {
            self.control = other.control;
        }
        if let Some(colormap) = other.colormap {
            self.colormap = colormap;
        }
        if let Some(smoothing) = other.smoothing {
            self.smoothing = smoothing;
        }
        if let Some(levels) = other.levels {
            self.levels = levels;
        }
        if let Some(render) = other.render {
            self.render = render;
        }
        if let Some(log_level) = other.log_level {
            self.log_level = log_level;
        }
    }

    /// Input file path, required before running
    pub fn input_path(&self) -> Result<&Path> {
        self.input.path.as_deref().ok_or_else(|| CharneyError::Config {
            message: "No input file given".to_string(),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(CharneyError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        self.input_path()?;
        if self.input.variable.is_empty() {
            return Err(CharneyError::Config {
                message: "Input variable name cannot be empty".to_string(),
            });
        }

        if self.mode == Mode::Relative {
            match &self.control {
                None => {
                    return Err(CharneyError::Config {
                        message: "Relative mode needs a control section".to_string(),
                    });
                }
                Some(control) if control.components.is_empty() => {
                    return Err(CharneyError::Config {
                        message: "Control run needs at least one component".to_string(),
                    });
                }
                Some(_) => {}
            }
        }

        get_colormap(&self.colormap.source).map_err(|e| CharneyError::Config {
            message: e.to_string(),
        })?;
        // A derived midpoint is checked once the levels are known
        ColormapRemapper::new(
            self.colormap.start,
            self.colormap.midpoint.unwrap_or(0.5),
            self.colormap.stop,
            self.colormap.zero_band_alpha,
        )?;

        self.smoothing.validate()?;
        self.levels.build()?;

        self.render.extent.validate()?;
        if self.render.width < 2 {
            return Err(CharneyError::Config {
                message: format!("Image width must be at least 2, got {}", self.render.width),
            });
        }
        output_format(&self.render.output)?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Preset::default().config()
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: None,
            variable: default_variable(),
            lat: default_lat(),
            lon: default_lon(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            path: default_control_path(),
            components: default_components(),
            skip_steps: default_skip_steps(),
            policy: MissingPolicy::default(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            width: default_width(),
            extent: default_extent(),
            colorbar: default_colorbar(),
            blank_missing: false,
        }
    }
}

// Default value functions for serde
fn default_variable() -> String {
    "difference_of_prec".to_string()
}

fn default_lat() -> String {
    "lat".to_string()
}

fn default_lon() -> String {
    "lon".to_string()
}

fn default_control_path() -> PathBuf {
    PathBuf::from("attm_ctl.nc")
}

fn default_components() -> Vec<String> {
    vec!["precls".to_string(), "precnv".to_string()]
}

// 50 years of monthly output
fn default_skip_steps() -> usize {
    600
}

fn default_colormap() -> String {
    "balance_r".to_string()
}

fn default_stop() -> f64 {
    1.0
}

fn default_output() -> PathBuf {
    PathBuf::from("precip.png")
}

fn default_width() -> u32 {
    1600
}

fn default_extent() -> Extent {
    Extent {
        lon_min: -25.0,
        lon_max: 55.0,
        lat_min: -2.0,
        lat_max: 39.0,
    }
}

fn default_colorbar() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
