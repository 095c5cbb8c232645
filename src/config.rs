//! Configuration Module
//! Output image settings and log level, optionally read from a JSON file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the JSON configuration file.
pub const CONFIG_ENV: &str = "CHARTIFY_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    pub chart: ChartConfig,
    pub logging: LoggingConfig,
}

/// Output image settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub output_path: PathBuf,
    pub width_inches: f64,
    pub height_inches: f64,
    pub dpi: u32,
    pub histogram_bins: usize,
    /// Open the written image in the system viewer.
    pub show: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("data_visualizations.png"),
            width_inches: 15.0,
            height_inches: 12.0,
            dpi: 300,
            histogram_bins: 15,
            show: true,
        }
    }
}

impl ChartConfig {
    /// Largest accepted image side, in pixels.
    pub const MAX_SIDE_PIXELS: u32 = 10_000;

    /// Whether `pixel_size` gives a drawable image no larger than
    /// [`Self::MAX_SIDE_PIXELS`] per side.
    pub fn fits(&self) -> bool {
        let (w, h) = self.pixel_size();
        (1..=Self::MAX_SIDE_PIXELS).contains(&w) && (1..=Self::MAX_SIDE_PIXELS).contains(&h)
    }

    /// Image size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        (
            (self.width_inches * dpi).round() as u32,
            (self.height_inches * dpi).round() as u32,
        )
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `env_logger` filter; `RUST_LOG` still wins.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file. Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file named by `CHARTIFY_CONFIG`, or fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let chart = &self.chart;
        if chart.dpi == 0 {
            return Err(ConfigError::Invalid("dpi must be positive".into()));
        }
        if !(chart.width_inches > 0.0 && chart.height_inches > 0.0) {
            return Err(ConfigError::Invalid(
                "figure width and height must be positive".into(),
            ));
        }
        if !chart.fits() {
            let (w, h) = chart.pixel_size();
            return Err(ConfigError::Invalid(format!(
                "figure of {w}x{h} pixels is outside 1..={} per side",
                ChartConfig::MAX_SIDE_PIXELS
            )));
        }
        if chart.histogram_bins == 0 {
            return Err(ConfigError::Invalid("histogram_bins must be positive".into()));
        }
        Ok(())
    }
}
