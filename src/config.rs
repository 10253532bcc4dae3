// src/config.rs
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Probability above which a pixel is reported.
pub const DEFAULT_THRESHOLD: f64 = 0.5;
/// Number of trailing sensor rows averaged into the summary vector.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;
/// Denominator stabilizer for NDVI, EVI, NDWI, SR and GNDVI.
pub const DEFAULT_EPSILON: f64 = 1e-3;
pub const DEFAULT_MODEL_PATH: &str = "models/fire_model.json";

/// 1-based band assignment within the input raster.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandIndices {
    #[serde(default = "default_red")]
    pub red: usize,
    #[serde(default = "default_green")]
    pub green: usize,
    #[serde(default = "default_blue")]
    pub blue: usize,
    #[serde(default = "default_nir")]
    pub nir: usize,
    /// Reserved. Accepted for compatibility with existing band layouts but
    /// never read.
    #[serde(default = "default_mask")]
    pub mask: usize,
}

fn default_red() -> usize {
    1
}

fn default_green() -> usize {
    2
}

fn default_blue() -> usize {
    3
}

fn default_nir() -> usize {
    4
}

fn default_mask() -> usize {
    5
}

impl Default for BandIndices {
    fn default() -> Self {
        Self {
            red: default_red(),
            green: default_green(),
            blue: default_blue(),
            nir: default_nir(),
            mask: default_mask(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    #[serde(default)]
    pub bands: BandIndices,
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_PATH)
}

fn default_history_window() -> usize {
    DEFAULT_HISTORY_WINDOW
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            model_path: default_model_path(),
            bands: BandIndices::default(),
            history_window: default_history_window(),
            epsilon: default_epsilon(),
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}
