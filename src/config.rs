//! Experiment configuration, read from TOML.
//!
//! Every field has a default, so a partial file (or none at all) is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::ConfigError;
use crate::simulation::GaltonVariant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipfConfig {
    #[serde(default = "ZipfConfig::default_num_rounds")]
    pub num_rounds: usize,
    #[serde(default = "ZipfConfig::default_num_clips_k")]
    pub num_clips_k: f64,
}

impl ZipfConfig {
    fn default_num_rounds() -> usize {
        10_000
    }
    fn default_num_clips_k() -> f64 {
        1.6
    }
}

impl Default for ZipfConfig {
    fn default() -> Self {
        Self {
            num_rounds: Self::default_num_rounds(),
            num_clips_k: Self::default_num_clips_k(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaltonConfig {
    #[serde(default = "GaltonConfig::default_num_layers")]
    pub num_layers: usize,
    #[serde(default = "GaltonConfig::default_num_balls")]
    pub num_balls: u64,
    #[serde(default)]
    pub variant: GaltonVariant,
}

impl GaltonConfig {
    fn default_num_layers() -> usize {
        20
    }
    fn default_num_balls() -> u64 {
        100_000
    }
}

impl Default for GaltonConfig {
    fn default() -> Self {
        Self {
            num_layers: Self::default_num_layers(),
            num_balls: Self::default_num_balls(),
            variant: GaltonVariant::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CltConfig {
    #[serde(default = "CltConfig::default_num_trials")]
    pub num_trials: usize,
    #[serde(default = "CltConfig::default_num_bins")]
    pub num_bins: usize,
    #[serde(default = "CltConfig::default_uniform_sample_sizes")]
    pub uniform_sample_sizes: Vec<usize>,
    #[serde(default = "CltConfig::default_exponential_sample_sizes")]
    pub exponential_sample_sizes: Vec<usize>,
}

impl CltConfig {
    fn default_num_trials() -> usize {
        10_000
    }
    fn default_num_bins() -> usize {
        100
    }
    fn default_uniform_sample_sizes() -> Vec<usize> {
        vec![1, 2, 5]
    }
    fn default_exponential_sample_sizes() -> Vec<usize> {
        vec![1, 2, 5, 50]
    }
}

impl Default for CltConfig {
    fn default() -> Self {
        Self {
            num_trials: Self::default_num_trials(),
            num_bins: Self::default_num_bins(),
            uniform_sample_sizes: Self::default_uniform_sample_sizes(),
            exponential_sample_sizes: Self::default_exponential_sample_sizes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalConfig {
    #[serde(default = "SurvivalConfig::default_num_rounds")]
    pub num_rounds: u64,
    #[serde(default = "SurvivalConfig::default_p")]
    pub p: f64,
    #[serde(default = "SurvivalConfig::default_num_players")]
    pub num_players: u64,
}

impl SurvivalConfig {
    fn default_num_rounds() -> u64 {
        10_000
    }
    fn default_p() -> f64 {
        0.001
    }
    fn default_num_players() -> u64 {
        10_000
    }
}

impl Default for SurvivalConfig {
    fn default() -> Self {
        Self {
            num_rounds: Self::default_num_rounds(),
            p: Self::default_p(),
            num_players: Self::default_num_players(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Length of the longest text bar.
    #[serde(default = "RenderConfig::default_width")]
    pub width: usize,
}

impl RenderConfig {
    fn default_width() -> usize {
        60
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Fixed RNG seed; a fresh one is drawn when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub zipf: ZipfConfig,
    #[serde(default)]
    pub galton: GaltonConfig,
    #[serde(default)]
    pub clt: CltConfig,
    #[serde(default)]
    pub survival: SurvivalConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

impl ExperimentConfig {
    /// Reads and parses `path`.
    ///
    /// # Errors
    /// [`ConfigError::Io`] if the file cannot be read, [`ConfigError::Parse`]
    /// if it is not valid TOML for this schema.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Like [`load`](Self::load), but logs the failure and returns the
    /// defaults instead.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!("{err}. Using defaults.");
                Self::default()
            }
        }
    }
}
