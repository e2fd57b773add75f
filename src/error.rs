//! Error types shared by the simulators, configuration loading and chart
//! rendering.

use thiserror::Error;

use crate::distributions::DistributionError;

/// Errors returned by the simulators.
///
/// Every variant is raised before the simulation loop starts; a simulation
/// that begins always runs to completion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A caller-supplied parameter is outside its valid range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A theoretical distribution could not be constructed.
    #[error(transparent)]
    Distribution(#[from] DistributionError),
}

impl SimulationError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SimulationError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;

/// Errors raised while loading an experiment configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors raised while drawing figures onto a chart surface.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("chart output failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("chart serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
