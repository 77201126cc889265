//! Run configuration.
//!
//! ## Example: TOML configuration
//!
//! ```toml
//! [simulation]
//! lanes = 3
//!
//! [simulation.termination]
//! policy = "horizon"   # or "drained" (the default)
//! margin = 1000.0
//!
//! [workload]
//! customers = 500
//! mean_inter_arrival = 1.0
//! mean_service_time = 2.5
//! seed = 42
//! ```
//!
//! Every table and key is optional; missing values take the defaults shown above, except that the termination
//! policy defaults to `drained`.

use crate::checkout::Termination;
use crate::error::ConfigError;
use crate::workload::WorkloadSpec;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of parallel checkout lanes.
    pub lanes: u32,
    pub termination: Termination,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            lanes: 3,
            termination: Termination::default(),
        }
    }
}

impl SimConfig {
    /// # Errors
    ///
    /// Rejects zero lanes and a negative or non-finite horizon margin.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lanes == 0 {
            return Err(ConfigError::NoLanes);
        }
        if let Termination::Horizon { margin } = self.termination {
            if !margin.is_finite() || margin < 0.0 {
                return Err(ConfigError::BadMargin(margin));
            }
        }
        Ok(())
    }
}

/// Contents of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimConfig,
    pub workload: WorkloadSpec,
}

impl Config {
    /// # Errors
    ///
    /// Fails when the text is not valid TOML or does not match the expected shape.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Load and validate a configuration file.
///
/// # Errors
///
/// I/O and parse failures are reported as [`ConfigError::Read`] and [`ConfigError::Parse`]; the loaded values are
/// then checked with [`SimConfig::validate()`] and [`WorkloadSpec::validate()`].
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
    let config = Config::from_toml(&text)?;
    config.simulation.validate()?;
    config.workload.validate()?;
    Ok(config)
}
