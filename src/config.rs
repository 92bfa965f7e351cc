//! Configuration for VahanaIO
//!
//! Loads configuration from TOML file: where the engine module lives, how its
//! exports are named, and the inputs the driver binary feeds it.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub engine: EngineConfig,
    pub drive: DriveConfig,
    pub logging: LoggingConfig,
}

/// Engine module configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Path to the platform dynamic module exporting the engine
    pub module_path: PathBuf,

    /// Export name prefix; entry points are `{prefix}_initialize`,
    /// `{prefix}_step`, `{prefix}_terminate` and the records `{prefix}_U`,
    /// `{prefix}_Y`
    #[serde(default = "default_symbol_prefix")]
    pub symbol_prefix: String,

    /// Simulated seconds per engine step
    ///
    /// Engine metadata fixed at build time of the module, not a tunable. All
    /// known engine builds use 0.01.
    #[serde(default = "default_timestep")]
    pub timestep_s: f64,
}

/// Inputs for the demo drive performed by the `vahana-io` binary
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DriveConfig {
    /// Number of advance calls after initialization
    pub steps: u32,
    /// Throttle (positive) / brake (negative) command, recommended [-1, 1]
    pub sped: f64,
    /// Front wheel steering angle in radians
    pub delta: f64,
    /// Initial longitudinal velocity in m/s
    pub v_ini: f64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

fn default_symbol_prefix() -> String {
    "vehiclemodel_public".to_string()
}

fn default_timestep() -> f64 {
    0.01
}

impl EngineConfig {
    /// Engine configuration for a module at `path` with default export
    /// naming and timestep
    pub fn for_module<P: AsRef<Path>>(path: P) -> Self {
        Self {
            module_path: path.as_ref().to_path_buf(),
            symbol_prefix: default_symbol_prefix(),
            timestep_s: default_timestep(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    ///
    /// # Example
    /// ```no_run
    /// use vahana_io::Config;
    ///
    /// let config = Config::from_file("vahana.toml")?;
    /// # Ok::<(), vahana_io::Error>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Default configuration: the public vehicle model module in the working
    /// directory, driven with the reference demo inputs
    pub fn defaults() -> Self {
        Self {
            engine: EngineConfig::for_module("./libvehiclemodel_public.so"),
            drive: DriveConfig {
                steps: 100,
                sped: 1.0,
                delta: 0.05,
                v_ini: 10.0,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}
