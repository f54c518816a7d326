//! Default limits for both engines, loaded from a JSON file.
//!
//! ```json
//! {
//!   "compression": { "targetMaxPhases": 4, "maxMicroStepsPerPhase": 3 },
//!   "chunking": { "maxLinesPerChunk": 80, "includeContent": false }
//! }
//! ```
//!
//! Every field is optional. Request parameters override these values.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::{LodestarError, Result, ResultExt},
    params::{ChunkOptions, CompressionLimits},
};

/// Name of the configuration file under the XDG config directory.
pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub compression: CompressionLimits,
    pub chunking: ChunkOptions,
}

impl Config {
    /// Reads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `LodestarError::FileSystem` if the file cannot be read,
    /// `LodestarError::Configuration` if it is not valid JSON, and
    /// `LodestarError::InvalidInput` if a chunking limit is zero.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| LodestarError::file_system(path, e))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(format!("Invalid config file {}", path.display()))?;
        config.chunking.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// `$XDG_CONFIG_HOME/lodestar/config.json`, if it exists.
    pub fn default_path() -> Option<PathBuf> {
        xdg::BaseDirectories::with_prefix("lodestar").find_config_file(CONFIG_FILE)
    }
}
