//! Builder for creating and configuring Planner instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use log::debug;

use super::Planner;
use crate::{chunking::SymbolIndex, config::Config, error::Result};

/// Builder for creating and configuring Planner instances.
#[derive(Clone, Default)]
pub struct PlannerBuilder {
    config_path: Option<PathBuf>,
    config: Option<Config>,
    index: Option<Arc<dyn SymbolIndex>>,
}

impl PlannerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom configuration file path.
    ///
    /// If not specified, uses `$XDG_CONFIG_HOME/lodestar/config.json` when
    /// that file exists and built-in defaults otherwise.
    #[must_use]
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.config_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses an in-memory configuration instead of reading a file.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Attaches the code index used for chunking.
    #[must_use]
    pub fn with_index(mut self, index: Arc<dyn SymbolIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Builds the configured planner instance.
    ///
    /// # Errors
    ///
    /// Returns `LodestarError::FileSystem` if an explicit config file cannot
    /// be read, and `LodestarError::Configuration` or
    /// `LodestarError::InvalidInput` if its contents are invalid.
    pub fn build(self) -> Result<Planner> {
        let config = match (self.config, self.config_path) {
            (Some(config), _) => {
                config.chunking.validate()?;
                config
            }
            (None, Some(path)) => Config::load(path)?,
            (None, None) => match Config::default_path() {
                Some(path) => Config::load(path)?,
                None => {
                    debug!("No configuration file found, using defaults");
                    Config::default()
                }
            },
        };

        Ok(Planner::new(config, self.index))
    }
}
