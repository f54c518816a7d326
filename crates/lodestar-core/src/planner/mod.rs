//! High-level planner API over both engines.
//!
//! [`Planner`] is the single entry point the CLI and the MCP server share.
//! It owns the resolved [`Config`] and an optional [`SymbolIndex`], merges
//! per-request parameters over the configured defaults and dispatches to
//! the compression and chunking engines.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Handlers     │    │     Engines     │    │  SymbolIndex    │
//! │ (compress_plan, │───▶│ (compress,      │───▶│ (in-memory or   │
//! │  chunk_scope..) │    │  chunking)      │    │  workspace)     │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use lodestar_core::{
//!     chunking::InMemoryIndex,
//!     config::Config,
//!     PlannerBuilder,
//! };
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let index = InMemoryIndex::new().with_file("src/lib.rs", "pub fn hello() {}\n");
//! let planner = PlannerBuilder::new()
//!     .with_config(Config::default())
//!     .with_index(Arc::new(index))
//!     .build()?;
//! assert!(planner.has_index());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use std::sync::Arc;

pub mod builder;
pub mod handlers;

#[cfg(test)]
mod tests;

pub use builder::PlannerBuilder;

use crate::{chunking::SymbolIndex, config::Config};

/// Main planner interface.
pub struct Planner {
    pub(crate) config: Config,
    pub(crate) index: Option<Arc<dyn SymbolIndex>>,
}

impl Planner {
    /// Creates a planner from a resolved configuration.
    pub(crate) fn new(config: Config, index: Option<Arc<dyn SymbolIndex>>) -> Self {
        Self { config, index }
    }

    /// The configuration requests fall back to.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }
}
