//! Core library for lodestar: plan compression and semantic code chunking.
//!
//! Two synchronous engines sit between a coding agent and a codebase:
//!
//! - **Compression** ([`compress`]): keeps a phased, dependency-ordered
//!   plan within size limits by correcting abstraction levels, repairing
//!   scopes, merging over-granular execution steps and truncating, without
//!   ever breaking dependency integrity.
//! - **Chunking** ([`chunking`]): turns a scope into bounded code chunks cut
//!   along control-flow and comment boundaries, and merges them back into
//!   summary chunks ([`dechunk`]) when a file yields too many.
//!
//! Both engines take their inputs by reference and return new values. The
//! [`Planner`] ties them to configuration and a code index and is what the
//! CLI and MCP server call.
//!
//! # Quick Start
//!
//! ```rust
//! use lodestar_core::{
//!     compress::compress,
//!     models::{AbstractionLevel, Phase, Plan, Step, StepCategory, StepStatus},
//!     params::CompressionLimits,
//! };
//!
//! let step = |id: &str, order: u32| Step {
//!     id: id.to_string(),
//!     phase_id: "p".to_string(),
//!     abstraction_level: AbstractionLevel::Planning,
//!     order,
//!     category: StepCategory::EditCode,
//!     title: format!("Edit {id}"),
//!     summary: String::new(),
//!     scope_id: None,
//!     dependencies: vec![],
//!     suggested_tools: vec![],
//!     status: StepStatus::Todo,
//! };
//! let plan = Plan {
//!     goal: "Rename the config loader".to_string(),
//!     category: Default::default(),
//!     phases: vec![Phase {
//!         id: "p".to_string(),
//!         name: "Edit".to_string(),
//!         abstraction_level: AbstractionLevel::Execution,
//!         order: 0,
//!     }],
//!     scopes: vec![],
//!     steps: vec![step("a", 0), step("b", 1), step("c", 2)],
//! };
//!
//! let report = compress(&plan, &CompressionLimits {
//!     max_micro_steps_per_phase: Some(1),
//!     ..Default::default()
//! })?;
//!
//! assert_eq!(report.plan.steps.len(), 1);
//! assert_eq!(report.stats.level_corrections, 3);
//! assert!(report.plan.global_scope().is_some());
//! # Ok::<(), lodestar_core::LodestarError>(())
//! ```

pub mod chunking;
pub mod compress;
pub mod config;
pub mod dechunk;
pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod planner;

// Re-export commonly used types
pub use chunking::{InMemoryIndex, SymbolIndex, WorkspaceIndex};
pub use config::Config;
pub use display::{CompactPlan, Issues, OperationStatus};
pub use error::{LodestarError, Result};
pub use models::{ChunkResult, CodeChunk, CompressionReport, Plan, Step};
pub use params::{
    ChunkOptions, ChunkOverrides, ChunkScope, ChunkStep, CompressPlan, CompressionLimits,
    ValidatePlan,
};
pub use planner::{Planner, PlannerBuilder};
