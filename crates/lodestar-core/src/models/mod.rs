//! Data models for plans, steps and code chunks.
//!
//! All models are plain values. Every transformation in the crate takes a
//! model by reference and returns a new one; nothing is mutated in place.
//! Display implementations live in [`crate::display::models`].
//!
//! # Examples
//!
//! ```rust
//! use lodestar_core::models::{AbstractionLevel, Phase, Plan, Step, StepCategory, StepStatus};
//!
//! let plan = Plan {
//!     goal: "Fix the login redirect".to_string(),
//!     category: Default::default(),
//!     phases: vec![Phase {
//!         id: "p1".to_string(),
//!         name: "Implement".to_string(),
//!         abstraction_level: AbstractionLevel::Execution,
//!         order: 0,
//!     }],
//!     scopes: vec![],
//!     steps: vec![Step {
//!         id: "s1".to_string(),
//!         phase_id: "p1".to_string(),
//!         abstraction_level: AbstractionLevel::Execution,
//!         order: 0,
//!         category: StepCategory::EditCode,
//!         title: "Patch redirect handler".to_string(),
//!         summary: String::new(),
//!         scope_id: None,
//!         dependencies: vec![],
//!         suggested_tools: vec![],
//!         status: StepStatus::Todo,
//!     }],
//! };
//! assert!(plan.step("s1").is_some());
//! ```

pub mod chunk;
pub mod plan;
pub mod report;
pub mod status;
pub mod step;


pub use chunk::{ChunkKind, ChunkMetadata, CodeChunk};
pub use plan::{Phase, Plan, Scope, GLOBAL_SCOPE_LABEL, GLOBAL_SCOPE_SELECTOR};
pub use report::{
    Change, ChunkResult, ChunkStats, CompressionReport, CompressionStats, ValidationIssue,
};
pub use status::{AbstractionLevel, ScopeKind, StepCategory, StepStatus, TaskCategory};
pub use step::Step;
