//! Display formatting for models and engine outputs.
//!
//! Domain models implement [`std::fmt::Display`] directly (markdown, for
//! terminal and MCP output); wrapper types cover contextual renderings.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │    Wrappers     │    │   Formatted     │
//! │ (Plan, Chunk,   │───▶│ (CompactPlan,   │───▶│    Output       │
//! │  reports)       │    │  Issues, ...)   │    │  (Terminal/MCP) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`models`]: Display implementations for domain models
//! - [`results`]: Compression and chunking reports, validation issues
//! - [`compact`]: The compact `|`-delimited plan encoding
//! - [`status`]: One-line status messages
//!
//! # Examples
//!
//! ```rust
//! use lodestar_core::display::{Issues, OperationStatus};
//! use lodestar_core::models::ValidationIssue;
//!
//! let issues = Issues(vec![ValidationIssue::NoPhases]);
//! assert!(issues.to_string().contains("plan has no phases"));
//!
//! let status = OperationStatus::success("Plan is valid");
//! assert_eq!(status.to_string(), "Success: Plan is valid\n");
//! ```

pub mod compact;
pub mod models;
pub mod results;
pub mod status;

pub use compact::{escape_cell, CompactPlan};
pub use results::Issues;
pub use status::OperationStatus;
