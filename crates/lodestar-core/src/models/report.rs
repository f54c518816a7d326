//! Outputs of the compression and chunking engines.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{AbstractionLevel, CodeChunk, Plan};

/// A single alteration the compressor made to a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Change {
    /// Step level rewritten to match the level policy
    #[serde(rename_all = "camelCase")]
    LevelCorrected {
        step_id: String,
        from: AbstractionLevel,
        to: AbstractionLevel,
    },
    /// Workspace-wide scope appended because none existed
    #[serde(rename_all = "camelCase")]
    ScopeSynthesized { scope_id: String },
    /// Dangling scope reference pointed at the global scope
    #[serde(rename_all = "camelCase")]
    ScopeReassigned {
        step_id: String,
        from: String,
        to: String,
    },
    /// Phase created because the plan had none
    #[serde(rename_all = "camelCase")]
    PhaseSynthesized { phase_id: String },
    /// Dangling phase reference pointed at an existing phase
    #[serde(rename_all = "camelCase")]
    PhaseReassigned {
        step_id: String,
        from: String,
        to: String,
    },
    /// Several steps collapsed into the surviving one
    #[serde(rename_all = "camelCase")]
    StepsMerged { into: String, absorbed: Vec<String> },
    /// Phase removed by truncation
    #[serde(rename_all = "camelCase")]
    PhaseDropped { phase_id: String },
    /// Step removed by truncation
    #[serde(rename_all = "camelCase")]
    StepDropped { step_id: String, reason: String },
    /// Dependency edge removed
    #[serde(rename_all = "camelCase")]
    DependencyRemoved {
        step_id: String,
        dependency: String,
        reason: String,
    },
    /// Step re-inserted because truncation left the plan empty
    #[serde(rename_all = "camelCase")]
    StepRestored { step_id: String },
}

/// Before/after counts and tallies of a compression run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct CompressionStats {
    pub phases_before: usize,
    pub phases_after: usize,
    pub steps_before: usize,
    pub steps_after: usize,
    /// Steps absorbed into another step
    pub steps_merged: usize,
    pub level_corrections: usize,
    pub scope_reassignments: usize,
    pub phases_dropped: usize,
    pub steps_dropped: usize,
}

/// Full result of compressing a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct CompressionReport {
    pub plan: Plan,
    pub warnings: Vec<String>,
    pub changes: Vec<Change>,
    pub stats: CompressionStats,
    /// Delimited tabular rendering of `plan`
    pub compact_encoding: String,
}

/// A structural invariant a plan does not satisfy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ValidationIssue {
    NoPhases,
    NoSteps,
    #[serde(rename_all = "camelCase")]
    GlobalScopeCount { count: usize },
    #[serde(rename_all = "camelCase")]
    UnknownPhase { step_id: String, phase_id: String },
    #[serde(rename_all = "camelCase")]
    UnknownScope { step_id: String, scope_id: String },
    #[serde(rename_all = "camelCase")]
    UnknownDependency { step_id: String, dependency: String },
    #[serde(rename_all = "camelCase")]
    SelfDependency { step_id: String },
    /// Ids of the steps on one dependency cycle
    #[serde(rename_all = "camelCase")]
    DependencyCycle { step_ids: Vec<String> },
    #[serde(rename_all = "camelCase")]
    DuplicateStepId { step_id: String },
}

/// Aggregate figures for a chunking request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChunkStats {
    pub total_chunks: usize,
    /// Original chunks absorbed into summary chunks
    pub chunks_merged: usize,
    pub total_lines: usize,
    pub estimated_tokens: usize,
}

/// Result of a chunking request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChunkResult {
    pub chunks: Vec<CodeChunk>,
    pub stats: ChunkStats,
    pub warnings: Vec<String>,
}

impl ChunkResult {
    /// An empty result carrying a single warning.
    pub fn empty_with_warning(warning: impl Into<String>) -> Self {
        Self {
            warnings: vec![warning.into()],
            ..Default::default()
        }
    }
}
