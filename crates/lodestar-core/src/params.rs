//! Parameter structures for lodestar operations
//!
//! Shared request structures used by every interface (CLI, MCP). They carry
//! no framework-specific derives beyond serde; JSON schema generation is
//! enabled with the `schema` feature for the MCP layer.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{LodestarError, Result},
    models::Plan,
};

/// Optional size limits applied by the plan compressor.
///
/// Unset limits are not enforced. Zero is treated as one so a compressed
/// plan always keeps at least one phase and one step.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct CompressionLimits {
    /// Maximum number of phases to keep
    #[serde(default)]
    pub target_max_phases: Option<usize>,
    /// Maximum number of steps to keep in each phase
    #[serde(default)]
    pub target_max_steps: Option<usize>,
    /// Maximum execution steps sharing phase, scope and category before
    /// they are merged
    #[serde(default)]
    pub max_micro_steps_per_phase: Option<usize>,
}

impl CompressionLimits {
    /// Fills every unset field from `fallback`.
    #[must_use]
    pub fn or(self, fallback: CompressionLimits) -> Self {
        Self {
            target_max_phases: self.target_max_phases.or(fallback.target_max_phases),
            target_max_steps: self.target_max_steps.or(fallback.target_max_steps),
            max_micro_steps_per_phase: self
                .max_micro_steps_per_phase
                .or(fallback.max_micro_steps_per_phase),
        }
    }
}

fn default_max_chunks_per_step() -> usize {
    5
}

fn default_max_lines_per_chunk() -> usize {
    100
}

fn default_true() -> bool {
    true
}

/// Options controlling how scopes are cut into chunks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChunkOptions {
    /// Chunk cap per file once dechunking applies
    #[serde(default = "default_max_chunks_per_step")]
    pub max_chunks_per_step: usize,
    /// Largest line span a single chunk may cover
    #[serde(default = "default_max_lines_per_chunk")]
    pub max_lines_per_chunk: usize,
    /// Chunks estimated above this many tokens have their content omitted
    #[serde(default)]
    pub max_tokens_per_chunk: Option<usize>,
    /// Attach raw text to chunks
    #[serde(default = "default_true")]
    pub include_content: bool,
    /// Merge chunks when a file yields more than `max_chunks_per_step`
    #[serde(default = "default_true")]
    pub apply_dechunking: bool,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            max_chunks_per_step: default_max_chunks_per_step(),
            max_lines_per_chunk: default_max_lines_per_chunk(),
            max_tokens_per_chunk: None,
            include_content: true,
            apply_dechunking: true,
        }
    }
}

impl ChunkOptions {
    /// Rejects limits that could never be satisfied.
    pub fn validate(&self) -> Result<()> {
        if self.max_chunks_per_step == 0 {
            return Err(LodestarError::invalid_input("max_chunks_per_step")
                .with_reason("must be greater than 0"));
        }
        if self.max_lines_per_chunk == 0 {
            return Err(LodestarError::invalid_input("max_lines_per_chunk")
                .with_reason("must be greater than 0"));
        }
        if self.max_tokens_per_chunk == Some(0) {
            return Err(LodestarError::invalid_input("max_tokens_per_chunk")
                .with_reason("must be greater than 0 when set"));
        }
        Ok(())
    }
}

/// Partial chunk options; unset fields come from configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChunkOverrides {
    #[serde(default)]
    pub max_chunks_per_step: Option<usize>,
    #[serde(default)]
    pub max_lines_per_chunk: Option<usize>,
    #[serde(default)]
    pub max_tokens_per_chunk: Option<usize>,
    #[serde(default)]
    pub include_content: Option<bool>,
    #[serde(default)]
    pub apply_dechunking: Option<bool>,
}

impl ChunkOverrides {
    /// Applies the overrides on top of `base`.
    pub fn apply(&self, base: ChunkOptions) -> ChunkOptions {
        ChunkOptions {
            max_chunks_per_step: self.max_chunks_per_step.unwrap_or(base.max_chunks_per_step),
            max_lines_per_chunk: self.max_lines_per_chunk.unwrap_or(base.max_lines_per_chunk),
            max_tokens_per_chunk: self.max_tokens_per_chunk.or(base.max_tokens_per_chunk),
            include_content: self.include_content.unwrap_or(base.include_content),
            apply_dechunking: self.apply_dechunking.unwrap_or(base.apply_dechunking),
        }
    }
}

/// Parameters for compressing a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct CompressPlan {
    /// The plan to compress
    pub plan: Plan,
    /// Limits for this request; unset fields come from configuration
    #[serde(default, flatten)]
    pub limits: CompressionLimits,
}

/// Parameters for validating a plan without changing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ValidatePlan {
    /// The plan to check
    pub plan: Plan,
}

/// Parameters for chunking the code behind one of a plan's scopes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChunkScope {
    /// Plan owning the scope
    pub plan: Plan,
    /// ID of the scope to chunk
    pub scope_id: String,
    #[serde(default, flatten)]
    pub options: ChunkOverrides,
}

/// Parameters for chunking the code a step works on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChunkStep {
    /// Plan owning the step
    pub plan: Plan,
    /// ID of the step whose scope is chunked
    pub step_id: String,
    #[serde(default, flatten)]
    pub options: ChunkOverrides,
}
