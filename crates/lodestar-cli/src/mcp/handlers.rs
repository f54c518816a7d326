//! MCP tool handlers implementation

use std::sync::Arc;

use lodestar_core::{params as core, OperationStatus, Planner};
use log::debug;
use rmcp::{
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::errors::to_mcp_error;

// ============================================================================
// Generic Parameter Wrapper
// ============================================================================
//
// Core parameter types derive JsonSchema only behind the `schema` feature.
// The transparent wrapper gives every one of them the Deserialize and
// JsonSchema pair rmcp's `Parameters` extractor needs.

/// Generic MCP wrapper for core parameter types
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type CompressPlan = McpParams<core::CompressPlan>;
pub type ValidatePlan = McpParams<core::ValidatePlan>;
pub type ChunkScope = McpParams<core::ChunkScope>;
pub type ChunkStep = McpParams<core::ChunkStep>;

pub type McpResult = Result<CallToolResult, ErrorData>;

/// A markdown summary for people followed by the JSON payload for agents.
fn report<T: Serialize + std::fmt::Display>(value: &T) -> McpResult {
    Ok(CallToolResult::success(vec![
        Content::text(value.to_string()),
        Content::json(value)?,
    ]))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    planner: Arc<Planner>,
}

impl McpHandlers {
    pub fn new(planner: Arc<Planner>) -> Self {
        Self { planner }
    }

    pub fn compress_plan(&self, params: &CompressPlan) -> McpResult {
        let params = params.as_ref();
        debug!(
            "compress_plan: {} steps, {:?}",
            params.plan.steps.len(),
            params.limits
        );

        let result = self
            .planner
            .compress_plan(params)
            .map_err(|e| to_mcp_error("Failed to compress plan", &e))?;
        report(&result)
    }

    pub fn validate_plan(&self, params: &ValidatePlan) -> McpResult {
        let params = params.as_ref();
        debug!("validate_plan: {} steps", params.plan.steps.len());

        let issues = self.planner.validate_plan(params);
        let status = if issues.is_empty() {
            OperationStatus::success("Plan is valid")
        } else {
            OperationStatus::failure(format!("Plan has {} issues", issues.len()))
        };
        Ok(CallToolResult::success(vec![
            Content::text(format!("{status}\n{issues}")),
            Content::json(&issues.0)?,
        ]))
    }

    pub fn chunk_scope(&self, params: &ChunkScope) -> McpResult {
        let params = params.as_ref();
        debug!("chunk_scope: {} {:?}", params.scope_id, params.options);

        let result = self
            .planner
            .chunk_scope(params)
            .map_err(|e| to_mcp_error("Failed to chunk scope", &e))?;
        report(&result)
    }

    pub fn chunk_step(&self, params: &ChunkStep) -> McpResult {
        let params = params.as_ref();
        debug!("chunk_step: {} {:?}", params.step_id, params.options);

        let result = self
            .planner
            .chunk_step(params)
            .map_err(|e| to_mcp_error("Failed to chunk step", &e))?;
        report(&result)
    }
}
