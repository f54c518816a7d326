//! Error handling utilities for MCP server

use lodestar_core::LodestarError;
use rmcp::ErrorData;

/// Converts a core error into an MCP error. Caller mistakes (unknown ids,
/// bad limits) become `invalid_params`; everything else is internal.
pub fn to_mcp_error(message: &str, error: &LodestarError) -> ErrorData {
    let text = format!("{message}: {error}");
    if error.is_misuse() {
        ErrorData::invalid_params(text, None)
    } else {
        ErrorData::internal_error(text, None)
    }
}
