//! MCP server implementation for Lodestar
//!
//! Exposes plan compression, plan validation and chunking as Model Context
//! Protocol tools over stdio. Plans travel inline with every call; the
//! server keeps no state between requests.

use std::{future::Future, sync::Arc};

use anyhow::Result;
use lodestar_core::Planner;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::signal::unix::{signal, SignalKind};

pub mod errors;
pub mod handlers;

pub use handlers::{ChunkScope, ChunkStep, CompressPlan, McpResult, ValidatePlan};

const INSTRUCTIONS: &str = r#"Lodestar keeps task plans small and feeds agents bounded pieces of code.

## Core Concepts
- **Plan**: a goal, ordered phases, scopes, and steps with dependencies
- **Abstraction level**: abstract, planning or execution; every step's level is derived from its category and phase
- **Scope**: the part of the codebase a step targets (global, module, file, symbol)
- **Chunk**: a bounded span of code; oversized symbols are split along control-flow and comment boundaries

## Workflow
1. Send a draft plan to `compress_plan` with optional targetMaxPhases, targetMaxSteps and maxMicroStepsPerPhase
2. Check the returned warnings and changes; the compressed plan always keeps at least one phase and one step
3. For each step, call `chunk_step` to get the code it works on, within maxChunksPerStep and maxLinesPerChunk
4. Use `validate_plan` to check a hand-edited plan before running it

## Notes
- Structural problems never fail a call; they are repaired and reported as warnings
- Unknown step or scope ids are errors
- Summary chunks carry mergedFrom with the ids of the chunks they replace"#;

/// MCP server for Lodestar
#[derive(Clone)]
pub struct LodestarMcpServer {
    planner: Arc<Planner>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl LodestarMcpServer {
    pub fn new(planner: Planner) -> Self {
        Self {
            planner: Arc::new(planner),
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.planner.clone())
    }

    #[tool(
        name = "compress_plan",
        description = "Compress a task plan so it fits size limits without breaking dependencies. Corrects each step's abstraction level, repairs scopes (exactly one global scope), merges runs of small execution steps beyond maxMicroStepsPerPhase, keeps the first targetMaxPhases phases and targetMaxSteps steps per phase, and removes dependencies that dangle or close a cycle. Returns the compressed plan with warnings, a change log, stats and a compact pipe-separated encoding."
    )]
    async fn compress_plan(&self, Parameters(params): Parameters<CompressPlan>) -> McpResult {
        self.handlers().compress_plan(&params)
    }

    #[tool(
        name = "validate_plan",
        description = "Check a plan against its structural invariants without changing it: phases and steps present, exactly one global scope, unique step ids, every phase, scope and dependency reference resolves, no self dependencies, no dependency cycles. Returns the list of issues found."
    )]
    async fn validate_plan(&self, Parameters(params): Parameters<ValidatePlan>) -> McpResult {
        self.handlers().validate_plan(&params)
    }

    #[tool(
        name = "chunk_scope",
        description = "Cut the code behind one of the plan's scopes into bounded chunks. Symbols over maxLinesPerChunk are split along block and comment boundaries; files yielding more than maxChunksPerStep chunks are merged into summary chunks listing mergedFrom. Set includeContent=false for spans and summaries only. Unresolvable scopes return no chunks and a warning."
    )]
    async fn chunk_scope(&self, Parameters(params): Parameters<ChunkScope>) -> McpResult {
        self.handlers().chunk_scope(&params)
    }

    #[tool(
        name = "chunk_step",
        description = "Cut the code behind a step's scope into bounded chunks, with the same options as chunk_scope. A step without a scope returns no chunks and a warning."
    )]
    async fn chunk_step(&self, Parameters(params): Parameters<ChunkStep>) -> McpResult {
        self.handlers().chunk_step(&params)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for LodestarMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "lodestar".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: LodestarMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Lodestar MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
