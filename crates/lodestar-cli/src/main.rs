//! Lodestar CLI Application
//!
//! Command-line interface and MCP server for plan compression and semantic
//! code chunking.

mod args;
mod cli;
mod mcp;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, LodestarMcpServer};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        config,
        no_color,
        command,
    } = Args::parse();

    let renderer = TerminalRenderer::new(!no_color);

    info!("Lodestar started");

    match command {
        Compress(args) => Cli::new(cli::build_planner(config, None)?, renderer).compress(args),
        Validate(args) => Cli::new(cli::build_planner(config, None)?, renderer).validate(args),
        Chunk { command } => {
            let planner = cli::build_planner(config, Some(command.index()))?;
            Cli::new(planner, renderer).handle_chunk_command(command)
        }
        Serve(index) => {
            info!("Starting Lodestar MCP server");
            let planner = cli::build_planner(config, Some(&index))?;
            run_stdio_server(LodestarMcpServer::new(planner))
                .await
                .context("MCP server failed")
        }
    }
}
