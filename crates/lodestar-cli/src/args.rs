use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{ChunkCommands, CompressArgs, IndexArgs, ValidateArgs};

/// Plan compression and semantic code chunking for coding agents
///
/// Lodestar keeps phased task plans within size limits without breaking
/// their dependency structure, and cuts the code a plan step targets into
/// bounded chunks. Both engines are available from the command line and
/// as an MCP (Model Context Protocol) server for AI assistants.
#[derive(Parser)]
#[command(version, about, name = "lodestar")]
pub struct Args {
    /// Path to a JSON configuration file. Defaults to
    /// $XDG_CONFIG_HOME/lodestar/config.json when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the Lodestar CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Compress a plan to the configured limits
    #[command(alias = "c")]
    Compress(CompressArgs),
    /// Check a plan's structural invariants
    #[command(alias = "v")]
    Validate(ValidateArgs),
    /// Cut the code behind a scope or step into chunks
    Chunk {
        #[command(subcommand)]
        command: ChunkCommands,
    },
    /// Start the MCP server
    Serve(IndexArgs),
}
