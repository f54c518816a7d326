//! Command-line interface definitions using clap
//!
//! Argument structs carry clap derives and convert into the core parameter
//! types with `From`, so the core stays free of CLI concerns:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Planner
//! ```
//!
//! Plans are read from JSON files in the same camelCase shape the MCP tools
//! accept.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use lodestar_core::{
    models::Plan, params::*, ChunkResult, OperationStatus, Planner, PlannerBuilder,
    WorkspaceIndex,
};
use log::debug;

use crate::renderer::TerminalRenderer;

/// Reads a plan from a JSON file.
pub fn read_plan(path: &Path) -> Result<Plan> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read plan file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid plan file {}", path.display()))
}

/// Builds the planner, attaching a workspace index when one is requested.
pub fn build_planner(config: Option<PathBuf>, index: Option<&IndexArgs>) -> Result<Planner> {
    let mut builder = PlannerBuilder::new().with_config_path(config);

    if let Some(index) = index.and_then(IndexArgs::workspace_index).transpose()? {
        debug!("Using workspace index rooted at {}", index.root().display());
        builder = builder.with_index(Arc::new(index));
    }

    builder.build().context("Failed to initialize planner")
}

// ============================================================================
// CLI Argument Wrappers
// ============================================================================

/// Output format for compression reports
#[derive(Copy, Clone, Default, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    /// Markdown report followed by the plan
    #[default]
    Markdown,
    /// The full report as JSON
    Json,
    /// Only the compact pipe-separated plan encoding
    Compact,
}

/// Output format for chunk results
#[derive(Copy, Clone, Default, PartialEq, Eq, ValueEnum)]
pub enum ChunkFormat {
    #[default]
    Markdown,
    Json,
}

/// Compression limits; unset limits fall back to configuration
#[derive(Args)]
pub struct LimitArgs {
    /// Maximum number of phases to keep
    #[arg(long)]
    pub max_phases: Option<usize>,
    /// Maximum number of steps to keep in each phase
    #[arg(long)]
    pub max_steps: Option<usize>,
    /// Maximum execution-level steps per phase, scope and category before merging
    #[arg(long)]
    pub max_micro_steps: Option<usize>,
}

impl From<LimitArgs> for CompressionLimits {
    fn from(val: LimitArgs) -> Self {
        CompressionLimits {
            target_max_phases: val.max_phases,
            target_max_steps: val.max_steps,
            max_micro_steps_per_phase: val.max_micro_steps,
        }
    }
}

/// Compress a plan
#[derive(Args)]
pub struct CompressArgs {
    /// Path to the plan JSON file
    pub plan: PathBuf,
    #[command(flatten)]
    pub limits: LimitArgs,
    #[arg(long, value_enum, default_value_t = PlanFormat::Markdown)]
    pub format: PlanFormat,
    /// Also write the compressed plan as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Validate a plan
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the plan JSON file
    pub plan: PathBuf,
}

impl ValidateArgs {
    pub fn into_params(self) -> Result<ValidatePlan> {
        Ok(ValidatePlan {
            plan: read_plan(&self.plan)?,
        })
    }
}

/// Where chunk content comes from
#[derive(Args, Default)]
pub struct IndexArgs {
    /// Workspace root that file and module selectors are relative to
    #[arg(long)]
    pub root: Option<PathBuf>,
    /// JSON symbol map: [{name, filePath, startLine, endLine}]
    #[arg(long)]
    pub symbols: Option<PathBuf>,
}

impl IndexArgs {
    /// The index these arguments describe, if any. A symbol map without a
    /// root is resolved against the current directory.
    pub fn workspace_index(&self) -> Option<Result<WorkspaceIndex>> {
        if self.root.is_none() && self.symbols.is_none() {
            return None;
        }
        let root = self.root.clone().unwrap_or_else(|| PathBuf::from("."));
        let index = WorkspaceIndex::new(root);
        Some(match &self.symbols {
            Some(path) => index
                .with_symbol_map(path)
                .context("Failed to load symbol map"),
            None => Ok(index),
        })
    }
}

/// Chunking limits; unset values fall back to configuration
#[derive(Args)]
pub struct ChunkOptionArgs {
    /// Maximum chunks per file before merging into summaries
    #[arg(long)]
    pub max_chunks: Option<usize>,
    /// Maximum lines in a single chunk
    #[arg(long)]
    pub max_lines: Option<usize>,
    /// Drop the content of chunks estimated above this many tokens
    #[arg(long)]
    pub max_tokens: Option<usize>,
    /// Return spans and summaries only
    #[arg(long)]
    pub no_content: bool,
    /// Keep every chunk even when a file yields too many
    #[arg(long)]
    pub no_dechunk: bool,
}

impl From<ChunkOptionArgs> for ChunkOverrides {
    fn from(val: ChunkOptionArgs) -> Self {
        ChunkOverrides {
            max_chunks_per_step: val.max_chunks,
            max_lines_per_chunk: val.max_lines,
            max_tokens_per_chunk: val.max_tokens,
            include_content: val.no_content.then_some(false),
            apply_dechunking: val.no_dechunk.then_some(false),
        }
    }
}

/// Chunk the code behind a scope
#[derive(Args)]
pub struct ChunkScopeArgs {
    /// Path to the plan JSON file
    pub plan: PathBuf,
    /// Id of the scope to chunk
    pub scope_id: String,
    #[command(flatten)]
    pub index: IndexArgs,
    #[command(flatten)]
    pub options: ChunkOptionArgs,
    #[arg(long, value_enum, default_value_t = ChunkFormat::Markdown)]
    pub format: ChunkFormat,
}

/// Chunk the code behind a step's scope
#[derive(Args)]
pub struct ChunkStepArgs {
    /// Path to the plan JSON file
    pub plan: PathBuf,
    /// Id of the step whose scope to chunk
    pub step_id: String,
    #[command(flatten)]
    pub index: IndexArgs,
    #[command(flatten)]
    pub options: ChunkOptionArgs,
    #[arg(long, value_enum, default_value_t = ChunkFormat::Markdown)]
    pub format: ChunkFormat,
}

#[derive(Subcommand)]
pub enum ChunkCommands {
    /// Chunk the code behind a scope
    #[command(alias = "sc")]
    Scope(ChunkScopeArgs),
    /// Chunk the code behind a step's scope
    #[command(alias = "st")]
    Step(ChunkStepArgs),
}

impl ChunkCommands {
    pub fn index(&self) -> &IndexArgs {
        match self {
            ChunkCommands::Scope(args) => &args.index,
            ChunkCommands::Step(args) => &args.index,
        }
    }
}

// ============================================================================
// Command Handlers
// ============================================================================

/// Runs parsed commands against a planner and renders the results.
pub struct Cli {
    planner: Planner,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(planner: Planner, renderer: TerminalRenderer) -> Self {
        Self { planner, renderer }
    }

    pub fn compress(&self, args: CompressArgs) -> Result<()> {
        let CompressArgs {
            plan,
            limits,
            format,
            output,
        } = args;
        let params = CompressPlan {
            plan: read_plan(&plan)?,
            limits: limits.into(),
        };
        let report = self
            .planner
            .compress_plan(&params)
            .context("Failed to compress plan")?;

        match format {
            PlanFormat::Markdown => self.renderer.render(&report.to_string())?,
            PlanFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            PlanFormat::Compact => print!("{}", report.compact_encoding),
        }

        if let Some(path) = output {
            let json = serde_json::to_string_pretty(&report.plan)?;
            fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            let status =
                OperationStatus::success(format!("Wrote compressed plan to {}", path.display()));
            eprint!("{status}");
        }
        Ok(())
    }

    pub fn validate(&self, args: ValidateArgs) -> Result<()> {
        let issues = self.planner.validate_plan(&args.into_params()?);
        self.renderer.render(&issues.to_string())?;
        if !issues.is_empty() {
            bail!("plan has {} issues", issues.len());
        }
        Ok(())
    }

    pub fn handle_chunk_command(&self, command: ChunkCommands) -> Result<()> {
        match command {
            ChunkCommands::Scope(args) => {
                let params = ChunkScope {
                    plan: read_plan(&args.plan)?,
                    scope_id: args.scope_id,
                    options: args.options.into(),
                };
                let result = self
                    .planner
                    .chunk_scope(&params)
                    .context("Failed to chunk scope")?;
                self.render_chunks(&result, args.format)
            }
            ChunkCommands::Step(args) => {
                let params = ChunkStep {
                    plan: read_plan(&args.plan)?,
                    step_id: args.step_id,
                    options: args.options.into(),
                };
                let result = self
                    .planner
                    .chunk_step(&params)
                    .context("Failed to chunk step")?;
                self.render_chunks(&result, args.format)
            }
        }
    }

    fn render_chunks(&self, result: &ChunkResult, format: ChunkFormat) -> Result<()> {
        match format {
            ChunkFormat::Markdown => self.renderer.render(&result.to_string()),
            ChunkFormat::Json => {
                println!("{}", serde_json::to_string_pretty(result)?);
                Ok(())
            }
        }
    }
}
