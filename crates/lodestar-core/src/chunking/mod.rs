//! Semantic chunking engine.
//!
//! Resolves a plan scope (directly, or through the step that references it)
//! against a [`SymbolIndex`], cuts the result into bounded chunks and merges
//! them back down when a file yields too many. Nothing here fails on a
//! lookup miss: unresolvable scopes, symbols and files produce an empty or
//! degraded result plus a warning. Only unknown ids and invalid options are
//! errors.

pub mod boundary;
pub mod builder;
pub mod index;
pub mod tokens;

use log::{debug, info, warn};

use crate::{
    dechunk::dechunk_chunks,
    error::{LodestarError, Result},
    models::{ChunkResult, ChunkStats, CodeChunk, Plan, Scope, ScopeKind},
    params::ChunkOptions,
};

pub use boundary::{detect_boundaries, Block, BlockKind, Boundaries};
pub use builder::{build_range_chunks, build_symbol_chunks};
pub use index::{
    InMemoryIndex, ScopeResolution, SymbolIndex, SymbolInfo, SymbolLocation, WorkspaceIndex,
};
pub use tokens::estimate_tokens;

/// Records a warning on the result and in the log.
fn push_warning(warnings: &mut Vec<String>, message: String) {
    warn!("{message}");
    warnings.push(message);
}

/// Chunks the code behind `scope_id`.
pub fn chunk_scope(
    plan: &Plan,
    scope_id: &str,
    options: &ChunkOptions,
    index: Option<&dyn SymbolIndex>,
) -> Result<ChunkResult> {
    options.validate()?;
    let scope = plan
        .scope(scope_id)
        .ok_or_else(|| LodestarError::ScopeNotFound {
            id: scope_id.to_string(),
        })?;
    chunk_resolved(scope, options, index)
}

/// Chunks the code behind the scope of `step_id`.
///
/// A step without a scope, or whose scope id does not resolve, yields an
/// empty result with a warning.
pub fn chunk_step(
    plan: &Plan,
    step_id: &str,
    options: &ChunkOptions,
    index: Option<&dyn SymbolIndex>,
) -> Result<ChunkResult> {
    options.validate()?;
    let step = plan.step(step_id).ok_or_else(|| LodestarError::StepNotFound {
        id: step_id.to_string(),
    })?;

    let Some(scope_id) = step.scope_id.as_deref() else {
        let message = format!("Step '{step_id}' has no scope; nothing to chunk");
        warn!("{message}");
        return Ok(ChunkResult::empty_with_warning(message));
    };
    let Some(scope) = plan.scope(scope_id) else {
        let message = format!("Step '{step_id}' refers to unknown scope '{scope_id}'");
        warn!("{message}");
        return Ok(ChunkResult::empty_with_warning(message));
    };

    chunk_resolved(scope, options, index)
}

fn chunk_resolved(
    scope: &Scope,
    options: &ChunkOptions,
    index: Option<&dyn SymbolIndex>,
) -> Result<ChunkResult> {
    debug!(
        "Chunking scope {} ({} '{}')",
        scope.id,
        scope.kind.as_str(),
        scope.selector
    );
    let mut warnings = Vec::new();
    let chunks = match index {
        Some(index) => chunks_from_index(index, scope, options, &mut warnings),
        None => chunks_without_index(scope, options, &mut warnings),
    };
    finish(chunks, options, warnings)
}

fn global_scope_warning(scope: &Scope) -> String {
    format!(
        "Scope '{}' covers the whole workspace; pick a module, file or symbol scope to chunk",
        scope.id
    )
}

fn chunks_from_index(
    index: &dyn SymbolIndex,
    scope: &Scope,
    options: &ChunkOptions,
    warnings: &mut Vec<String>,
) -> Vec<CodeChunk> {
    match index.resolve_scope(scope) {
        ScopeResolution::Global => {
            push_warning(warnings, global_scope_warning(scope));
            Vec::new()
        }
        ScopeResolution::Pattern { pattern } => {
            push_warning(
                warnings,
                format!(
                    "Scope '{}' uses pattern '{}' which the index cannot expand",
                    scope.id, pattern
                ),
            );
            Vec::new()
        }
        ScopeResolution::Unresolved { reason } => {
            push_warning(warnings, format!("Scope '{}': {}", scope.id, reason));
            Vec::new()
        }
        ScopeResolution::Symbol { name } => match index.lookup_symbol(&name) {
            Some(symbol) => symbol_chunks(symbol, options, warnings),
            None => {
                push_warning(warnings, format!("Symbol '{name}' not found in index"));
                Vec::new()
            }
        },
        ScopeResolution::File { path, range } => match index.read_file(&path) {
            Some(text) => file_chunks(&path, &text, range, options, warnings),
            None => match range {
                Some((start, end)) => {
                    push_warning(
                        warnings,
                        format!(
                            "File '{path}' not found in index; returning lines {start}-{end} without content"
                        ),
                    );
                    let no_content = ChunkOptions {
                        include_content: false,
                        ..*options
                    };
                    builder::build_range_chunks(&path, start, end, None, &no_content)
                }
                None => {
                    push_warning(warnings, format!("File '{path}' not found in index"));
                    Vec::new()
                }
            },
        },
        ScopeResolution::Module { files } => {
            let mut chunks = Vec::new();
            for path in &files {
                match index.read_file(path) {
                    Some(text) => chunks.extend(file_chunks(path, &text, None, options, warnings)),
                    None => push_warning(warnings, format!("File '{path}' could not be read")),
                }
            }
            chunks
        }
    }
}

/// Chunks a looked-up symbol after checking its span against its file.
/// Empty, inverted or out-of-file spans yield nothing; a span running past
/// the end of the file is clamped.
fn symbol_chunks(
    mut symbol: SymbolInfo,
    options: &ChunkOptions,
    warnings: &mut Vec<String>,
) -> Vec<CodeChunk> {
    let location = &symbol.location;
    let (name, path) = (&location.name, &location.file_path);
    let (start, end, total) = (location.start_line, location.end_line, symbol.file_lines);

    if start == 0 || start > end {
        push_warning(
            warnings,
            format!("Symbol '{name}' has an invalid span {start}-{end}"),
        );
        return Vec::new();
    }
    if start > total {
        push_warning(
            warnings,
            format!("Symbol '{name}' starts past the end of '{path}' ({total} lines)"),
        );
        return Vec::new();
    }
    if end > total {
        push_warning(
            warnings,
            format!("Symbol '{name}' span {start}-{end} clamped to the {total} lines of '{path}'"),
        );
        symbol.location.end_line = total;
    }
    builder::build_symbol_chunks(&symbol, options)
}

/// Range chunks over a file whose text is known, clamping the range to
/// the file's length.
fn file_chunks(
    path: &str,
    text: &str,
    range: Option<(usize, usize)>,
    options: &ChunkOptions,
    warnings: &mut Vec<String>,
) -> Vec<CodeChunk> {
    let total = text.lines().count();
    if total == 0 {
        push_warning(warnings, format!("File '{path}' is empty"));
        return Vec::new();
    }

    let (start, mut end) = range.unwrap_or((1, total));
    if start > total {
        push_warning(
            warnings,
            format!("Range {start}-{end} starts past the end of '{path}' ({total} lines)"),
        );
        return Vec::new();
    }
    if end > total {
        push_warning(
            warnings,
            format!("Range {start}-{end} of '{path}' clamped to its {total} lines"),
        );
        end = total;
    }
    builder::build_range_chunks(path, start, end, Some(text), options)
}

fn chunks_without_index(
    scope: &Scope,
    options: &ChunkOptions,
    warnings: &mut Vec<String>,
) -> Vec<CodeChunk> {
    if scope.kind == ScopeKind::Global {
        push_warning(warnings, global_scope_warning(scope));
        return Vec::new();
    }

    if scope.kind == ScopeKind::File && !index::is_pattern(&scope.selector) {
        if let (path, Some((start, end))) = index::parse_file_selector(scope.selector.trim()) {
            push_warning(
                warnings,
                format!("No index available; returning lines {start}-{end} of '{path}' without content"),
            );
            let no_content = ChunkOptions {
                include_content: false,
                ..*options
            };
            return builder::build_range_chunks(&path, start, end, None, &no_content);
        }
    }

    push_warning(
        warnings,
        format!(
            "No index available to resolve {} scope '{}'",
            scope.kind.as_str(),
            scope.id
        ),
    );
    Vec::new()
}

/// Applies the token budget and dechunking, then computes stats.
fn finish(
    mut chunks: Vec<CodeChunk>,
    options: &ChunkOptions,
    mut warnings: Vec<String>,
) -> Result<ChunkResult> {
    if let Some(limit) = options.max_tokens_per_chunk {
        for chunk in chunks.iter_mut() {
            if chunk.content.is_some() && chunk.metadata.estimated_tokens > limit {
                push_warning(
                    &mut warnings,
                    format!(
                        "Chunk '{}' is estimated at {} tokens, over the limit of {}; content omitted",
                        chunk.id, chunk.metadata.estimated_tokens, limit
                    ),
                );
                chunk.content = None;
                chunk.metadata.estimated_tokens = estimate_tokens(&chunk.metadata.summary);
            }
        }
    }

    let mut chunks_merged = 0;
    if options.apply_dechunking {
        let outcome = dechunk_chunks(chunks, options.max_chunks_per_step)?;
        chunks_merged = outcome.absorbed;
        chunks = outcome.chunks;
    }

    let stats = ChunkStats {
        total_chunks: chunks.len(),
        chunks_merged,
        total_lines: chunks.iter().map(|c| c.metadata.line_count).sum(),
        estimated_tokens: chunks.iter().map(|c| c.metadata.estimated_tokens).sum(),
    };
    info!(
        "Produced {} chunks ({} merged, ~{} tokens)",
        stats.total_chunks, stats.chunks_merged, stats.estimated_tokens
    );

    Ok(ChunkResult {
        chunks,
        stats,
        warnings,
    })
}
