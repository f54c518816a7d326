//! Turns one addressable unit (a symbol or a file range) into chunks
//! bounded by `max_lines_per_chunk`.

use log::debug;

use super::{
    boundary::detect_boundaries,
    index::{slice_lines, SymbolInfo},
    tokens::estimate_tokens,
};
use crate::{
    models::{ChunkKind, ChunkMetadata, CodeChunk},
    params::ChunkOptions,
};

/// Sub-spans shorter than this are folded into the next one instead of
/// becoming their own chunk.
pub const MIN_SUB_SPAN_LINES: usize = 5;

/// Consecutive windows of exactly `max` lines over `start..=end`; the last
/// window may be shorter.
pub fn fixed_windows(start: usize, end: usize, max: usize) -> Vec<(usize, usize)> {
    let max = max.max(1);
    let mut windows = Vec::new();
    let mut window_start = start;
    while window_start <= end {
        let window_end = (window_start + max - 1).min(end);
        windows.push((window_start, window_end));
        window_start = window_end + 1;
    }
    windows
}

/// Splits an oversized symbol span along detected boundaries.
///
/// Cut points are block starts, the line after each block end and comment
/// lines. A cut that would leave the current span shorter than
/// [`MIN_SUB_SPAN_LINES`] is skipped; the final span is kept whatever its
/// length. Spans still over `max` are cut into fixed windows.
pub fn split_symbol_span(text: &str, start: usize, end: usize, max: usize) -> Vec<(usize, usize)> {
    let boundaries = detect_boundaries(text, start);
    let cuts = boundaries
        .blocks
        .iter()
        .flat_map(|block| [block.start_line, block.end_line + 1])
        .chain(boundaries.comment_lines.iter().copied())
        .filter(|&line| line > start && line <= end)
        .collect::<std::collections::BTreeSet<_>>();

    let mut spans = Vec::new();
    let mut span_start = start;
    for cut in cuts {
        if cut - span_start < MIN_SUB_SPAN_LINES {
            continue;
        }
        spans.push((span_start, cut - 1));
        span_start = cut;
    }
    spans.push((span_start, end));

    spans
        .into_iter()
        .flat_map(|(s, e)| {
            if e - s + 1 > max {
                fixed_windows(s, e, max)
            } else {
                vec![(s, e)]
            }
        })
        .collect()
}

struct ChunkSpec<'a> {
    kind: ChunkKind,
    file_path: &'a str,
    start_line: usize,
    end_line: usize,
    summary: String,
    symbol_name: Option<String>,
    parent_symbol_name: Option<String>,
    text: Option<String>,
}

fn make_chunk(spec: ChunkSpec<'_>, options: &ChunkOptions) -> CodeChunk {
    let content = spec.text.filter(|_| options.include_content);
    let estimated_tokens = estimate_tokens(content.as_deref().unwrap_or(&spec.summary));
    CodeChunk {
        id: CodeChunk::make_id(spec.kind, spec.file_path, spec.start_line, spec.end_line),
        file_path: spec.file_path.to_string(),
        start_line: spec.start_line,
        end_line: spec.end_line,
        kind: spec.kind,
        metadata: ChunkMetadata {
            line_count: spec.end_line - spec.start_line + 1,
            estimated_tokens,
            summary: spec.summary,
            symbol_name: spec.symbol_name,
            parent_symbol_name: spec.parent_symbol_name,
            merged_from: None,
        },
        content,
    }
}

/// Chunks a resolved symbol.
///
/// A symbol within the line limit becomes one Symbol chunk. A larger one is
/// split into SubSymbol chunks, each naming its parent. An empty or inverted
/// span yields nothing.
pub fn build_symbol_chunks(symbol: &SymbolInfo, options: &ChunkOptions) -> Vec<CodeChunk> {
    let location = &symbol.location;
    let (start, end) = (location.start_line, location.end_line);
    if start == 0 || start > end {
        return Vec::new();
    }
    let line_count = end - start + 1;

    if line_count <= options.max_lines_per_chunk {
        return vec![make_chunk(
            ChunkSpec {
                kind: ChunkKind::Symbol,
                file_path: &location.file_path,
                start_line: start,
                end_line: end,
                summary: format!(
                    "{} ({} lines {}-{})",
                    location.name, location.file_path, start, end
                ),
                symbol_name: Some(location.name.clone()),
                parent_symbol_name: None,
                text: Some(symbol.text.clone()),
            },
            options,
        )];
    }

    let spans = split_symbol_span(&symbol.text, start, end, options.max_lines_per_chunk);
    debug!(
        "Split symbol {} ({} lines) into {} sub-chunks",
        location.name,
        line_count,
        spans.len()
    );

    let total = spans.len();
    spans
        .into_iter()
        .enumerate()
        .map(|(i, (s, e))| {
            make_chunk(
                ChunkSpec {
                    kind: ChunkKind::SubSymbol,
                    file_path: &location.file_path,
                    start_line: s,
                    end_line: e,
                    summary: format!(
                        "{} lines {}-{} (part {} of {})",
                        location.name,
                        s,
                        e,
                        i + 1,
                        total
                    ),
                    symbol_name: None,
                    parent_symbol_name: Some(location.name.clone()),
                    text: Some(slice_lines(&symbol.text, s - start + 1, e - start + 1)),
                },
                options,
            )
        })
        .collect()
}

/// Chunks lines `start..=end` of a file into fixed windows.
///
/// `file_text` is the whole file when available; without it the chunks
/// carry no content.
pub fn build_range_chunks(
    file_path: &str,
    start: usize,
    end: usize,
    file_text: Option<&str>,
    options: &ChunkOptions,
) -> Vec<CodeChunk> {
    fixed_windows(start, end, options.max_lines_per_chunk)
        .into_iter()
        .map(|(s, e)| {
            make_chunk(
                ChunkSpec {
                    kind: ChunkKind::FileRange,
                    file_path,
                    start_line: s,
                    end_line: e,
                    summary: format!("{file_path} lines {s}-{e}"),
                    symbol_name: None,
                    parent_symbol_name: None,
                    text: file_text.map(|text| slice_lines(text, s, e)),
                },
                options,
            )
        })
        .collect()
}
