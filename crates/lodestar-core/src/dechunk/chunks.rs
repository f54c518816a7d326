//! Dechunking of code chunks.

use std::collections::BTreeMap;

use log::debug;

use super::{batch_size, merge_batch, Mergeable};
use crate::{
    chunking::tokens::estimate_tokens,
    error::Result,
    models::{ChunkKind, ChunkMetadata, CodeChunk},
};

impl Mergeable for CodeChunk {
    const NOUN: &'static str = "chunks";

    fn synthesize(batch: Vec<Self>) -> Self {
        let file_path = batch[0].file_path.clone();
        let start_line = batch.iter().map(|c| c.start_line).min().unwrap_or(1);
        let end_line = batch
            .iter()
            .map(|c| c.end_line)
            .max()
            .unwrap_or(start_line);

        let labels: Vec<String> = batch.iter().map(CodeChunk::contributor_label).collect();
        let summary = format!(
            "{} chunks of {} (lines {}-{}): {}",
            batch.len(),
            file_path,
            start_line,
            end_line,
            labels.join("; ")
        );
        let merged_from: Vec<String> = batch.into_iter().map(|c| c.id).collect();

        CodeChunk {
            id: CodeChunk::make_id(ChunkKind::Summary, &file_path, start_line, end_line),
            start_line,
            end_line,
            kind: ChunkKind::Summary,
            metadata: ChunkMetadata {
                line_count: end_line - start_line + 1,
                estimated_tokens: estimate_tokens(&summary),
                summary,
                symbol_name: None,
                parent_symbol_name: None,
                merged_from: Some(merged_from),
            },
            content: None,
            file_path,
        }
    }
}

/// Chunks after dechunking plus how many originals were absorbed.
#[derive(Debug, Clone, Default)]
pub struct DechunkOutcome {
    pub chunks: Vec<CodeChunk>,
    /// Original chunks folded into summary chunks
    pub absorbed: usize,
}

/// Collapses each file's chunks down to at most `max_per_file` units.
///
/// Chunks are grouped by file and sorted by start line; a file at or under
/// the cap passes through. Over-cap files are walked in adjacent batches,
/// each batch becoming one summary chunk. The cap applies per file, so a
/// request spanning several files can still return more than
/// `max_per_file` chunks in total.
pub fn dechunk_chunks(chunks: Vec<CodeChunk>, max_per_file: usize) -> Result<DechunkOutcome> {
    let mut by_file: BTreeMap<String, Vec<CodeChunk>> = BTreeMap::new();
    for chunk in chunks {
        by_file.entry(chunk.file_path.clone()).or_default().push(chunk);
    }

    let mut outcome = DechunkOutcome::default();
    for (file_path, mut group) in by_file {
        group.sort_by_key(|c| (c.start_line, c.end_line));

        if group.len() <= max_per_file {
            outcome.chunks.extend(group);
            continue;
        }

        let size = batch_size(group.len(), max_per_file);
        debug!(
            "Dechunking {} chunks of {} in batches of {}",
            group.len(),
            file_path,
            size
        );

        let mut rest = group;
        while !rest.is_empty() {
            let tail = rest.split_off(size.min(rest.len()));
            let batch = std::mem::replace(&mut rest, tail);
            if batch.len() > 1 {
                outcome.absorbed += batch.len();
            }
            outcome.chunks.push(merge_batch(batch)?);
        }
    }

    Ok(outcome)
}
