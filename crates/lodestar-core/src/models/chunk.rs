//! Code chunk model returned by the chunking engine.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a chunk was produced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub enum ChunkKind {
    /// A whole symbol that fit within the line limit
    Symbol,
    /// A slice of an oversized symbol
    SubSymbol,
    /// An explicit line range of a file
    FileRange,
    /// A synthesized stand-in for several merged chunks
    Summary,
}

impl ChunkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkKind::Symbol => "symbol",
            ChunkKind::SubSymbol => "subSymbol",
            ChunkKind::FileRange => "fileRange",
            ChunkKind::Summary => "summary",
        }
    }

    /// Short prefix used when deriving chunk ids.
    fn id_prefix(&self) -> &'static str {
        match self {
            ChunkKind::Symbol => "sym",
            ChunkKind::SubSymbol => "sub",
            ChunkKind::FileRange => "range",
            ChunkKind::Summary => "summary",
        }
    }
}

/// Metadata carried by every chunk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    /// Always `end_line - start_line + 1`
    pub line_count: usize,

    /// Rough token estimate of what the chunk transmits
    pub estimated_tokens: usize,

    /// Human-readable description of the chunk
    pub summary: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_name: Option<String>,

    /// Set on every sub-symbol chunk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_symbol_name: Option<String>,

    /// Ids of the chunks a summary chunk replaced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_from: Option<Vec<String>>,
}

/// A bounded fragment of source text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct CodeChunk {
    pub id: String,

    /// Source file path
    pub file_path: String,

    /// Start line (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    pub kind: ChunkKind,

    pub metadata: ChunkMetadata,

    /// Raw text; omitted on request and for summaries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl CodeChunk {
    /// Derives the deterministic id of a chunk from its kind and span.
    pub fn make_id(kind: ChunkKind, file_path: &str, start_line: usize, end_line: usize) -> String {
        format!("{}:{}:{}-{}", kind.id_prefix(), file_path, start_line, end_line)
    }

    /// Short label describing the chunk inside a merged summary.
    pub fn contributor_label(&self) -> String {
        if let Some(name) = &self.metadata.symbol_name {
            return name.clone();
        }
        if !self.metadata.summary.is_empty() {
            return self.metadata.summary.clone();
        }
        format!("lines {}-{}", self.start_line, self.end_line)
    }
}
