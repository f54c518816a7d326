//! Heuristic detection of logical split points in source text.
//!
//! This is a line scanner, not a parser. It assumes a brace-delimited
//! language and recognises control-flow blocks by their opening keyword
//! and comment lines by prefix. Brace-less languages and several blocks
//! opened and closed on one line are mis-detected; callers only rely on
//! the result as a set of candidate cut points.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

static CONDITIONAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\}\s*)?(?:else\s+if|elif|elsif|else|if|unless)\b").expect("valid regex")
});
static LOOP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:for|foreach|while|do|loop)\b").expect("valid regex"));
static SWITCH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:switch|match|select)\b").expect("valid regex"));
static EXCEPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\}\s*)?(?:try|catch|finally|except|rescue)\b").expect("valid regex")
});

/// Control-flow construct a block was opened by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    Conditional,
    Loop,
    Switch,
    ExceptionHandling,
}

impl BlockKind {
    fn classify(trimmed: &str) -> Option<Self> {
        if CONDITIONAL_RE.is_match(trimmed) {
            Some(BlockKind::Conditional)
        } else if LOOP_RE.is_match(trimmed) {
            Some(BlockKind::Loop)
        } else if SWITCH_RE.is_match(trimmed) {
            Some(BlockKind::Switch)
        } else if EXCEPTION_RE.is_match(trimmed) {
            Some(BlockKind::ExceptionHandling)
        } else {
            None
        }
    }
}

/// A completed block, in absolute line numbers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub kind: BlockKind,
    pub start_line: usize,
    pub end_line: usize,
    /// Nesting depth at which the block was opened
    pub depth: usize,
}

/// Everything the detector found in one text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Boundaries {
    /// Completed blocks, ordered by start line
    pub blocks: Vec<Block>,
    /// Lines recognised as comments, ascending
    pub comment_lines: Vec<usize>,
}

impl Boundaries {
    /// All candidate boundary lines: block starts, block ends and comments.
    pub fn candidate_lines(&self) -> BTreeSet<usize> {
        self.blocks
            .iter()
            .flat_map(|block| [block.start_line, block.end_line])
            .chain(self.comment_lines.iter().copied())
            .collect()
    }
}

fn starts_with_comment(trimmed: &str) -> bool {
    trimmed.starts_with("//")
        || trimmed.starts_with("/*")
        || trimmed.starts_with('*')
        || trimmed.starts_with("--")
        || trimmed.starts_with("<!--")
        || trimmed.starts_with("\"\"\"")
        || is_hash_comment(trimmed)
}

/// Whether a trimmed line is (or contains) a comment marker.
pub fn is_comment_line(trimmed: &str) -> bool {
    starts_with_comment(trimmed) || trimmed.contains("/*") || trimmed.contains("*/")
}

/// The code in front of a trailing comment; empty for a comment-only line.
fn code_portion(trimmed: &str) -> &str {
    if starts_with_comment(trimmed) {
        return "";
    }
    let cut = ["//", "/*"]
        .iter()
        .filter_map(|marker| trimmed.find(marker))
        .min()
        .unwrap_or(trimmed.len());
    trimmed[..cut].trim_end()
}

/// `# comment` but not `#[attr]`, `#include` or `#!`.
fn is_hash_comment(trimmed: &str) -> bool {
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some('#'), None) => true,
        (Some('#'), Some(next)) => next.is_whitespace() || next == '#',
        _ => false,
    }
}

fn brace_balance(line: &str) -> isize {
    line.chars().fold(0, |balance, ch| match ch {
        '{' => balance + 1,
        '}' => balance - 1,
        _ => balance,
    })
}

struct OpenBlock {
    kind: BlockKind,
    start_line: usize,
    depth: usize,
}

/// Scans `text` whose first line is `start_line`.
///
/// A line opening a control-flow block pushes it onto a nesting stack; any
/// line with more closing than opening braces pops the innermost block and
/// completes it at that line. Comment lines are recorded, and code sharing
/// a line with a comment still counts.
pub fn detect_boundaries(text: &str, start_line: usize) -> Boundaries {
    let mut boundaries = Boundaries::default();
    let mut stack: Vec<OpenBlock> = Vec::new();
    let mut depth = 0usize;

    for (idx, line) in text.lines().enumerate() {
        let line_no = start_line + idx;
        let trimmed = line.trim();

        if is_comment_line(trimmed) {
            boundaries.comment_lines.push(line_no);
        }
        let code = code_portion(trimmed);

        if let Some(kind) = BlockKind::classify(code) {
            stack.push(OpenBlock {
                kind,
                start_line: line_no,
                depth,
            });
            depth += 1;
        }

        if brace_balance(code) < 0 {
            if let Some(open) = stack.pop() {
                boundaries.blocks.push(Block {
                    kind: open.kind,
                    start_line: open.start_line,
                    end_line: line_no,
                    depth: open.depth,
                });
            }
            depth = depth.saturating_sub(1);
        }
    }

    boundaries.blocks.sort_by_key(|block| block.start_line);
    boundaries
}
