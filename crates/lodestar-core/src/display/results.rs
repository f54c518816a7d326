//! Display for engine outputs.
//!
//! Reports open with a short summary, then list warnings and changes, then
//! the payload itself.

use std::fmt;

use crate::models::{ChunkResult, CompressionReport, ValidationIssue};

fn write_warnings(f: &mut fmt::Formatter<'_>, warnings: &[String]) -> fmt::Result {
    if warnings.is_empty() {
        return Ok(());
    }
    writeln!(f, "## Warnings")?;
    writeln!(f)?;
    for warning in warnings {
        writeln!(f, "- {warning}")?;
    }
    writeln!(f)
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.stats;
        writeln!(
            f,
            "Compressed plan: {} → {} phases, {} → {} steps",
            stats.phases_before, stats.phases_after, stats.steps_before, stats.steps_after
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "- Merged: {}, dropped: {} steps / {} phases",
            stats.steps_merged, stats.steps_dropped, stats.phases_dropped
        )?;
        writeln!(
            f,
            "- Level corrections: {}, scope reassignments: {}",
            stats.level_corrections, stats.scope_reassignments
        )?;
        writeln!(f)?;

        write_warnings(f, &self.warnings)?;

        if !self.changes.is_empty() {
            writeln!(f, "## Changes")?;
            writeln!(f)?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
            writeln!(f)?;
        }

        write!(f, "{}", self.plan)
    }
}

impl fmt::Display for ChunkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.stats;
        writeln!(
            f,
            "{} chunks, {} lines, ~{} tokens ({} merged)",
            stats.total_chunks, stats.total_lines, stats.estimated_tokens, stats.chunks_merged
        )?;
        writeln!(f)?;

        write_warnings(f, &self.warnings)?;

        if self.chunks.is_empty() {
            return writeln!(f, "No chunks.");
        }
        for chunk in &self.chunks {
            write!(f, "{chunk}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying the outcome of a plan validation.
pub struct Issues(pub Vec<ValidationIssue>);

impl Issues {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationIssue> {
        self.0.iter()
    }
}

impl fmt::Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "Plan is valid.");
        }
        writeln!(f, "Found {} issues:", self.0.len())?;
        writeln!(f)?;
        for issue in &self.0 {
            writeln!(f, "- {issue}")?;
        }
        Ok(())
    }
}
