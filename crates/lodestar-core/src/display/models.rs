//! Display implementations for domain models.
//!
//! Markdown output, kept apart from the model definitions. The compact
//! tabular form of a plan lives in [`super::compact`].

use std::fmt;

use crate::models::{Change, CodeChunk, Plan, Scope, Step, ValidationIssue};

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.goal)?;
        writeln!(f)?;
        writeln!(f, "- Category: {}", self.category.as_str())?;
        writeln!(
            f,
            "- Phases: {}, steps: {}, scopes: {}",
            self.phases.len(),
            self.steps.len(),
            self.scopes.len()
        )?;

        if !self.scopes.is_empty() {
            writeln!(f, "\n## Scopes")?;
            writeln!(f)?;
            for scope in &self.scopes {
                writeln!(f, "{scope}")?;
            }
        }

        if self.steps.is_empty() {
            writeln!(f, "\nNo steps in this plan.")?;
            return Ok(());
        }

        for phase in self.phases_in_order() {
            writeln!(
                f,
                "\n## {} ({}, {})",
                phase.name, phase.id, phase.abstraction_level
            )?;
            writeln!(f)?;
            let mut steps: Vec<&Step> = self
                .steps
                .iter()
                .filter(|s| s.phase_id == phase.id)
                .collect();
            steps.sort_by_key(|s| s.order);
            if steps.is_empty() {
                writeln!(f, "No steps in this phase.")?;
                writeln!(f)?;
            }
            for step in steps {
                write!(f, "{step}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- **{}** `{}` ({}): {}",
            self.label,
            self.id,
            self.kind.as_str(),
            self.selector
        )
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. {} ({})",
            self.id,
            self.title,
            self.status.with_icon()
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "- Category: {}, level: {}",
            self.category, self.abstraction_level
        )?;
        if let Some(scope) = &self.scope_id {
            writeln!(f, "- Scope: {scope}")?;
        }
        if !self.dependencies.is_empty() {
            writeln!(f, "- Depends on: {}", self.dependencies.join(", "))?;
        }
        if !self.suggested_tools.is_empty() {
            writeln!(f, "- Tools: {}", self.suggested_tools.join(", "))?;
        }
        writeln!(f)?;

        if !self.summary.is_empty() {
            writeln!(f, "{}", self.summary)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for CodeChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {} lines {}-{} ({})",
            self.file_path,
            self.start_line,
            self.end_line,
            self.kind.as_str()
        )?;
        writeln!(f)?;
        writeln!(f, "- Id: `{}`", self.id)?;
        writeln!(
            f,
            "- Lines: {}, ~{} tokens",
            self.metadata.line_count, self.metadata.estimated_tokens
        )?;
        if let Some(parent) = &self.metadata.parent_symbol_name {
            writeln!(f, "- Part of: {parent}")?;
        }
        if let Some(merged) = &self.metadata.merged_from {
            writeln!(f, "- Merged from: {}", merged.join(", "))?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.metadata.summary)?;
        writeln!(f)?;

        if let Some(content) = &self.content {
            writeln!(f, "```")?;
            writeln!(f, "{content}")?;
            writeln!(f, "```")?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::LevelCorrected { step_id, from, to } => {
                write!(f, "Step {step_id}: level {from} corrected to {to}")
            }
            Change::ScopeSynthesized { scope_id } => {
                write!(f, "Added global scope {scope_id}")
            }
            Change::ScopeReassigned { step_id, from, to } => {
                write!(f, "Step {step_id}: unknown scope {from} replaced by {to}")
            }
            Change::PhaseSynthesized { phase_id } => write!(f, "Added phase {phase_id}"),
            Change::PhaseReassigned { step_id, from, to } => {
                write!(f, "Step {step_id}: phase {from} replaced by {to}")
            }
            Change::StepsMerged { into, absorbed } => {
                write!(f, "Merged {} into step {}", absorbed.join(", "), into)
            }
            Change::PhaseDropped { phase_id } => write!(f, "Dropped phase {phase_id}"),
            Change::StepDropped { step_id, reason } => {
                write!(f, "Dropped step {step_id} ({reason})")
            }
            Change::DependencyRemoved {
                step_id,
                dependency,
                reason,
            } => write!(
                f,
                "Step {step_id}: dependency on {dependency} removed ({reason})"
            ),
            Change::StepRestored { step_id } => write!(f, "Restored step {step_id}"),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::NoPhases => write!(f, "plan has no phases"),
            ValidationIssue::NoSteps => write!(f, "plan has no steps"),
            ValidationIssue::GlobalScopeCount { count } => {
                write!(f, "expected exactly one global scope, found {count}")
            }
            ValidationIssue::UnknownPhase { step_id, phase_id } => {
                write!(f, "step {step_id} refers to unknown phase {phase_id}")
            }
            ValidationIssue::UnknownScope { step_id, scope_id } => {
                write!(f, "step {step_id} refers to unknown scope {scope_id}")
            }
            ValidationIssue::UnknownDependency {
                step_id,
                dependency,
            } => write!(f, "step {step_id} depends on unknown step {dependency}"),
            ValidationIssue::SelfDependency { step_id } => {
                write!(f, "step {step_id} depends on itself")
            }
            ValidationIssue::DependencyCycle { step_ids } => {
                write!(f, "dependency cycle {}", step_ids.join(" -> "))
            }
            ValidationIssue::DuplicateStepId { step_id } => {
                write!(f, "step id {step_id} is used more than once")
            }
        }
    }
}
