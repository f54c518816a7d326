//! Step model definition and related functionality.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{AbstractionLevel, StepCategory, StepStatus};

/// Represents an individual step within a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Unique identifier for the step
    pub id: String,

    /// ID of the phase the step belongs to
    pub phase_id: String,

    /// Abstraction tier of the step
    pub abstraction_level: AbstractionLevel,

    /// Order of the step within the plan
    pub order: u32,

    /// What kind of work the step performs
    pub category: StepCategory,

    /// Brief title of the step
    pub title: String,

    /// One-paragraph description of the work
    #[serde(default)]
    pub summary: String,

    /// Scope the step applies to, if any
    #[serde(default)]
    pub scope_id: Option<String>,

    /// Steps that must complete before this one
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Tools an agent is expected to reach for
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_tools: Vec<String>,

    /// Current status of the step
    #[serde(default)]
    pub status: StepStatus,
}

impl Step {
    /// Returns a copy with the abstraction level replaced.
    #[must_use]
    pub fn with_level(&self, level: AbstractionLevel) -> Self {
        Self {
            abstraction_level: level,
            ..self.clone()
        }
    }

    /// Returns a copy with the scope replaced.
    #[must_use]
    pub fn with_scope(&self, scope_id: Option<String>) -> Self {
        Self {
            scope_id,
            ..self.clone()
        }
    }

    /// Returns a copy assigned to another phase.
    #[must_use]
    pub fn with_phase(&self, phase_id: impl Into<String>) -> Self {
        Self {
            phase_id: phase_id.into(),
            ..self.clone()
        }
    }

    /// Returns a copy with the dependency list replaced.
    #[must_use]
    pub fn with_dependencies(&self, dependencies: Vec<String>) -> Self {
        Self {
            dependencies,
            ..self.clone()
        }
    }

    pub fn depends_on(&self, id: &str) -> bool {
        self.dependencies.iter().any(|dep| dep == id)
    }
}
