//! Plan model definition and related functionality.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{AbstractionLevel, ScopeKind, Step, TaskCategory};

/// Label given to a synthesized workspace-wide scope.
pub const GLOBAL_SCOPE_LABEL: &str = "Workspace";

/// Selector given to a synthesized workspace-wide scope.
pub const GLOBAL_SCOPE_SELECTOR: &str = "workspace root";

/// Represents a complete plan with phases, scopes and steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Natural-language goal the plan works towards
    pub goal: String,

    /// Category of the overall task
    #[serde(default)]
    pub category: TaskCategory,

    /// Ordered phases of the plan
    #[serde(default)]
    pub phases: Vec<Phase>,

    /// Regions of the codebase steps may refer to
    #[serde(default)]
    pub scopes: Vec<Scope>,

    /// Ordered steps of the plan
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A stage of the plan grouping steps at one abstraction tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: String,
    pub name: String,
    pub abstraction_level: AbstractionLevel,
    pub order: u32,
}

/// Descriptor of the part of a codebase a step applies to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    pub id: String,
    pub kind: ScopeKind,
    pub label: String,
    /// Kind-specific address: a directory, a file path (optionally
    /// `path:START-END`), or a symbol name
    pub selector: String,
}

impl Scope {
    /// Creates the workspace-wide scope used when a plan has none.
    pub fn workspace(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ScopeKind::Global,
            label: GLOBAL_SCOPE_LABEL.to_string(),
            selector: GLOBAL_SCOPE_SELECTOR.to_string(),
        }
    }
}

impl Plan {
    pub fn phase(&self, id: &str) -> Option<&Phase> {
        self.phases.iter().find(|phase| phase.id == id)
    }

    pub fn scope(&self, id: &str) -> Option<&Scope> {
        self.scopes.iter().find(|scope| scope.id == id)
    }

    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|step| step.id == id)
    }

    /// The first scope of kind `global`, if any.
    pub fn global_scope(&self) -> Option<&Scope> {
        self.scopes
            .iter()
            .find(|scope| scope.kind == ScopeKind::Global)
    }

    /// Phases sorted by their `order` field (stable for equal orders).
    pub fn phases_in_order(&self) -> Vec<&Phase> {
        let mut phases: Vec<&Phase> = self.phases.iter().collect();
        phases.sort_by_key(|phase| phase.order);
        phases
    }

    /// Returns a copy with the steps replaced.
    #[must_use]
    pub fn with_steps(&self, steps: Vec<Step>) -> Self {
        Self {
            steps,
            ..self.clone()
        }
    }

    /// Returns a copy with phases and steps replaced.
    #[must_use]
    pub fn with_phases_and_steps(&self, phases: Vec<Phase>, steps: Vec<Step>) -> Self {
        Self {
            phases,
            steps,
            ..self.clone()
        }
    }

    /// Returns a copy with scopes and steps replaced.
    #[must_use]
    pub fn with_scopes_and_steps(&self, scopes: Vec<Scope>, steps: Vec<Step>) -> Self {
        Self {
            scopes,
            steps,
            ..self.clone()
        }
    }
}
