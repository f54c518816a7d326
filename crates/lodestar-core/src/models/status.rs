//! Closed enumerations used by plans, steps and scopes.

use std::{fmt, str::FromStr};

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Three-tier abstraction scale shared by phases and steps.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum AbstractionLevel {
    /// Goal framing
    Abstract,
    /// Investigation and design
    Planning,
    /// Concrete edits and verification
    #[default]
    Execution,
}

impl AbstractionLevel {
    /// Numeric tier (0 = abstract, 2 = execution).
    pub fn as_u8(&self) -> u8 {
        match self {
            AbstractionLevel::Abstract => 0,
            AbstractionLevel::Planning => 1,
            AbstractionLevel::Execution => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AbstractionLevel::Abstract => "abstract",
            AbstractionLevel::Planning => "planning",
            AbstractionLevel::Execution => "execution",
        }
    }
}

impl fmt::Display for AbstractionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of the overall task; fixes the phase template upstream.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    /// Defect fix
    Bugfix,
    /// New functionality
    Feature,
    /// Restructuring without behavior change
    Refactor,
    #[default]
    Other,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Bugfix => "bugfix",
            TaskCategory::Feature => "feature",
            TaskCategory::Refactor => "refactor",
            TaskCategory::Other => "other",
        }
    }
}

/// What a single step does. Drives the abstraction-level policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub enum StepCategory {
    ClarifyGoal,
    GatherContext,
    ScanCode,
    DesignSolution,
    EditCode,
    RunTests,
    /// Takes the level of the phase it lives in
    Refine,
}

impl StepCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepCategory::ClarifyGoal => "clarifyGoal",
            StepCategory::GatherContext => "gatherContext",
            StepCategory::ScanCode => "scanCode",
            StepCategory::DesignSolution => "designSolution",
            StepCategory::EditCode => "editCode",
            StepCategory::RunTests => "runTests",
            StepCategory::Refine => "refine",
        }
    }
}

impl fmt::Display for StepCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of codebase region a scope describes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    Global,
    Module,
    File,
    Symbol,
}

impl ScopeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Global => "global",
            ScopeKind::Module => "module",
            ScopeKind::File => "file",
            ScopeKind::Symbol => "symbol",
        }
    }
}

/// Type-safe enumeration of step statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Step is pending
    #[default]
    Todo,

    /// Step is being worked on
    #[serde(alias = "in_progress")]
    InProgress,

    /// Step has been completed
    Done,
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "todo" | "pending" => Ok(StepStatus::Todo),
            "inprogress" | "in_progress" => Ok(StepStatus::InProgress),
            "done" => Ok(StepStatus::Done),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Todo => "todo",
            StepStatus::InProgress => "inprogress",
            StepStatus::Done => "done",
        }
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// ```rust
    /// use lodestar_core::models::StepStatus;
    ///
    /// assert_eq!(StepStatus::Done.with_icon(), "✓ Done");
    /// assert_eq!(StepStatus::InProgress.with_icon(), "➤ In Progress");
    /// assert_eq!(StepStatus::Todo.with_icon(), "○ Todo");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepStatus::Done => "✓ Done",
            StepStatus::InProgress => "➤ In Progress",
            StepStatus::Todo => "○ Todo",
        }
    }
}
