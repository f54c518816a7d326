//! Compact delimited encoding of a plan.
//!
//! A `[plan]` section with the goal, then one section per table
//! (`[phases]`, `[scopes]`, `[steps]`), each with a header row followed by
//! `|`-delimited rows. Cells escape `\`, `|` and line breaks with a
//! backslash; list cells are comma-joined.
//!
//! ```text
//! [plan]
//! goal|category
//! Fix the login redirect|bugfix
//!
//! [phases]
//! id|name|level|order
//! p1|Investigate|planning|0
//!
//! [scopes]
//! id|kind|label|selector
//! scope-global|global|Workspace|workspace root
//!
//! [steps]
//! id|phase|level|order|category|title|summary|scope|dependencies|tools|status
//! s1|p1|planning|0|scanCode|Read the handler|Find the redirect|scope-global||grep|todo
//! ```

use std::fmt;

use crate::models::Plan;

/// Escapes a cell so it never contains a raw delimiter or line break.
pub fn escape_cell(cell: &str) -> String {
    let mut out = String::with_capacity(cell.len());
    for ch in cell.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '|' => out.push_str("\\|"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[&str]) -> fmt::Result {
    let escaped: Vec<String> = cells.iter().map(|c| escape_cell(c)).collect();
    writeln!(f, "{}", escaped.join("|"))
}

/// Wrapper rendering a plan in the compact encoding.
pub struct CompactPlan<'a>(pub &'a Plan);

impl fmt::Display for CompactPlan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.0;

        writeln!(f, "[plan]")?;
        writeln!(f, "goal|category")?;
        write_row(f, &[plan.goal.as_str(), plan.category.as_str()])?;

        writeln!(f)?;
        writeln!(f, "[phases]")?;
        writeln!(f, "id|name|level|order")?;
        for phase in plan.phases_in_order() {
            write_row(
                f,
                &[
                    phase.id.as_str(),
                    phase.name.as_str(),
                    phase.abstraction_level.as_str(),
                    phase.order.to_string().as_str(),
                ],
            )?;
        }

        writeln!(f)?;
        writeln!(f, "[scopes]")?;
        writeln!(f, "id|kind|label|selector")?;
        for scope in &plan.scopes {
            write_row(
                f,
                &[
                    scope.id.as_str(),
                    scope.kind.as_str(),
                    scope.label.as_str(),
                    scope.selector.as_str(),
                ],
            )?;
        }

        writeln!(f)?;
        writeln!(f, "[steps]")?;
        writeln!(
            f,
            "id|phase|level|order|category|title|summary|scope|dependencies|tools|status"
        )?;
        let mut steps: Vec<_> = plan.steps.iter().collect();
        steps.sort_by_key(|s| s.order);
        for step in steps {
            write_row(
                f,
                &[
                    step.id.as_str(),
                    step.phase_id.as_str(),
                    step.abstraction_level.as_str(),
                    step.order.to_string().as_str(),
                    step.category.as_str(),
                    step.title.as_str(),
                    step.summary.as_str(),
                    step.scope_id.as_deref().unwrap_or(""),
                    step.dependencies.join(",").as_str(),
                    step.suggested_tools.join(",").as_str(),
                    step.status.as_str(),
                ],
            )?;
        }
        Ok(())
    }
}
