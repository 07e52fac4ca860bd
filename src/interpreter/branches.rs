//! Conditional execution (`if` / `elif` / `else`).
//!
//! Every condition that gets evaluated appends one If step per snapshot, so
//! the replay shows `a > b` resolving to `12 > 10` and then `True`. Branches
//! after the first truthy one are never evaluated.

use crate::interpreter::engine::{Flow, Tracer};
use crate::interpreter::errors::TraceError;
use crate::parser::ast::{Branch, ElseBranch};
use crate::trace::{BranchKind, IfStep, Step};
use tracing::debug;

impl Tracer {
    pub(crate) fn execute_if(
        &mut self,
        branches: &[Branch],
        orelse: Option<&ElseBranch>,
    ) -> Result<Flow, TraceError> {
        let depth = self.depth();

        for (index, branch) in branches.iter().enumerate() {
            let kind = if index == 0 {
                BranchKind::If
            } else {
                BranchKind::Elif
            };
            let id = self.id_at(branch.location);

            let condition = self.stages(&branch.condition)?;
            for (expr, highlight) in Self::highlighted_stages(&condition) {
                self.emit(Step::If(IfStep {
                    id,
                    depth,
                    branch: kind,
                    expr,
                    highlight,
                }))?;
            }

            let taken = condition.value.is_truthy();
            debug!(id, branch = %kind, taken, "condition evaluated");
            if taken {
                return self.execute_nested(&branch.body);
            }
        }

        let Some(orelse) = orelse else {
            return Ok(Flow::Normal);
        };

        let id = self.id_at(orelse.location);
        self.emit(Step::If(IfStep {
            id,
            depth,
            branch: BranchKind::Else,
            expr: String::new(),
            highlight: Vec::new(),
        }))?;
        debug!(id, "else branch taken");

        self.execute_nested(&orelse.body)
    }
}
