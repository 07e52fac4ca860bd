//! Loop statement execution (`for ... in range(...)`).
//!
//! Adds `impl Tracer` methods for the only loop form the traced subset
//! supports. Each pass binds the target, appends a For step carrying a fresh
//! [`Condition`], walks the body one level deeper and derives the next
//! Condition with an advanced `cur`.
//!
//! `return` inside a loop body (within a function) unwinds immediately by
//! propagating [`Flow::Return`].

use crate::interpreter::constants::RANGE_BUILTIN;
use crate::interpreter::engine::{Flow, Tracer};
use crate::interpreter::errors::TraceError;
use crate::memory::value::Value;
use crate::parser::ast::{Expr, SourceLocation, Stmt};
use crate::trace::{Condition, ForStep, Step};
use tracing::debug;

impl Tracer {
    /// Executes `for target in range(...): body`.
    ///
    /// Iteration follows range semantics: ascending for a positive step,
    /// descending for a negative one, and no passes at all when the step's
    /// sign cannot reach `end` from `start`.
    pub(crate) fn execute_for(
        &mut self,
        target: &Expr,
        iter: &Expr,
        body: &[Stmt],
        location: SourceLocation,
    ) -> Result<Flow, TraceError> {
        let Expr::Name { id: target, .. } = target else {
            return Err(TraceError::unsupported(
                format!("{} loop target", target.kind_name()),
                target.location(),
            ));
        };

        let (start, end, step) = self.range_arguments(iter)?;
        let id = self.id_at(location);
        let mut condition = Condition::new(target.as_str(), start, end, step);
        debug!(id, target = %target, start, end, step, "entering for loop");

        while condition.in_range() {
            debug!(id, cur = condition.cur, "loop iteration");
            self.table.set(&condition.target, Value::Int(condition.cur));

            let highlight = condition.changed_attr();
            self.emit(Step::For(ForStep {
                id,
                depth: self.depth(),
                condition: condition.clone(),
                highlight,
            }))?;

            if let Flow::Return(value) = self.execute_nested(body)? {
                return Ok(Flow::Return(value));
            }

            condition = condition.advance();
        }

        Ok(Flow::Normal)
    }

    /// Resolve `range(end)`, `range(start, end)` or `range(start, end, step)`
    pub(crate) fn range_arguments(&self, iter: &Expr) -> Result<(i64, i64, i64), TraceError> {
        let (func, args, location) = match iter {
            Expr::Call {
                func,
                args,
                location,
            } => (func, args, *location),
            other => {
                return Err(TraceError::unsupported(
                    format!("{} loop iterable", other.kind_name()),
                    other.location(),
                ))
            }
        };

        if func != RANGE_BUILTIN {
            return Err(TraceError::UnsupportedCall {
                name: func.clone(),
                location,
            });
        }

        let arity_error = || {
            TraceError::malformed(
                format!("range expected 1 to 3 arguments, got {}", args.len()),
                location,
            )
        };
        if !(1..=3).contains(&args.len()) {
            return Err(arity_error());
        }

        let values = args
            .iter()
            .map(|arg| self.range_argument(arg))
            .collect::<Result<Vec<_>, _>>()?;

        let (start, end, step) = match values[..] {
            [end] => (0, end, 1),
            [start, end] => (start, end, 1),
            [start, end, step] => (start, end, step),
            _ => return Err(arity_error()),
        };

        if step == 0 {
            return Err(TraceError::malformed("range() step must not be zero", location));
        }

        Ok((start, end, step))
    }

    fn range_argument(&self, arg: &Expr) -> Result<i64, TraceError> {
        if !matches!(
            arg,
            Expr::Name { .. } | Expr::Constant { .. } | Expr::BinaryOp { .. }
        ) {
            return Err(TraceError::malformed(
                format!(
                    "range argument must be a name, constant or arithmetic expression, got {}",
                    arg.kind_name()
                ),
                arg.location(),
            ));
        }

        let value = self.evaluator().evaluate(arg)?;
        value.as_int().ok_or_else(|| {
            TraceError::malformed(
                format!("range argument must be an integer, got {}", value.type_name()),
                arg.location(),
            )
        })
    }
}
