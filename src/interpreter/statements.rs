//! Assignment and expression-statement execution.
//!
//! Adds `impl Tracer` methods for the two simple statement forms:
//! assignments (single, chained and tuple targets) and expression statements,
//! which must be calls. Calls dispatch to `print`, to a user-defined
//! function, or fail with `UnsupportedCall`.

use crate::interpreter::constants::PRINT_BUILTIN;
use crate::interpreter::engine::Tracer;
use crate::interpreter::errors::TraceError;
use crate::interpreter::expressions::{ExprTrace, Snapshot};
use crate::memory::value::Value;
use crate::parser::ast::{Expr, SourceLocation};
use crate::trace::{PrintStep, Step, Variable};
use tracing::debug;

/// Names bound by one assignment target
enum Target {
    Single(String),
    Unpack(Vec<String>),
}

impl Tracer {
    /// Executes `t1 = t2 = ... = value`.
    ///
    /// The table is updated with the final value once per target before any
    /// Variable step is appended; then one Variable step is appended per
    /// snapshot of the value, per target name.
    pub(crate) fn execute_assign(
        &mut self,
        targets: &[Expr],
        value: &Expr,
        location: SourceLocation,
    ) -> Result<(), TraceError> {
        let targets = targets
            .iter()
            .map(Self::assignment_target)
            .collect::<Result<Vec<_>, _>>()?;

        let value_trace = match value {
            Expr::Call {
                func,
                args,
                location,
            } => ExprTrace::resolved(self.execute_call(func, args, *location)?),
            _ => self.evaluator().symbolic_trace(value)?,
        };

        for target in &targets {
            match target {
                Target::Single(name) => self.table.set(name, value_trace.value.clone()),
                Target::Unpack(names) => {
                    let items = Self::unpack(&value_trace.value, names.len(), location)?;
                    for (name, item) in names.iter().zip(items) {
                        self.table.set(name, item.clone());
                    }
                }
            }
        }

        let depth = self.depth();
        for snapshot in &value_trace.snapshots {
            for target in &targets {
                match target {
                    Target::Single(name) => self.emit(Step::Variable(Variable {
                        depth,
                        target: name.clone(),
                        expr: snapshot.to_string(),
                    }))?,
                    Target::Unpack(names) => {
                        let texts = Self::element_texts(snapshot, &value_trace.value);
                        for (name, text) in names.iter().zip(texts) {
                            self.emit(Step::Variable(Variable {
                                depth,
                                target: name.clone(),
                                expr: text,
                            }))?;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn assignment_target(target: &Expr) -> Result<Target, TraceError> {
        match target {
            Expr::Name { id, .. } => Ok(Target::Single(id.clone())),
            Expr::Tuple { elements, .. } => elements
                .iter()
                .map(|element| match element {
                    Expr::Name { id, .. } => Ok(id.clone()),
                    other => Err(TraceError::unsupported(
                        format!("{} in assignment target", other.kind_name()),
                        other.location(),
                    )),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Target::Unpack),
            other => Err(TraceError::unsupported(
                format!("{} assignment target", other.kind_name()),
                other.location(),
            )),
        }
    }

    fn unpack(value: &Value, expected: usize, location: SourceLocation) -> Result<&[Value], TraceError> {
        match value {
            Value::Tuple(items) if items.len() == expected => Ok(items),
            Value::Tuple(items) => Err(TraceError::UnpackMismatch {
                expected,
                got: items.len(),
                location,
            }),
            other => Err(TraceError::TypeMismatch {
                message: format!("cannot unpack non-tuple {}", other.type_name()),
                location,
            }),
        }
    }

    /// Per-position texts of a snapshot bound to a tuple target
    fn element_texts(snapshot: &Snapshot, value: &Value) -> Vec<String> {
        match (snapshot.elements(), value) {
            (Some(parts), _) => parts.to_vec(),
            (None, Value::Tuple(items)) => items.iter().map(Value::to_string).collect(),
            (None, _) => vec![snapshot.to_string()],
        }
    }

    /// An expression statement; only calls produce steps
    pub(crate) fn execute_expression_statement(&mut self, expr: &Expr) -> Result<(), TraceError> {
        match expr {
            Expr::Call {
                func,
                args,
                location,
            } => self.execute_call(func, args, *location).map(|_| ()),
            other => Err(TraceError::unsupported(
                format!("{} expression statement", other.kind_name()),
                other.location(),
            )),
        }
    }

    /// Dispatch a call by name and return its result
    pub(crate) fn execute_call(
        &mut self,
        func: &str,
        args: &[Expr],
        location: SourceLocation,
    ) -> Result<Value, TraceError> {
        if func == PRINT_BUILTIN {
            self.execute_print(args, location)?;
            return Ok(Value::None);
        }

        match self.table.function(func) {
            Some(function) => self.call_function(&function, args, location),
            None => Err(TraceError::UnsupportedCall {
                name: func.to_string(),
                location,
            }),
        }
    }

    /// Executes `print(...)`: one Print step per snapshot of each argument
    fn execute_print(&mut self, args: &[Expr], location: SourceLocation) -> Result<(), TraceError> {
        let id = self.id_at(location);
        let depth = self.depth();
        debug!(id, args = args.len(), "print");

        for arg in args {
            let arg_trace = self.stages(arg)?;
            for (expr, highlight) in Self::highlighted_stages(&arg_trace) {
                self.emit(Step::Print(PrintStep {
                    id,
                    depth,
                    expr,
                    highlight,
                }))?;
            }
        }

        Ok(())
    }
}
