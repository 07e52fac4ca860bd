//! Expression evaluation implementation
//!
//! The [`Evaluator`] handles the restricted expression shapes a trace run
//! supports:
//!
//! - Constants and identifier references
//! - Binary operators `+ - * /`
//! - Comparisons (conditions only)
//! - Tuples of the above
//!
//! Besides computing a [`Value`], [`Evaluator::symbolic_trace`] produces the
//! ordered textual snapshots of an expression that feed the highlight engine:
//! the symbolic form as written, the same text with identifiers replaced by
//! their current values, and the resolved result.
//!
//! # Identifier Substitution
//!
//! Substitution is token based: only standalone runs of one or two ASCII
//! letters count as identifiers. `total + 1` therefore has no substituted
//! stage. Widening the pattern would change every highlight downstream.

use crate::interpreter::errors::TraceError;
use crate::memory::scope::VariableTable;
use crate::memory::value::{format_tuple, Value, ValueError};
use crate::parser::ast::*;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z]{1,2}\b").expect("identifier pattern is valid"));

/// One textual stage of an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Scalar(String),
    /// Element-wise stages of a tuple expression
    Tuple(Vec<String>),
}

impl Snapshot {
    /// Element texts of a tuple snapshot
    pub fn elements(&self) -> Option<&[String]> {
        match self {
            Snapshot::Tuple(parts) => Some(parts),
            Snapshot::Scalar(_) => None,
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Snapshot::Scalar(text) => write!(f, "{}", text),
            Snapshot::Tuple(parts) => write!(f, "{}", format_tuple(parts)),
        }
    }
}

/// Snapshots of an expression plus its final value
#[derive(Debug, Clone, PartialEq)]
pub struct ExprTrace {
    pub snapshots: Vec<Snapshot>,
    pub value: Value,
}

impl ExprTrace {
    /// A single resolved snapshot
    pub fn resolved(value: Value) -> Self {
        ExprTrace {
            snapshots: vec![Snapshot::Scalar(value.to_string())],
            value,
        }
    }

    /// Snapshot texts, for the highlight engine
    pub fn texts(&self) -> Vec<String> {
        self.snapshots.iter().map(Snapshot::to_string).collect()
    }
}

/// Evaluates expressions against a variable table without mutating it
pub struct Evaluator<'a> {
    table: &'a VariableTable,
}

impl<'a> Evaluator<'a> {
    pub fn new(table: &'a VariableTable) -> Self {
        Evaluator { table }
    }

    /// Evaluate an expression and return its value
    pub fn evaluate(&self, expr: &Expr) -> Result<Value, TraceError> {
        match expr {
            Expr::Constant { value, .. } => Ok(literal_value(*value)),

            Expr::Name { id, location } => self.table.get(id, *location),

            Expr::BinaryOp {
                op,
                left,
                right,
                location,
            } => {
                let apply: fn(&Value, &Value) -> Result<Value, ValueError> = match op {
                    BinOp::Add => Value::add,
                    BinOp::Sub => Value::sub,
                    BinOp::Mul => Value::mul,
                    BinOp::Div => Value::div,
                    BinOp::FloorDiv | BinOp::Mod | BinOp::Pow => {
                        return Err(TraceError::UnsupportedOperator {
                            op: op.symbol().to_string(),
                            location: *location,
                        })
                    }
                };
                let lhs = self.evaluate(left)?;
                let rhs = self.evaluate(right)?;
                apply(&lhs, &rhs).map_err(|e| TraceError::from_value(e, *location))
            }

            Expr::Compare {
                op,
                left,
                right,
                location,
            } => {
                let lhs = self.evaluate(left)?;
                let rhs = self.evaluate(right)?;
                lhs.compare(*op, &rhs)
                    .map_err(|e| TraceError::from_value(e, *location))
            }

            Expr::Tuple { elements, .. } => elements
                .iter()
                .map(|element| self.evaluate(element))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Tuple),

            Expr::Call { location, .. } => Err(TraceError::unsupported(expr.kind_name(), *location)),
        }
    }

    /// Ordered snapshots of an expression: symbolic, substituted, resolved
    ///
    /// Operators get all three stages (the substituted one only when an
    /// identifier occurs). Tuples zip their elements' stages, repeating an
    /// element's last stage once it is exhausted. Anything else resolves to
    /// a single snapshot.
    pub fn symbolic_trace(&self, expr: &Expr) -> Result<ExprTrace, TraceError> {
        match expr {
            Expr::BinaryOp { .. } | Expr::Compare { .. } => self.operator_trace(expr),

            Expr::Tuple { elements, .. } => {
                let mut stages = Vec::with_capacity(elements.len());
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    let element_trace = match element {
                        Expr::BinaryOp { .. } | Expr::Compare { .. } => {
                            self.operator_trace(element)?
                        }
                        _ => ExprTrace::resolved(self.evaluate(element)?),
                    };
                    stages.push(element_trace.texts());
                    values.push(element_trace.value);
                }

                Ok(ExprTrace {
                    snapshots: zip_padded(&stages),
                    value: Value::Tuple(values),
                })
            }

            _ => Ok(ExprTrace::resolved(self.evaluate(expr)?)),
        }
    }

    fn operator_trace(&self, expr: &Expr) -> Result<ExprTrace, TraceError> {
        let symbolic = expr.to_string();
        let value = self.evaluate(expr)?;

        let mut snapshots = vec![Snapshot::Scalar(symbolic.clone())];
        if let Some(substituted) = self.substitute(&symbolic, expr.location())? {
            snapshots.push(Snapshot::Scalar(substituted));
        }
        snapshots.push(Snapshot::Scalar(value.to_string()));

        Ok(ExprTrace { snapshots, value })
    }

    /// Replace every identifier token with its current value
    ///
    /// Returns `None` when the text contains no identifier token.
    pub fn substitute(
        &self,
        text: &str,
        location: SourceLocation,
    ) -> Result<Option<String>, TraceError> {
        let mut result = String::with_capacity(text.len());
        let mut last = 0;
        let mut found = false;

        for token in IDENTIFIER.find_iter(text) {
            let value = self.table.get(token.as_str(), location)?;
            result.push_str(&text[last..token.start()]);
            result.push_str(&value.to_string());
            last = token.end();
            found = true;
        }

        if !found {
            return Ok(None);
        }
        result.push_str(&text[last..]);
        Ok(Some(result))
    }
}

pub(crate) fn literal_value(literal: Literal) -> Value {
    match literal {
        Literal::Int(n) => Value::Int(n),
        Literal::Float(x) => Value::Float(x),
        Literal::Bool(b) => Value::Bool(b),
        Literal::None => Value::None,
    }
}

/// Zip per-element stage lists into tuple snapshots
fn zip_padded(stages: &[Vec<String>]) -> Vec<Snapshot> {
    let rounds = stages.iter().map(Vec::len).max().unwrap_or(0).max(1);

    (0..rounds)
        .map(|round| {
            Snapshot::Tuple(
                stages
                    .iter()
                    .filter_map(|stage| stage.get(round).or_else(|| stage.last()).cloned())
                    .collect(),
            )
        })
        .collect()
}
