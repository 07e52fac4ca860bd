// Statement walker for the step tracer

use crate::config::TraceConfig;
use crate::highlight::diff_sequence;
use crate::interpreter::errors::TraceError;
use crate::interpreter::expressions::{Evaluator, ExprTrace};
use crate::memory::{scope::VariableTable, value::Value};
use crate::parser::ast::*;
use crate::trace::{Step, Trace};
use tracing::{debug, trace};

/// How a block of statements finished
pub(crate) enum Flow {
    /// Ran to the end of the block
    Normal,
    /// A `return` inside a function body; unwind to the call
    Return(Value),
}

/// Walks a program and records every state change as a [`Step`]
///
/// A tracer owns its variable table and id allocator, so each run starts from
/// a clean slate. [`Tracer::run`] consumes the tracer.
pub struct Tracer {
    /// Bindings, depth counter, id cache and function registry
    pub(crate) table: VariableTable,

    /// Steps emitted so far
    pub(crate) trace: Trace,

    pub(crate) config: TraceConfig,

    /// Statement currently executing
    pub(crate) current_location: SourceLocation,
}

impl Default for Tracer {
    fn default() -> Self {
        Tracer::new(TraceConfig::default())
    }
}

impl Tracer {
    pub fn new(config: TraceConfig) -> Self {
        Tracer {
            table: VariableTable::new(),
            trace: Trace::new(config.max_steps),
            config,
            current_location: SourceLocation::new(1, 1),
        }
    }

    /// Trace the program from start to finish
    pub fn run(mut self, program: &Program) -> Result<Trace, TraceError> {
        debug!(statements = program.body.len(), "trace run started");

        // `return` at top level is rejected before it can produce a Flow::Return
        self.execute_block(&program.body)?;

        debug!(steps = self.trace.len(), "trace run finished");
        trace!(bindings = ?self.table.visible_bindings(), "final global bindings");
        Ok(self.trace)
    }

    /// Execute statements in order at the current depth
    pub(crate) fn execute_block(&mut self, body: &[Stmt]) -> Result<Flow, TraceError> {
        for stmt in body {
            if let Flow::Return(value) = self.execute_statement(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    /// Execute a loop, branch or function body one level deeper
    pub(crate) fn execute_nested(&mut self, body: &[Stmt]) -> Result<Flow, TraceError> {
        self.table.enter_scope();
        let flow = self.execute_block(body);
        self.table.exit_scope();
        flow
    }

    /// Dispatch one statement
    pub(crate) fn execute_statement(&mut self, stmt: &Stmt) -> Result<Flow, TraceError> {
        let location = stmt.location();
        self.current_location = location;
        debug!(
            line = location.line,
            depth = self.table.depth(),
            "executing statement"
        );

        match stmt {
            Stmt::Assign {
                targets,
                value,
                location,
            } => {
                self.execute_assign(targets, value, *location)?;
                Ok(Flow::Normal)
            }

            Stmt::For {
                target,
                iter,
                body,
                location,
            } => self.execute_for(target, iter, body, *location),

            Stmt::If {
                branches, orelse, ..
            } => self.execute_if(branches, orelse.as_ref()),

            Stmt::FunctionDef {
                name,
                params,
                body,
                location,
            } => {
                self.execute_def(name, params, body, *location)?;
                Ok(Flow::Normal)
            }

            Stmt::Return { value, location } => self.execute_return(value.as_ref(), *location),

            Stmt::Expr { value, .. } => {
                self.execute_expression_statement(value)?;
                Ok(Flow::Normal)
            }
        }
    }

    // ===== Helpers shared by the statement modules =====

    pub(crate) fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&self.table)
    }

    /// Snapshots for a displayed expression
    ///
    /// Operators expand into their symbolic stages; every other shape is a
    /// single resolved snapshot.
    pub(crate) fn stages(&self, expr: &Expr) -> Result<ExprTrace, TraceError> {
        match expr {
            Expr::BinaryOp { .. } | Expr::Compare { .. } => self.evaluator().symbolic_trace(expr),
            _ => Ok(ExprTrace::resolved(self.evaluator().evaluate(expr)?)),
        }
    }

    /// Snapshot texts paired with their highlights
    pub(crate) fn highlighted_stages(trace: &ExprTrace) -> Vec<(String, Vec<usize>)> {
        let texts = trace.texts();
        let highlights = diff_sequence(texts.as_slice());
        texts.into_iter().zip(highlights).collect()
    }

    /// Stable id for a source position, recorded in the trace's source map
    pub(crate) fn id_at(&mut self, location: SourceLocation) -> usize {
        let id = self.table.stable_id(location);
        self.trace.record_source(id, location);
        id
    }

    pub(crate) fn depth(&self) -> usize {
        self.table.depth()
    }

    pub(crate) fn emit(&mut self, step: Step) -> Result<(), TraceError> {
        trace!(index = self.trace.len(), kind = step.kind(), %step, "step");
        self.trace.push(step, self.current_location)
    }
}

/// Trace a parsed program with a fresh tracer
pub fn trace_program(program: &Program, config: TraceConfig) -> Result<Trace, TraceError> {
    Tracer::new(config).run(program)
}
