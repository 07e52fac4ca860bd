//! User-defined functions: `def`, calls and `return`.
//!
//! A call evaluates its arguments in the caller's scope, appends a Call step,
//! pushes a local frame (names resolve local-first, then global) and walks the
//! body one level deeper. An End-call step with the returned value closes it.

use crate::interpreter::engine::{Flow, Tracer};
use crate::interpreter::errors::TraceError;
use crate::interpreter::expressions::ExprTrace;
use crate::memory::scope::UserFunction;
use crate::memory::value::Value;
use crate::parser::ast::{Expr, SourceLocation, Stmt};
use crate::trace::{Argument, CallStep, DefineStep, EndCallStep, ReturnStep, Step};
use rustc_hash::FxHashMap;
use tracing::debug;

impl Tracer {
    /// Executes `def name(params): body` by registering the function
    pub(crate) fn execute_def(
        &mut self,
        name: &str,
        params: &[String],
        body: &[Stmt],
        location: SourceLocation,
    ) -> Result<(), TraceError> {
        let function = UserFunction {
            name: name.to_string(),
            params: params.to_vec(),
            body: body.to_vec(),
            location,
        };
        let id = self.id_at(location);
        let signature = function.signature();
        debug!(id, %signature, "function defined");

        self.table.define_function(function);
        self.emit(Step::Define(DefineStep {
            id,
            depth: self.depth(),
            name: name.to_string(),
            signature,
        }))
    }

    /// Calls a user-defined function and returns its result
    pub(crate) fn call_function(
        &mut self,
        function: &UserFunction,
        args: &[Expr],
        location: SourceLocation,
    ) -> Result<Value, TraceError> {
        if args.len() != function.params.len() {
            return Err(TraceError::ArgumentCount {
                function: function.name.clone(),
                expected: function.params.len(),
                got: args.len(),
                location,
            });
        }

        if self.table.call_depth() >= self.config.max_call_depth {
            return Err(TraceError::RecursionLimit {
                function: function.name.clone(),
                limit: self.config.max_call_depth,
                location,
            });
        }

        let values = args
            .iter()
            .map(|arg| self.evaluator().evaluate(arg))
            .collect::<Result<Vec<_>, _>>()?;

        let id = self.id_at(location);
        let depth = self.depth();
        debug!(id, function = %function.name, call_depth = self.table.call_depth() + 1, "calling function");

        self.emit(Step::Call(CallStep {
            id,
            depth,
            name: function.name.clone(),
            signature: function.signature(),
            args: function
                .params
                .iter()
                .zip(&values)
                .map(|(name, value)| Argument {
                    name: name.clone(),
                    value: value.to_string(),
                })
                .collect(),
        }))?;

        let locals: FxHashMap<String, Value> =
            function.params.iter().cloned().zip(values).collect();
        self.table.push_frame(locals);
        let flow = self.execute_nested(&function.body);
        self.table.pop_frame();
        self.current_location = location;

        let value = match flow? {
            Flow::Return(value) => value,
            Flow::Normal => Value::None,
        };

        self.emit(Step::EndCall(EndCallStep {
            id,
            depth,
            name: function.name.clone(),
            value: value.to_string(),
        }))?;

        Ok(value)
    }

    /// Executes `return [expr]` inside a function body
    pub(crate) fn execute_return(
        &mut self,
        value: Option<&Expr>,
        location: SourceLocation,
    ) -> Result<Flow, TraceError> {
        if !self.table.in_function() {
            return Err(TraceError::unsupported("return outside function", location));
        }

        let returned = match value {
            None => ExprTrace::resolved(Value::None),
            Some(Expr::Call {
                func,
                args,
                location,
            }) => ExprTrace::resolved(self.execute_call(func, args, *location)?),
            Some(expr) => self.stages(expr)?,
        };

        let id = self.id_at(location);
        let depth = self.depth();
        for (expr, highlight) in Self::highlighted_stages(&returned) {
            self.emit(Step::Return(ReturnStep {
                id,
                depth,
                expr,
                highlight,
            }))?;
        }

        Ok(Flow::Return(returned.value))
    }
}
