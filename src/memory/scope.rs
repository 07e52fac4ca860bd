//! Variable table for one trace run
//!
//! This module provides [`VariableTable`], the scoped name→value mapping the
//! walker mutates and the evaluator reads. Besides bindings it owns:
//! - the nesting-depth counter reported on every step
//! - the stable-id allocator keyed by source position
//! - the registry of user-defined functions
//!
//! Only current values are kept. History lives in the trace's Variable
//! records, never in this table.

use super::value::Value;
use crate::interpreter::errors::TraceError;
use crate::parser::ast::{SourceLocation, Stmt};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// A user-defined function registered by `def`
#[derive(Debug, Clone, PartialEq)]
pub struct UserFunction {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    pub location: SourceLocation,
}

impl UserFunction {
    /// Display signature such as `add(x, y)`
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.params.join(", "))
    }
}

/// Scoped variable storage, depth counter and id allocator
#[derive(Debug, Default)]
pub struct VariableTable {
    globals: FxHashMap<String, Value>,
    /// Local frames of active user function calls, innermost last
    frames: Vec<FxHashMap<String, Value>>,
    depth: usize,
    ids: FxHashMap<SourceLocation, usize>,
    functions: FxHashMap<String, Rc<UserFunction>>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a binding, local frame first, then globals
    pub fn get(&self, name: &str, location: SourceLocation) -> Result<Value, TraceError> {
        self.frames
            .last()
            .and_then(|frame| frame.get(name))
            .or_else(|| self.globals.get(name))
            .cloned()
            .ok_or_else(|| TraceError::UnboundName {
                name: name.to_string(),
                location,
            })
    }

    /// Insert or overwrite a binding in the innermost frame
    pub fn set(&mut self, name: &str, value: Value) {
        let frame = self.frames.last_mut().unwrap_or(&mut self.globals);
        frame.insert(name.to_string(), value);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn enter_scope(&mut self) {
        self.depth += 1;
    }

    pub fn exit_scope(&mut self) {
        assert!(self.depth > 0, "exit_scope called at depth 0");
        self.depth -= 1;
    }

    /// Push a fresh local frame for a function call
    pub fn push_frame(&mut self, locals: FxHashMap<String, Value>) {
        self.frames.push(locals);
    }

    pub fn pop_frame(&mut self) {
        assert!(self.frames.pop().is_some(), "pop_frame without a local frame");
    }

    /// Number of active user function calls
    pub fn call_depth(&self) -> usize {
        self.frames.len()
    }

    pub fn in_function(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Id for a source position, allocated from 1 on first sight
    pub fn stable_id(&mut self, location: SourceLocation) -> usize {
        let next = self.ids.len() + 1;
        *self.ids.entry(location).or_insert(next)
    }

    pub fn define_function(&mut self, function: UserFunction) {
        self.functions
            .insert(function.name.clone(), Rc::new(function));
    }

    pub fn function(&self, name: &str) -> Option<Rc<UserFunction>> {
        self.functions.get(name).cloned()
    }

    /// Current bindings visible from the innermost frame, sorted by name
    pub fn visible_bindings(&self) -> Vec<(String, Value)> {
        let mut merged: FxHashMap<&String, &Value> = self.globals.iter().collect();
        if let Some(frame) = self.frames.last() {
            merged.extend(frame.iter());
        }
        let mut bindings: Vec<(String, Value)> = merged
            .into_iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        bindings.sort_by(|a, b| a.0.cmp(&b.0));
        bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(line: usize, column: usize) -> SourceLocation {
        SourceLocation::new(line, column)
    }

    #[test]
    fn test_get_unbound_name_fails() {
        let table = VariableTable::new();
        let err = table.get("a", loc(2, 5)).unwrap_err();
        assert_eq!(
            err,
            TraceError::UnboundName {
                name: "a".to_string(),
                location: loc(2, 5),
            }
        );
    }

    #[test]
    fn test_set_overwrites() {
        let mut table = VariableTable::new();
        table.set("a", Value::Int(1));
        table.set("a", Value::Int(2));
        assert_eq!(table.get("a", loc(1, 1)), Ok(Value::Int(2)));
    }

    #[test]
    fn test_local_frame_shadows_globals() {
        let mut table = VariableTable::new();
        table.set("x", Value::Int(1));
        table.set("g", Value::Int(7));

        let mut locals = FxHashMap::default();
        locals.insert("x".to_string(), Value::Int(99));
        table.push_frame(locals);
        table.set("y", Value::Int(5));

        assert_eq!(table.get("x", loc(1, 1)), Ok(Value::Int(99)));
        assert_eq!(table.get("g", loc(1, 1)), Ok(Value::Int(7)));
        assert_eq!(table.call_depth(), 1);

        table.pop_frame();
        assert_eq!(table.get("x", loc(1, 1)), Ok(Value::Int(1)));
        assert!(table.get("y", loc(1, 1)).is_err());
    }

    #[test]
    fn test_depth_counter() {
        let mut table = VariableTable::new();
        table.enter_scope();
        table.enter_scope();
        assert_eq!(table.depth(), 2);
        table.exit_scope();
        assert_eq!(table.depth(), 1);
    }

    #[test]
    #[should_panic(expected = "exit_scope called at depth 0")]
    fn test_depth_never_goes_negative() {
        VariableTable::new().exit_scope();
    }

    #[test]
    fn test_stable_ids_are_reused() {
        let mut table = VariableTable::new();
        let first = table.stable_id(loc(3, 5));
        let second = table.stable_id(loc(4, 1));
        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(table.stable_id(loc(3, 5)), 1);
    }

    #[test]
    fn test_visible_bindings_are_sorted() {
        let mut table = VariableTable::new();
        table.set("b", Value::Int(2));
        table.set("a", Value::Int(1));
        let names: Vec<String> = table.visible_bindings().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
