//! Execution trace container
//!
//! - [`step`]: the step records (`Variable`, `ForStep`, `PrintStep`, ...)
//! - [`Trace`]: the ordered log of one run, the source position of the
//!   statement behind each step, and a map from step ids back to the
//!   construct that owns them
//!
//! The trace is append-only and bounded: [`Trace::push`] fails once the
//! configured step limit would be exceeded, aborting the run.

pub mod step;

pub use step::*;

use crate::interpreter::errors::TraceError;
use crate::parser::ast::SourceLocation;
use serde::Serialize;
use std::collections::BTreeMap;

/// The full ordered output of one trace run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub steps: Vec<Step>,
    /// Position of the statement executing when each step was appended
    pub locations: Vec<SourceLocation>,
    /// Step id -> source position of the construct that emitted it
    pub sources: BTreeMap<usize, SourceLocation>,
    #[serde(skip)]
    max_steps: usize,
}

impl Trace {
    pub fn new(max_steps: usize) -> Self {
        Trace {
            steps: Vec::new(),
            locations: Vec::new(),
            sources: BTreeMap::new(),
            max_steps,
        }
    }

    /// Append a step, enforcing the step limit
    pub fn push(&mut self, step: Step, location: SourceLocation) -> Result<(), TraceError> {
        if self.steps.len() >= self.max_steps {
            return Err(TraceError::StepLimitExceeded {
                limit: self.max_steps,
            });
        }
        self.steps.push(step);
        self.locations.push(location);
        Ok(())
    }

    pub fn record_source(&mut self, id: usize, location: SourceLocation) {
        self.sources.insert(id, location);
    }

    /// Source position of the statement behind the step at `index`
    pub fn location_of(&self, index: usize) -> Option<SourceLocation> {
        self.locations.get(index).copied()
    }

    /// Source position of the construct that owns step id `id`
    pub fn source_of(&self, id: usize) -> Option<SourceLocation> {
        self.sources.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Variable bindings as they stood after step `index`, sorted by name
    ///
    /// Rebuilt from the log alone. Variable records bind their target, a For
    /// step binds the loop target to `cur`, and a Call step opens a frame
    /// holding its arguments until the matching End-call. Names resolve
    /// local-first, so a local never leaks into the globals.
    pub fn bindings_at(&self, index: usize) -> Vec<(String, String)> {
        let mut globals: BTreeMap<&str, String> = BTreeMap::new();
        let mut frames: Vec<BTreeMap<&str, String>> = Vec::new();

        for step in self.steps.iter().take(index + 1) {
            let (name, value) = match step {
                Step::Variable(var) => (var.target.as_str(), var.expr.clone()),
                Step::For(step) => (
                    step.condition.target.as_str(),
                    step.condition.cur.to_string(),
                ),
                Step::Call(call) => {
                    frames.push(
                        call.args
                            .iter()
                            .map(|arg| (arg.name.as_str(), arg.value.clone()))
                            .collect(),
                    );
                    continue;
                }
                Step::EndCall(_) => {
                    frames.pop();
                    continue;
                }
                _ => continue,
            };
            frames.last_mut().unwrap_or(&mut globals).insert(name, value);
        }

        if let Some(frame) = frames.pop() {
            globals.extend(frame);
        }
        globals
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}
