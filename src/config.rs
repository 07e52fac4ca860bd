//! Run limits for a trace

use crate::interpreter::constants::{DEFAULT_MAX_CALL_DEPTH, DEFAULT_MAX_STEPS};

/// Limits applied to a single trace run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceConfig {
    /// Maximum number of steps before the run fails with `StepLimitExceeded`
    pub max_steps: usize,
    /// Maximum nesting of user function calls before `RecursionLimit`
    pub max_call_depth: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        TraceConfig {
            max_steps: DEFAULT_MAX_STEPS,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl TraceConfig {
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }
}
