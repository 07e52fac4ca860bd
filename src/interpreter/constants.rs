// Constants for the step tracer

/// Default upper bound on the number of steps one trace may hold
pub const DEFAULT_MAX_STEPS: usize = 100_000;

/// Default upper bound on nested user function calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 64;

/// The only built-in that produces steps when called
pub const PRINT_BUILTIN: &str = "print";

/// The only iterable a `for` loop accepts
pub const RANGE_BUILTIN: &str = "range";
