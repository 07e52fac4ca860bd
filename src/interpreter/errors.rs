//! Trace error types
//!
//! This module defines [`TraceError`], which represents every way a trace run
//! can fail (as opposed to lexer or parse errors).
//!
//! All trace errors are fatal: the run aborts and no partial trace is returned.

use crate::memory::value::ValueError;
use crate::parser::ast::SourceLocation;

/// Errors that abort a trace run
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TraceError {
    /// Expression or statement shape outside the supported grammar
    #[error("Unsupported {kind} at line {}, column {}", .location.line, .location.column)]
    UnsupportedNode {
        kind: String,
        location: SourceLocation,
    },

    /// Binary operator outside `+ - * /`
    #[error("Unsupported operator '{op}' at line {}, column {}", .location.line, .location.column)]
    UnsupportedOperator {
        op: String,
        location: SourceLocation,
    },

    /// Call to something other than `print`, `range` in a loop header, or a defined function
    #[error("Unsupported call to '{name}' at line {}, column {}", .location.line, .location.column)]
    UnsupportedCall {
        name: String,
        location: SourceLocation,
    },

    /// Read of a variable never assigned in this run
    #[error("Name '{name}' is not defined at line {}, column {}", .location.line, .location.column)]
    UnboundName {
        name: String,
        location: SourceLocation,
    },

    /// Bad `range(...)` arguments
    #[error("Malformed argument: {message} at line {}, column {}", .location.line, .location.column)]
    MalformedArgument {
        message: String,
        location: SourceLocation,
    },

    #[error("Division by zero at line {}, column {}", .location.line, .location.column)]
    ZeroDivision { location: SourceLocation },

    #[error("Integer overflow in {operation} at line {}, column {}", .location.line, .location.column)]
    ArithmeticOverflow {
        operation: String,
        location: SourceLocation,
    },

    #[error("Type error: {message} at line {}, column {}", .location.line, .location.column)]
    TypeMismatch {
        message: String,
        location: SourceLocation,
    },

    /// Tuple assignment with the wrong number of values
    #[error(
        "Cannot unpack {got} values into {expected} targets at line {}, column {}",
        .location.line,
        .location.column
    )]
    UnpackMismatch {
        expected: usize,
        got: usize,
        location: SourceLocation,
    },

    #[error(
        "{function}() takes {expected} arguments but {got} were given at line {}, column {}",
        .location.line,
        .location.column
    )]
    ArgumentCount {
        function: String,
        expected: usize,
        got: usize,
        location: SourceLocation,
    },

    #[error(
        "Maximum call depth {limit} exceeded calling {function}() at line {}, column {}",
        .location.line,
        .location.column
    )]
    RecursionLimit {
        function: String,
        limit: usize,
        location: SourceLocation,
    },

    /// Trace grew past the configured step limit
    #[error("Step limit exceeded: trace would exceed {limit} steps")]
    StepLimitExceeded { limit: usize },
}

impl TraceError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            TraceError::UnsupportedNode { location, .. }
            | TraceError::UnsupportedOperator { location, .. }
            | TraceError::UnsupportedCall { location, .. }
            | TraceError::UnboundName { location, .. }
            | TraceError::MalformedArgument { location, .. }
            | TraceError::ZeroDivision { location }
            | TraceError::ArithmeticOverflow { location, .. }
            | TraceError::TypeMismatch { location, .. }
            | TraceError::UnpackMismatch { location, .. }
            | TraceError::ArgumentCount { location, .. }
            | TraceError::RecursionLimit { location, .. } => Some(location),
            TraceError::StepLimitExceeded { .. } => None,
        }
    }

    /// Attach a source location to a value-level failure
    pub fn from_value(err: ValueError, location: SourceLocation) -> Self {
        match err {
            ValueError::ZeroDivision => TraceError::ZeroDivision { location },
            ValueError::Overflow(operation) => TraceError::ArithmeticOverflow {
                operation,
                location,
            },
            ValueError::TypeMismatch(message) => TraceError::TypeMismatch { message, location },
        }
    }

    pub(crate) fn unsupported(kind: impl Into<String>, location: SourceLocation) -> Self {
        TraceError::UnsupportedNode {
            kind: kind.into(),
            location,
        }
    }

    pub(crate) fn malformed(message: impl Into<String>, location: SourceLocation) -> Self {
        TraceError::MalformedArgument {
            message: message.into(),
            location,
        }
    }
}
