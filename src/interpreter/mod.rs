//! Expression evaluator and statement walker
//!
//! This module provides the core tracing logic:
//! - [`engine`]: The [`engine::Tracer`] and statement dispatch
//! - [`expressions`]: The expression evaluator and its textual snapshots
//! - [`errors`]: Trace error types
//! - [`constants`]: Default limits and built-in names
//!
//! # Execution Model
//!
//! The tracer walks the AST once, depth first. Every state change appends a
//! step to the trace; nothing is ever rewritten. Loop, branch and function
//! bodies are walked one level deeper so each step records its nesting.
//!
//! # Built-in Functions
//!
//! `print` is handled directly by the walker, and `range` is only accepted as
//! the iterable of a `for` loop.

pub mod constants;
pub mod engine;
pub mod errors;
pub mod expressions;

mod branches;
mod functions;
mod loops;
mod statements;
