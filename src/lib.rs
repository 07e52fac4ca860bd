//! # Introduction
//!
//! steptrace runs a small subset of a Python-like scripting language and,
//! instead of only producing output, records an ordered execution trace:
//! every variable binding, loop iteration, printed expression, branch and
//! call, together with character-level highlights marking what changed
//! between two textual stages of an expression.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Tracer → Trace → (text | JSON | TUI)
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds an AST.
//! 2. [`interpreter`]: walks the AST, evaluates expressions and emits steps.
//! 3. [`memory`]: runtime [`memory::value::Value`]s and the
//!    [`memory::scope::VariableTable`].
//! 4. [`highlight`]: the character diff between consecutive snapshots.
//! 5. [`trace`]: step records and the [`trace::Trace`] container.
//! 6. [`output`]: one-line-per-step text rendering used by the CLI.
//! 7. [`ui`]: ratatui-based replay viewer; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use steptrace::{trace_source, TraceConfig};
//!
//! let trace = trace_source("a = 10\nb = 20\nprint(a + b)\n", TraceConfig::default()).unwrap();
//! let printed: Vec<String> = trace.steps.iter().skip(2).map(|s| s.to_string()).collect();
//! assert_eq!(printed, ["print a + b", "print 10 + 20", "print 30"]);
//! ```

pub mod config;
pub mod highlight;
pub mod interpreter;
pub mod memory;
pub mod output;
pub mod parser;
pub mod trace;
pub mod ui;

pub use config::TraceConfig;
pub use interpreter::engine::{trace_program, Tracer};
pub use interpreter::errors::TraceError;
pub use parser::parse::ParseError;
pub use trace::{Step, Trace};

/// Any failure between source text and a finished trace
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Trace(#[from] TraceError),
}

/// Parse `source` and trace it with a fresh tracer
pub fn trace_source(source: &str, config: TraceConfig) -> Result<Trace, Error> {
    let program = parser::parse::parse_source(source)?;
    Ok(trace_program(&program, config)?)
}
