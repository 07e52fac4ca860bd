//! Runtime state for a trace run
//!
//! - [`value`]: Runtime value representation (Int, Float, Bool, None, Tuple)
//! - [`scope`]: The variable table: bindings, nesting depth, stable ids and
//!   the user function registry
//!
//! One [`scope::VariableTable`] belongs to exactly one run and is never shared.

pub mod scope;
pub mod value;
