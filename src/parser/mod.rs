//! Source parser for the traced language subset
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization with indentation tracking (source text → tokens)
//! - [`parse`]: Parser struct, errors and entry point (tokens → AST)
//! - [`ast`]: AST node definitions and canonical unparse
//!
//! # Supported Subset
//!
//! - Statements: assignment (chained and tuple targets), `for ... in range(...)`,
//!   `if`/`elif`/`else`, `def`, `return`, call statements
//! - Expressions: numbers, `True`/`False`/`None`, names, `+ - * / // % **`,
//!   one comparison per expression, tuples, calls
//! - No strings, unary operators other than a negative literal, or chained
//!   comparisons
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser, one method per precedence level.
//! No external parser generator dependencies.

pub mod ast;
pub mod lexer;
pub mod parse;

mod expressions;
mod statements;
