// AST (Abstract Syntax Tree) definitions for the traced language subset

use crate::memory::value::format_float;
use serde::Serialize;
use std::fmt;

/// Source location information for error reporting and step ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Binary operators
///
/// Only the first four are evaluated; the rest are parsed so the tracer can
/// reject them with a precise error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => PREC_ARITH,
            BinOp::Mul | BinOp::Div | BinOp::FloorDiv | BinOp::Mod => PREC_TERM,
            BinOp::Pow => PREC_POWER,
        }
    }
}

/// Comparison operators (conditions only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    NotEq,
}

impl CmpOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::Gt => ">",
            CmpOp::Le => "<=",
            CmpOp::Ge => ">=",
            CmpOp::Eq => "==",
            CmpOp::NotEq => "!=",
        }
    }
}

/// Literal constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
}

/// Expression nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Constant {
        value: Literal,
        location: SourceLocation,
    },
    Name {
        id: String,
        location: SourceLocation,
    },
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    Compare {
        op: CmpOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    Tuple {
        elements: Vec<Expr>,
        location: SourceLocation,
    },
    Call {
        func: String,
        args: Vec<Expr>,
        location: SourceLocation,
    },
}

impl Expr {
    /// Get the source location of this node
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::Constant { location, .. }
            | Expr::Name { location, .. }
            | Expr::BinaryOp { location, .. }
            | Expr::Compare { location, .. }
            | Expr::Tuple { location, .. }
            | Expr::Call { location, .. } => *location,
        }
    }

    /// Short node-kind name used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Constant { .. } => "Constant",
            Expr::Name { .. } => "Name",
            Expr::BinaryOp { .. } => "BinOp",
            Expr::Compare { .. } => "Compare",
            Expr::Tuple { .. } => "Tuple",
            Expr::Call { .. } => "Call",
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Tuple { .. } => PREC_TUPLE,
            Expr::Compare { .. } => PREC_CMP,
            Expr::BinaryOp { op, .. } => op.precedence(),
            Expr::Constant {
                value: Literal::Int(n),
                ..
            } if *n < 0 => PREC_UNARY,
            Expr::Constant {
                value: Literal::Float(f),
                ..
            } if f.is_sign_negative() => PREC_UNARY,
            _ => PREC_ATOM,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min_prec: u8) -> fmt::Result {
        // Tuples always render with their own parentheses
        if self.precedence() < min_prec && !matches!(self, Expr::Tuple { .. }) {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

const PREC_TUPLE: u8 = 0;
const PREC_CMP: u8 = 1;
const PREC_ARITH: u8 = 2;
const PREC_TERM: u8 = 3;
const PREC_UNARY: u8 = 4;
const PREC_POWER: u8 = 5;
const PREC_ATOM: u8 = 6;

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(x) => write!(f, "{}", format_float(*x)),
            Literal::Bool(true) => write!(f, "True"),
            Literal::Bool(false) => write!(f, "False"),
            Literal::None => write!(f, "None"),
        }
    }
}

/// Canonical source form of an expression (the "symbolic" snapshot)
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant { value, .. } => write!(f, "{}", value),
            Expr::Name { id, .. } => write!(f, "{}", id),
            Expr::BinaryOp {
                op, left, right, ..
            } => {
                let prec = op.precedence();
                // `**` binds right-to-left; everything else left-to-right
                let (left_min, right_min) = if *op == BinOp::Pow {
                    (prec + 1, prec)
                } else {
                    (prec, prec + 1)
                };
                left.fmt_operand(f, left_min)?;
                write!(f, " {} ", op.symbol())?;
                right.fmt_operand(f, right_min)
            }
            Expr::Compare {
                op, left, right, ..
            } => {
                left.fmt_operand(f, PREC_CMP + 1)?;
                write!(f, " {} ", op.symbol())?;
                right.fmt_operand(f, PREC_CMP + 1)
            }
            Expr::Tuple { elements, .. } => {
                write!(f, "(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    element.fmt_operand(f, PREC_CMP)?;
                }
                if elements.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Expr::Call { func, args, .. } => {
                write!(f, "{}(", func)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    arg.fmt_operand(f, PREC_CMP)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// One `if`/`elif` arm of a conditional
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub location: SourceLocation,
}

/// The `else` arm of a conditional
#[derive(Debug, Clone, PartialEq)]
pub struct ElseBranch {
    pub body: Vec<Stmt>,
    pub location: SourceLocation,
}

/// Statement nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign {
        targets: Vec<Expr>,
        value: Expr,
        location: SourceLocation,
    },
    For {
        target: Expr,
        iter: Expr,
        body: Vec<Stmt>,
        location: SourceLocation,
    },
    If {
        branches: Vec<Branch>,
        orelse: Option<ElseBranch>,
        location: SourceLocation,
    },
    FunctionDef {
        name: String,
        params: Vec<String>,
        body: Vec<Stmt>,
        location: SourceLocation,
    },
    Return {
        value: Option<Expr>,
        location: SourceLocation,
    },
    Expr {
        value: Expr,
        location: SourceLocation,
    },
}

impl Stmt {
    /// Get the source location of this node
    pub fn location(&self) -> SourceLocation {
        match self {
            Stmt::Assign { location, .. }
            | Stmt::For { location, .. }
            | Stmt::If { location, .. }
            | Stmt::FunctionDef { location, .. }
            | Stmt::Return { location, .. }
            | Stmt::Expr { location, .. } => *location,
        }
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}
