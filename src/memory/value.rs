//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents all runtime values
//! a traced program can produce: numbers, booleans, `None` and tuples.
//!
//! # String Form
//!
//! Every snapshot and every Variable record carries values as text, so the
//! [`fmt::Display`] impl is load-bearing: integers print in decimal, floats in
//! shortest round-trip form via [`format_float`], tuples as `(1, 2)` / `(1,)`.
//!
//! # Arithmetic
//!
//! Two integers stay integer under `+ - *` (checked). A float operand promotes
//! the result to float. `/` always produces a float. Booleans count as 0 or 1.

use crate::parser::ast::CmpOp;
use std::cmp::Ordering;
use std::fmt;

/// Runtime values in the tracer
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    #[default]
    None,
    Tuple(Vec<Value>),
}

/// Errors raised by value operations; the evaluator attaches a location
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    #[error("division by zero")]
    ZeroDivision,

    #[error("integer overflow in {0}")]
    Overflow(String),

    #[error("{0}")]
    TypeMismatch(String),
}

/// Numeric view of a value used by arithmetic and ordering
#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(x) => x,
        }
    }
}

impl Value {
    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::None => "NoneType",
            Value::Tuple(_) => "tuple",
        }
    }

    /// Get the integer value of an `Int` or `Bool`, returns None otherwise
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Truthiness: non-zero numbers, `True`, non-empty tuples
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::Bool(b) => *b,
            Value::None => false,
            Value::Tuple(items) => !items.is_empty(),
        }
    }

    fn as_number(&self) -> Option<Number> {
        match self {
            Value::Int(n) => Some(Number::Int(*n)),
            Value::Bool(b) => Some(Number::Int(i64::from(*b))),
            Value::Float(x) => Some(Number::Float(*x)),
            _ => None,
        }
    }

    fn operands(&self, other: &Value, symbol: &str) -> Result<(Number, Number), ValueError> {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(ValueError::TypeMismatch(format!(
                "unsupported operand type(s) for {}: '{}' and '{}'",
                symbol,
                self.type_name(),
                other.type_name()
            ))),
        }
    }

    fn integer_or_float(
        &self,
        other: &Value,
        symbol: &str,
        int_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
    ) -> Result<Value, ValueError> {
        match self.operands(other, symbol)? {
            (Number::Int(a), Number::Int(b)) => int_op(a, b)
                .map(Value::Int)
                .ok_or_else(|| ValueError::Overflow(format!("{} {} {}", a, symbol, b))),
            (a, b) => Ok(Value::Float(float_op(a.as_f64(), b.as_f64()))),
        }
    }

    pub fn add(&self, other: &Value) -> Result<Value, ValueError> {
        self.integer_or_float(other, "+", i64::checked_add, |a, b| a + b)
    }

    pub fn sub(&self, other: &Value) -> Result<Value, ValueError> {
        self.integer_or_float(other, "-", i64::checked_sub, |a, b| a - b)
    }

    pub fn mul(&self, other: &Value) -> Result<Value, ValueError> {
        self.integer_or_float(other, "*", i64::checked_mul, |a, b| a * b)
    }

    /// True division: the result is always a float
    pub fn div(&self, other: &Value) -> Result<Value, ValueError> {
        let (a, b) = self.operands(other, "/")?;
        let divisor = b.as_f64();
        if divisor == 0.0 {
            return Err(ValueError::ZeroDivision);
        }
        Ok(Value::Float(a.as_f64() / divisor))
    }

    /// Apply a comparison operator, producing a `Bool`
    pub fn compare(&self, op: CmpOp, other: &Value) -> Result<Value, ValueError> {
        let result = match op {
            CmpOp::Eq => self.equals(other),
            CmpOp::NotEq => !self.equals(other),
            CmpOp::Lt | CmpOp::Gt | CmpOp::Le | CmpOp::Ge => {
                let ordering = self.ordering(other, op)?;
                match op {
                    CmpOp::Lt => ordering == Some(Ordering::Less),
                    CmpOp::Gt => ordering == Some(Ordering::Greater),
                    CmpOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
                    _ => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
                }
            }
        };
        Ok(Value::Bool(result))
    }

    /// Structural equality with numeric coercion (`1 == 1.0 == True`)
    fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Tuple(a), Value::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y))
            }
            _ => match (self.as_number(), other.as_number()) {
                (Some(Number::Int(a)), Some(Number::Int(b))) => a == b,
                (Some(a), Some(b)) => a.as_f64() == b.as_f64(),
                _ => false,
            },
        }
    }

    /// `None` ordering means unordered (a NaN operand)
    fn ordering(&self, other: &Value, op: CmpOp) -> Result<Option<Ordering>, ValueError> {
        match (self.as_number(), other.as_number()) {
            (Some(Number::Int(a)), Some(Number::Int(b))) => Ok(Some(a.cmp(&b))),
            (Some(a), Some(b)) => Ok(a.as_f64().partial_cmp(&b.as_f64())),
            _ => Err(ValueError::TypeMismatch(format!(
                "'{}' not supported between instances of '{}' and '{}'",
                op.symbol(),
                self.type_name(),
                other.type_name()
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::None => write!(f, "None"),
            Value::Tuple(items) => {
                let parts: Vec<String> = items.iter().map(Value::to_string).collect();
                write!(f, "{}", format_tuple(&parts))
            }
        }
    }
}

/// Join already-formatted elements into tuple syntax
pub fn format_tuple(parts: &[String]) -> String {
    match parts {
        [single] => format!("({},)", single),
        _ => format!("({})", parts.join(", ")),
    }
}

/// Format a float the way the scripting language's `repr` does
///
/// Shortest round-trip digits; positional notation when the decimal exponent
/// is in `-4..16`, scientific (`1e+16`, `1.5e-05`) otherwise.
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "-1.2345e-5"
    let sci = format!("{:e}", x);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if (-4..16).contains(&exponent) {
        if exponent >= 0 {
            let int_len = exponent as usize + 1;
            let mut padded = digits.clone();
            while padded.len() < int_len {
                padded.push('0');
            }
            let (int_part, frac_part) = padded.split_at(int_len);
            let frac_part = if frac_part.is_empty() { "0" } else { frac_part };
            format!("{}{}.{}", sign, int_part, frac_part)
        } else {
            let zeros = "0".repeat((-exponent - 1) as usize);
            format!("{}0.{}{}", sign, zeros, digits)
        }
    } else {
        let (first, rest) = digits.split_at(1);
        let fraction = if rest.is_empty() {
            String::new()
        } else {
            format!(".{}", rest)
        };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}{}{}e{}{:02}",
            sign,
            first,
            fraction,
            exp_sign,
            exponent.abs()
        )
    }
}
