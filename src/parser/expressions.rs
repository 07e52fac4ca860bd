//! Expression parsing implementation
//!
//! One method per precedence level, lowest first:
//!
//! ```text
//! exprlist   ::= expr (',' expr)* [',']
//! expr       ::= arith [cmp_op arith]
//! arith      ::= term (('+' | '-') term)*
//! term       ::= factor (('*' | '/' | '//' | '%') factor)*
//! factor     ::= '-' NUMBER | power
//! power      ::= atom ['**' factor]
//! atom       ::= NAME ['(' args ')'] | NUMBER | True | False | None | '(' [exprlist] ')'
//! ```
//!
//! Comparisons do not chain, and unary minus only applies to numeric literals.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse a comma-separated expression list; a comma makes a tuple
    pub(crate) fn parse_expression_list(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        let first = self.parse_expression()?;

        if !self.check(&Token::Comma(self.current_location())) {
            return Ok(first);
        }

        let mut elements = vec![first];
        while self.match_token(&Token::Comma(self.current_location())) {
            if !self.starts_expression() {
                break;
            }
            elements.push(self.parse_expression()?);
        }

        Ok(Expr::Tuple { elements, location })
    }

    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_arith()?;

        let Some(op) = self.comparison_operator() else {
            return Ok(left);
        };
        let location = self.current_location();
        self.advance();
        let right = self.parse_arith()?;

        if self.comparison_operator().is_some() {
            return Err(self.error_here("Chained comparisons are not supported"));
        }

        Ok(Expr::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
            location,
        })
    }

    fn comparison_operator(&self) -> Option<CmpOp> {
        match self.peek() {
            Token::Lt(_) => Some(CmpOp::Lt),
            Token::Gt(_) => Some(CmpOp::Gt),
            Token::Le(_) => Some(CmpOp::Le),
            Token::Ge(_) => Some(CmpOp::Ge),
            Token::EqEq(_) => Some(CmpOp::Eq),
            Token::NotEq(_) => Some(CmpOp::NotEq),
            _ => None,
        }
    }

    /// Parse additive operators (+, -)
    fn parse_arith(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;

        loop {
            let op = match self.peek() {
                Token::Plus(_) => BinOp::Add,
                Token::Minus(_) => BinOp::Sub,
                _ => break,
            };
            let location = self.current_location();
            self.advance();
            let right = self.parse_term()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location,
            };
        }

        Ok(left)
    }

    /// Parse multiplicative operators (*, /, //, %)
    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_factor()?;

        loop {
            let op = match self.peek() {
                Token::Star(_) => BinOp::Mul,
                Token::Slash(_) => BinOp::Div,
                Token::SlashSlash(_) => BinOp::FloorDiv,
                Token::Percent(_) => BinOp::Mod,
                _ => break,
            };
            let location = self.current_location();
            self.advance();
            let right = self.parse_factor()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location,
            };
        }

        Ok(left)
    }

    /// Parse a negated numeric literal or fall through to power
    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        if !self.match_token(&Token::Minus(location)) {
            return self.parse_power();
        }

        let value = match self.peek().clone() {
            Token::IntLiteral(n, _) => Literal::Int(-n),
            Token::FloatLiteral(x, _) => Literal::Float(-x),
            other => {
                return Err(self.error_here(&format!(
                    "Unary minus is only supported on numeric literals, found {}",
                    other
                )))
            }
        };
        self.advance();

        Ok(Expr::Constant { value, location })
    }

    /// Parse `atom ** factor` (right-associative)
    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_atom()?;

        let location = self.current_location();
        if !self.match_token(&Token::StarStar(location)) {
            return Ok(base);
        }
        let exponent = self.parse_factor()?;

        Ok(Expr::BinaryOp {
            op: BinOp::Pow,
            left: Box::new(base),
            right: Box::new(exponent),
            location,
        })
    }

    /// Parse primary expressions: names, calls, literals, parenthesized forms
    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();

        match self.peek().clone() {
            Token::IntLiteral(n, _) => {
                self.advance();
                Ok(Expr::Constant {
                    value: Literal::Int(n),
                    location,
                })
            }
            Token::FloatLiteral(x, _) => {
                self.advance();
                Ok(Expr::Constant {
                    value: Literal::Float(x),
                    location,
                })
            }
            Token::True(_) | Token::False(_) => {
                let value = matches!(self.peek(), Token::True(_));
                self.advance();
                Ok(Expr::Constant {
                    value: Literal::Bool(value),
                    location,
                })
            }
            Token::None(_) => {
                self.advance();
                Ok(Expr::Constant {
                    value: Literal::None,
                    location,
                })
            }
            Token::Ident(id, _) => {
                self.advance();
                if self.match_token(&Token::LParen(self.current_location())) {
                    let args = self.parse_call_arguments()?;
                    return Ok(Expr::Call {
                        func: id,
                        args,
                        location,
                    });
                }
                Ok(Expr::Name { id, location })
            }
            Token::LParen(_) => {
                self.advance();
                self.parse_parenthesized(location)
            }
            other => Err(self.error_here(&format!("Expected expression, found {}", other))),
        }
    }

    /// Parse the inside of `( ... )`: empty tuple, grouping, or tuple
    fn parse_parenthesized(&mut self, location: SourceLocation) -> Result<Expr, ParseError> {
        if self.match_token(&Token::RParen(self.current_location())) {
            return Ok(Expr::Tuple {
                elements: Vec::new(),
                location,
            });
        }

        let inner = self.parse_expression_list()?;
        self.expect_token(
            &Token::RParen(self.current_location()),
            "Expected ')' after expression",
        )?;

        // Parenthesized tuples take the location of the opening parenthesis
        Ok(match inner {
            Expr::Tuple { elements, .. } => Expr::Tuple { elements, location },
            other => other,
        })
    }

    /// Parse call arguments after '(' up to and including ')'
    fn parse_call_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();

        while !self.check(&Token::RParen(self.current_location())) {
            args.push(self.parse_expression()?);
            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        self.expect_token(
            &Token::RParen(self.current_location()),
            "Expected ')' after arguments",
        )?;

        Ok(args)
    }

    fn starts_expression(&self) -> bool {
        matches!(
            self.peek(),
            Token::IntLiteral(..)
                | Token::FloatLiteral(..)
                | Token::Ident(..)
                | Token::True(_)
                | Token::False(_)
                | Token::None(_)
                | Token::LParen(_)
                | Token::Minus(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::parse_source;

    fn expr(source: &str) -> Expr {
        let program = parse_source(source).unwrap();
        match program.body.into_iter().next() {
            Some(Stmt::Expr { value, .. }) => value,
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence() {
        assert_eq!(expr("a + b * c").to_string(), "a + b * c");
        assert_eq!(expr("(a + b) * c").to_string(), "(a + b) * c");
        assert_eq!(expr("a - (b - c)").to_string(), "a - (b - c)");
        assert_eq!(expr("((a))").to_string(), "a");
    }

    #[test]
    fn test_binary_op_location_is_operator() {
        match expr("a  +  b") {
            Expr::BinaryOp { op, location, .. } => {
                assert_eq!(op, BinOp::Add);
                assert_eq!(location, SourceLocation::new(1, 4));
            }
            other => panic!("Expected binary op, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_literal() {
        assert!(matches!(
            expr("-3"),
            Expr::Constant {
                value: Literal::Int(-3),
                ..
            }
        ));
        assert!(parse_source("-x\n").is_err());
    }

    #[test]
    fn test_call_with_arguments() {
        match expr("print(a + b, c)") {
            Expr::Call { func, args, location } => {
                assert_eq!(func, "print");
                assert_eq!(args.len(), 2);
                assert_eq!(location, SourceLocation::new(1, 1));
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_tuples() {
        assert_eq!(expr("()").to_string(), "()");
        assert_eq!(expr("(1,)").to_string(), "(1,)");
        assert_eq!(expr("1, 2,").to_string(), "(1, 2)");
    }

    #[test]
    fn test_comparison_does_not_chain() {
        assert_eq!(expr("a + 1 >= b").to_string(), "a + 1 >= b");
        assert!(parse_source("a < b < c\n").is_err());
    }
}
