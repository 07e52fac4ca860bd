//! Statement parsing implementation
//!
//! # Grammar
//!
//! ```text
//! statement ::= for_stmt | if_stmt | def_stmt | return_stmt | simple_stmt
//! simple_stmt ::= exprlist ('=' exprlist)* NEWLINE
//! block ::= NEWLINE INDENT statement+ DEDENT | simple_stmt
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();

        if self.match_token(&Token::For(loc)) {
            return self.parse_for_statement(loc);
        }

        if self.match_token(&Token::If(loc)) {
            return self.parse_if_statement(loc);
        }

        if self.match_token(&Token::Def(loc)) {
            return self.parse_function_definition(loc);
        }

        if self.match_token(&Token::Return(loc)) {
            return self.parse_return_statement(loc);
        }

        self.parse_simple_statement()
    }

    /// Parse an indented block or a single-line body after ':'
    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        if !self.match_token(&Token::Newline(self.current_location())) {
            return Ok(vec![self.parse_simple_statement()?]);
        }

        self.expect_token(
            &Token::Indent(self.current_location()),
            "Expected an indented block",
        )?;

        let mut statements = Vec::new();
        while !self.check(&Token::Dedent(self.current_location())) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        self.expect_token(
            &Token::Dedent(self.current_location()),
            "Expected end of indented block",
        )?;

        Ok(statements)
    }

    /// Parse `for target in iter: block`
    fn parse_for_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        let target = self.parse_expression_list()?;
        self.expect_token(
            &Token::In(self.current_location()),
            "Expected 'in' after for-loop target",
        )?;
        let iter = self.parse_expression()?;
        self.expect_token(
            &Token::Colon(self.current_location()),
            "Expected ':' after for-loop header",
        )?;
        let body = self.parse_block()?;

        Ok(Stmt::For {
            target,
            iter,
            body,
            location,
        })
    }

    /// Parse `if cond: block (elif cond: block)* (else: block)?`
    fn parse_if_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        let mut branches = Vec::new();
        let mut branch_location = location;

        loop {
            let condition = self.parse_expression()?;
            self.expect_token(
                &Token::Colon(self.current_location()),
                "Expected ':' after condition",
            )?;
            let body = self.parse_block()?;
            branches.push(Branch {
                condition,
                body,
                location: branch_location,
            });

            branch_location = self.current_location();
            if !self.match_token(&Token::Elif(branch_location)) {
                break;
            }
        }

        let else_location = self.current_location();
        let orelse = if self.match_token(&Token::Else(else_location)) {
            self.expect_token(
                &Token::Colon(self.current_location()),
                "Expected ':' after 'else'",
            )?;
            Some(ElseBranch {
                body: self.parse_block()?,
                location: else_location,
            })
        } else {
            None
        };

        Ok(Stmt::If {
            branches,
            orelse,
            location,
        })
    }

    /// Parse `def name(params): block`
    fn parse_function_definition(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        let name = self.expect_identifier()?;
        self.expect_token(
            &Token::LParen(self.current_location()),
            "Expected '(' after function name",
        )?;

        let mut params = Vec::new();
        if !self.check(&Token::RParen(self.current_location())) {
            loop {
                let param = self.expect_identifier()?;
                if params.contains(&param) {
                    return Err(ParseError {
                        message: format!("Duplicate parameter '{}' in function definition", param),
                        location: self.previous_location(),
                    });
                }
                params.push(param);

                if !self.match_token(&Token::Comma(self.current_location())) {
                    break;
                }
            }
        }

        self.expect_token(
            &Token::RParen(self.current_location()),
            "Expected ')' after parameters",
        )?;
        self.expect_token(
            &Token::Colon(self.current_location()),
            "Expected ':' after function signature",
        )?;
        let body = self.parse_block()?;

        Ok(Stmt::FunctionDef {
            name,
            params,
            body,
            location,
        })
    }

    /// Parse `return [exprlist]`
    fn parse_return_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        let value = if self.check(&Token::Newline(self.current_location())) {
            None
        } else {
            Some(self.parse_expression_list()?)
        };
        self.end_of_statement()?;

        Ok(Stmt::Return { value, location })
    }

    /// Parse an assignment chain or an expression statement
    fn parse_simple_statement(&mut self) -> Result<Stmt, ParseError> {
        let location = self.current_location();
        let first = self.parse_expression_list()?;

        if !self.check(&Token::Eq(self.current_location())) {
            self.end_of_statement()?;
            return Ok(Stmt::Expr {
                value: first,
                location,
            });
        }

        let mut sides = vec![first];
        while self.match_token(&Token::Eq(self.current_location())) {
            sides.push(self.parse_expression_list()?);
        }
        self.end_of_statement()?;

        // The last side is the value, every earlier one a target
        let value = sides.pop().ok_or_else(|| self.error_here("Expected expression"))?;

        Ok(Stmt::Assign {
            targets: sides,
            value,
            location,
        })
    }

    fn end_of_statement(&mut self) -> Result<(), ParseError> {
        if self.match_token(&Token::Newline(self.current_location())) || self.is_at_end() {
            Ok(())
        } else {
            Err(self.error_here(&format!("Expected end of line, found {}", self.peek())))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::parse_source;

    #[test]
    fn test_assignment_and_chain() {
        let program = parse_source("x = 1\na = b = x + 2\n").unwrap();
        assert_eq!(program.body.len(), 2);

        match &program.body[1] {
            Stmt::Assign { targets, value, .. } => {
                assert_eq!(targets.len(), 2);
                assert_eq!(value.to_string(), "x + 2");
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_tuple_assignment() {
        let program = parse_source("x, y = a, b\n").unwrap();
        match &program.body[0] {
            Stmt::Assign { targets, value, .. } => {
                assert!(matches!(&targets[0], Expr::Tuple { elements, .. } if elements.len() == 2));
                assert_eq!(value.to_string(), "(a, b)");
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_for_blocks() {
        let source = "for i in range(3):\n    for j in range(i):\n        print(i + j)\n    print(i)\nprint(0)\n";
        let program = parse_source(source).unwrap();
        assert_eq!(program.body.len(), 2);

        match &program.body[0] {
            Stmt::For { body, location, .. } => {
                assert_eq!(*location, SourceLocation::new(1, 1));
                assert_eq!(body.len(), 2);
                assert!(matches!(body[0], Stmt::For { .. }));
            }
            other => panic!("Expected for loop, got {:?}", other),
        }
    }

    #[test]
    fn test_single_line_body() {
        let program = parse_source("for i in range(2): print(i)\n").unwrap();
        match &program.body[0] {
            Stmt::For { body, .. } => assert_eq!(body.len(), 1),
            other => panic!("Expected for loop, got {:?}", other),
        }
    }

    #[test]
    fn test_if_elif_else() {
        let source = "if a > b:\n    x = 1\nelif a < b:\n    x = 2\nelse:\n    x = 3\n";
        let program = parse_source(source).unwrap();
        match &program.body[0] {
            Stmt::If {
                branches, orelse, ..
            } => {
                assert_eq!(branches.len(), 2);
                assert_eq!(branches[0].condition.to_string(), "a > b");
                assert_eq!(branches[1].location.line, 3);
                assert_eq!(orelse.as_ref().map(|e| e.location.line), Some(5));
            }
            other => panic!("Expected if statement, got {:?}", other),
        }
    }

    #[test]
    fn test_function_definition_and_return() {
        let source = "def add(x, y):\n    return x + y\nz = add(1, 2)\n";
        let program = parse_source(source).unwrap();
        match &program.body[0] {
            Stmt::FunctionDef { name, params, body, .. } => {
                assert_eq!(name, "add");
                assert_eq!(params, &vec!["x".to_string(), "y".to_string()]);
                assert!(matches!(body[0], Stmt::Return { value: Some(_), .. }));
            }
            other => panic!("Expected function definition, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_colon_is_error() {
        let err = parse_source("for i in range(3)\n    print(i)\n").unwrap_err();
        assert!(err.message.contains("Expected ':'"), "{}", err);
    }

    #[test]
    fn test_unexpected_indent_is_error() {
        assert!(parse_source("x = 1\n    y = 2\n").is_err());
    }
}
