//! Lexer (tokenizer) for the traced language subset
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Block structure is indentation based, so the lexer tracks an indentation
//! stack and emits [`Token::Indent`] / [`Token::Dedent`] at the start of each
//! logical line. Newlines inside parentheses do not end a logical line.

use super::ast::SourceLocation;
use std::fmt;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and column without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    IntLiteral(i64, SourceLocation),
    FloatLiteral(f64, SourceLocation),

    // Identifiers
    Ident(String, SourceLocation),

    // Keywords
    For(SourceLocation),
    In(SourceLocation),
    If(SourceLocation),
    Elif(SourceLocation),
    Else(SourceLocation),
    Def(SourceLocation),
    Return(SourceLocation),
    True(SourceLocation),
    False(SourceLocation),
    None(SourceLocation),

    // Arithmetic
    Plus(SourceLocation),        // +
    Minus(SourceLocation),       // -
    Star(SourceLocation),        // *
    Slash(SourceLocation),       // /
    SlashSlash(SourceLocation),  // //
    Percent(SourceLocation),     // %
    StarStar(SourceLocation),    // **

    // Comparison
    EqEq(SourceLocation),  // ==
    NotEq(SourceLocation), // !=
    Lt(SourceLocation),    // <
    Le(SourceLocation),    // <=
    Gt(SourceLocation),    // >
    Ge(SourceLocation),    // >=

    // Assignment
    Eq(SourceLocation), // =

    // Punctuation
    LParen(SourceLocation), // (
    RParen(SourceLocation), // )
    Comma(SourceLocation),  // ,
    Colon(SourceLocation),  // :

    // Layout
    Newline(SourceLocation),
    Indent(SourceLocation),
    Dedent(SourceLocation),

    // End of file
    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::IntLiteral(_, loc)
            | Token::FloatLiteral(_, loc)
            | Token::Ident(_, loc)
            | Token::For(loc)
            | Token::In(loc)
            | Token::If(loc)
            | Token::Elif(loc)
            | Token::Else(loc)
            | Token::Def(loc)
            | Token::Return(loc)
            | Token::True(loc)
            | Token::False(loc)
            | Token::None(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::Slash(loc)
            | Token::SlashSlash(loc)
            | Token::Percent(loc)
            | Token::StarStar(loc)
            | Token::EqEq(loc)
            | Token::NotEq(loc)
            | Token::Lt(loc)
            | Token::Le(loc)
            | Token::Gt(loc)
            | Token::Ge(loc)
            | Token::Eq(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::Comma(loc)
            | Token::Colon(loc)
            | Token::Newline(loc)
            | Token::Indent(loc)
            | Token::Dedent(loc)
            | Token::Eof(loc) => *loc,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::IntLiteral(n, _) => write!(f, "int literal {}", n),
            Token::FloatLiteral(x, _) => write!(f, "float literal {}", x),
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::For(_) => write!(f, "'for'"),
            Token::In(_) => write!(f, "'in'"),
            Token::If(_) => write!(f, "'if'"),
            Token::Elif(_) => write!(f, "'elif'"),
            Token::Else(_) => write!(f, "'else'"),
            Token::Def(_) => write!(f, "'def'"),
            Token::Return(_) => write!(f, "'return'"),
            Token::True(_) => write!(f, "'True'"),
            Token::False(_) => write!(f, "'False'"),
            Token::None(_) => write!(f, "'None'"),
            Token::Plus(_) => write!(f, "'+'"),
            Token::Minus(_) => write!(f, "'-'"),
            Token::Star(_) => write!(f, "'*'"),
            Token::Slash(_) => write!(f, "'/'"),
            Token::SlashSlash(_) => write!(f, "'//'"),
            Token::Percent(_) => write!(f, "'%'"),
            Token::StarStar(_) => write!(f, "'**'"),
            Token::EqEq(_) => write!(f, "'=='"),
            Token::NotEq(_) => write!(f, "'!='"),
            Token::Lt(_) => write!(f, "'<'"),
            Token::Le(_) => write!(f, "'<='"),
            Token::Gt(_) => write!(f, "'>'"),
            Token::Ge(_) => write!(f, "'>='"),
            Token::Eq(_) => write!(f, "'='"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Colon(_) => write!(f, "':'"),
            Token::Newline(_) => write!(f, "end of line"),
            Token::Indent(_) => write!(f, "indent"),
            Token::Dedent(_) => write!(f, "dedent"),
            Token::Eof(_) => write!(f, "end of file"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Lexer error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

/// Columns a tab advances the indentation level by
const TAB_WIDTH: usize = 4;

/// Lexer for the traced language subset
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    indent_stack: Vec<usize>,
    paren_depth: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            indent_stack: vec![0],
            paren_depth: 0,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut at_line_start = true;

        loop {
            if at_line_start {
                if !self.handle_indentation()? {
                    continue;
                }
                at_line_start = false;
            }

            self.skip_inline_whitespace();

            match self.peek() {
                None => break,
                Some('#') => self.skip_comment(),
                Some('\n') => {
                    let loc = self.current_location();
                    self.advance();
                    if self.paren_depth == 0 {
                        self.push_newline(loc);
                        at_line_start = true;
                    }
                }
                Some('\\') if self.peek_ahead(1) == Some('\n') => {
                    // Explicit line continuation
                    self.advance();
                    self.advance();
                }
                Some(_) => {
                    let token = self.next_token()?;
                    self.tokens.push(token);
                }
            }
        }

        let loc = self.current_location();
        self.push_newline(loc);
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.tokens.push(Token::Dedent(loc));
        }
        self.tokens.push(Token::Eof(loc));

        Ok(self.tokens)
    }

    /// Measure the indentation of a new logical line and emit layout tokens.
    ///
    /// Returns `false` when the line was blank or comment-only and has been
    /// consumed entirely.
    fn handle_indentation(&mut self) -> Result<bool, LexError> {
        let mut level = 0;
        while let Some(ch) = self.peek() {
            match ch {
                ' ' => level += 1,
                '\t' => level += TAB_WIDTH,
                '\r' => {}
                _ => break,
            }
            self.advance();
        }

        match self.peek() {
            None => return Ok(true),
            Some('\n') => {
                self.advance();
                return Ok(false);
            }
            Some('#') => {
                self.skip_comment();
                if self.peek() == Some('\n') {
                    self.advance();
                }
                return Ok(false);
            }
            _ => {}
        }

        let loc = self.current_location();
        let current = self.indent_stack.last().copied().unwrap_or(0);

        if level > current {
            self.indent_stack.push(level);
            self.tokens.push(Token::Indent(loc));
        } else if level < current {
            while let Some(&stack_level) = self.indent_stack.last() {
                if stack_level <= level {
                    break;
                }
                self.indent_stack.pop();
                self.tokens.push(Token::Dedent(loc));
            }
            if self.indent_stack.last().copied().unwrap_or(0) != level {
                return Err(LexError {
                    message: "Unindent does not match any outer indentation level".to_string(),
                    location: loc,
                });
            }
        }

        Ok(true)
    }

    /// Emit a newline unless the previous token already ended the line
    fn push_newline(&mut self, loc: SourceLocation) {
        let ends_line = matches!(
            self.tokens.last(),
            None | Some(Token::Newline(_)) | Some(Token::Indent(_)) | Some(Token::Dedent(_))
        );
        if !ends_line {
            self.tokens.push(Token::Newline(loc));
        }
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file".to_string(),
            location: loc,
        })?;

        match ch {
            '0'..='9' => self.number_literal(ch, loc),
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                self.number_literal(ch, loc)
            }

            'a'..='z' | 'A'..='Z' | '_' => Ok(self.identifier_or_keyword(ch, loc)),

            '"' | '\'' => Err(LexError {
                message: "string literals are not supported".to_string(),
                location: loc,
            }),

            '+' => Ok(Token::Plus(loc)),
            '-' => Ok(Token::Minus(loc)),
            '*' => {
                if self.peek() == Some('*') {
                    self.advance();
                    Ok(Token::StarStar(loc))
                } else {
                    Ok(Token::Star(loc))
                }
            }
            '/' => {
                if self.peek() == Some('/') {
                    self.advance();
                    Ok(Token::SlashSlash(loc))
                } else {
                    Ok(Token::Slash(loc))
                }
            }
            '%' => Ok(Token::Percent(loc)),
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::EqEq(loc))
                } else {
                    Ok(Token::Eq(loc))
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::NotEq(loc))
                } else {
                    Err(LexError {
                        message: "Unexpected character: '!'".to_string(),
                        location: loc,
                    })
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::Le(loc))
                } else {
                    Ok(Token::Lt(loc))
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::Ge(loc))
                } else {
                    Ok(Token::Gt(loc))
                }
            }
            '(' => {
                self.paren_depth += 1;
                Ok(Token::LParen(loc))
            }
            ')' => {
                self.paren_depth = self.paren_depth.saturating_sub(1);
                Ok(Token::RParen(loc))
            }
            ',' => Ok(Token::Comma(loc)),
            ':' => Ok(Token::Colon(loc)),

            _ => Err(LexError {
                message: format!("Unexpected character: '{}'", ch),
                location: loc,
            }),
        }
    }

    /// Parse numeric literal (decimal integers and floats with optional exponent)
    fn number_literal(&mut self, first: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut text = String::new();
        text.push(first);
        let mut is_float = first == '.';

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || ch == '_' {
                self.advance();
                if ch != '_' {
                    text.push(ch);
                }
            } else if ch == '.' && !is_float {
                is_float = true;
                text.push(ch);
                self.advance();
            } else if ch == 'e' || ch == 'E' {
                is_float = true;
                text.push(ch);
                self.advance();
                if let Some(sign @ ('+' | '-')) = self.peek() {
                    text.push(sign);
                    self.advance();
                }
            } else {
                break;
            }
        }

        if is_float {
            text.parse::<f64>()
                .map(|value| Token::FloatLiteral(value, loc))
                .map_err(|_| LexError {
                    message: format!("Invalid float literal: {}", text),
                    location: loc,
                })
        } else {
            text.parse::<i64>()
                .map(|value| Token::IntLiteral(value, loc))
                .map_err(|_| LexError {
                    message: format!("Invalid integer literal: {}", text),
                    location: loc,
                })
        }
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "for" => Token::For(loc),
            "in" => Token::In(loc),
            "if" => Token::If(loc),
            "elif" => Token::Elif(loc),
            "else" => Token::Else(loc),
            "def" => Token::Def(loc),
            "return" => Token::Return(loc),
            "True" => Token::True(loc),
            "False" => Token::False(loc),
            "None" => Token::None(loc),
            _ => Token::Ident(ident, loc),
        }
    }

    fn skip_inline_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r') = self.peek() {
            self.advance();
        }
    }

    /// Skip a `#` comment up to (not including) the newline
    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<String> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = Lexer::new("x = a + 10").tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Ident(ref s, _) if s == "x"));
        assert!(matches!(tokens[1], Token::Eq(_)));
        assert!(matches!(tokens[2], Token::Ident(ref s, _) if s == "a"));
        assert!(matches!(tokens[3], Token::Plus(_)));
        assert!(matches!(tokens[4], Token::IntLiteral(10, _)));
        assert!(matches!(tokens[5], Token::Newline(_)));
        assert!(matches!(tokens[6], Token::Eof(_)));
    }

    #[test]
    fn test_operators() {
        let tokens = Lexer::new("** // <= >= == != < >").tokenize().unwrap();

        assert!(matches!(tokens[0], Token::StarStar(_)));
        assert!(matches!(tokens[1], Token::SlashSlash(_)));
        assert!(matches!(tokens[2], Token::Le(_)));
        assert!(matches!(tokens[3], Token::Ge(_)));
        assert!(matches!(tokens[4], Token::EqEq(_)));
        assert!(matches!(tokens[5], Token::NotEq(_)));
        assert!(matches!(tokens[6], Token::Lt(_)));
        assert!(matches!(tokens[7], Token::Gt(_)));
    }

    #[test]
    fn test_indent_and_dedent() {
        let source = "for i in range(3):\n    print(i)\nx = 1\n";
        let kinds = kinds(source);
        let newline_then_indent = kinds
            .windows(2)
            .any(|w| w[0] == "end of line" && w[1] == "indent");
        assert!(newline_then_indent, "{:?}", kinds);
        assert!(kinds.contains(&"dedent".to_string()));
        assert_eq!(kinds.last().map(String::as_str), Some("end of file"));
    }

    #[test]
    fn test_blank_lines_and_comments_are_skipped() {
        let source = "x = 1  # set x\n\n    # indented comment\ny = 2\n";
        let tokens = Lexer::new(source).tokenize().unwrap();
        assert!(!tokens.iter().any(|t| matches!(t, Token::Indent(_))));
        assert_eq!(
            tokens.iter().filter(|t| matches!(t, Token::Newline(_))).count(),
            2
        );
    }

    #[test]
    fn test_newlines_inside_parens_are_ignored() {
        let tokens = Lexer::new("print(a,\n      b)\n").tokenize().unwrap();
        assert_eq!(
            tokens.iter().filter(|t| matches!(t, Token::Newline(_))).count(),
            1
        );
    }

    #[test]
    fn test_number_literals() {
        let tokens = Lexer::new("1_000 2.5 3e2 .5").tokenize().unwrap();
        assert!(matches!(tokens[0], Token::IntLiteral(1000, _)));
        assert!(matches!(tokens[1], Token::FloatLiteral(x, _) if x == 2.5));
        assert!(matches!(tokens[2], Token::FloatLiteral(x, _) if x == 300.0));
        assert!(matches!(tokens[3], Token::FloatLiteral(x, _) if x == 0.5));
    }

    #[test]
    fn test_inconsistent_dedent_is_an_error() {
        let source = "if a:\n    x = 1\n  y = 2\n";
        let err = Lexer::new(source).tokenize().unwrap_err();
        assert_eq!(err.location.line, 3);
    }

    #[test]
    fn test_string_literal_rejected() {
        let err = Lexer::new("print('hi')").tokenize().unwrap_err();
        assert!(err.message.contains("string literals"));
    }
}
