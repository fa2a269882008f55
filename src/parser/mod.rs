pub mod block;
pub mod expression;

#[cfg(test)]
pub mod test;

use crate::ast::Expression;
use crate::diagnostics::{self, Diagnostic};
use crate::lexer::{Token, TokenKind};
use crate::location::Location;

use ariadne::{Color, Fmt};
use thiserror::Error;
use yansi::Paint;

/// Words that read as identifiers to the tokenizer but belong to the grammar.
pub const KEYWORDS: &[&str] = &["if", "then", "else", "var", "not", "and", "or"];

/// How deeply expressions may nest before parsing gives up.
pub const MAX_DEPTH: usize = 64;

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    end: Token,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        let end_location = tokens.last().map_or_else(Location::default, |t| t.location);
        Parser {
            tokens,
            pos: 0,
            depth: 0,
            end: Token::end(end_location),
        }
    }

    pub fn parse_program(&mut self) -> Result<Option<Expression>, ParseError> {
        if self.tokens.is_empty() {
            return Ok(None);
        }
        if self.peek().is("var") {
            return Err(ParseError::MisplacedDeclaration {
                location: self.peek().location,
            });
        }

        let expr = self.parse_expression()?;

        let next = self.peek();
        if next.kind != TokenKind::End {
            return Err(ParseError::TrailingToken {
                found: next.text.clone(),
                location: next.location,
            });
        }
        Ok(Some(expr))
    }

    /// Runs `parse` one nesting level deeper.
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep {
                location: self.peek().location,
            });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// The current token, or the end marker once the input is used up.
    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.end)
    }

    fn peek_is_any(&self, texts: &[&str]) -> bool {
        texts.iter().any(|text| self.peek().is(text))
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Takes the current token if it is spelled `expected`.
    fn consume(&mut self, expected: &str) -> Result<Token, ParseError> {
        if self.peek().is(expected) {
            Ok(self.advance())
        } else {
            Err(self.expected(format!("\"{expected}\"")))
        }
    }

    fn expected(&self, what: impl Into<String>) -> ParseError {
        let found = self.peek();
        ParseError::Expected {
            expected: what.into(),
            found: found.describe(),
            location: found.location,
        }
    }
}

pub fn parse(tokens: &[Token]) -> Result<Option<Expression>, ParseError> {
    Parser::new(tokens).parse_program()
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("{location}: expected {expected}, found {found}")]
    Expected {
        expected: String,
        found: String,
        location: Location,
    },

    #[error("{location}: expected \";\" between statements, found \"{found}\"")]
    MissingSemicolon { found: String, location: Location },

    #[error("{location}: unexpected trailing token \"{found}\"")]
    TrailingToken { found: String, location: Location },

    #[error("{location}: only a variable can be assigned to")]
    InvalidAssignmentTarget { location: Location },

    #[error("{location}: integer literal {literal} does not fit in 64 bits")]
    IntegerOutOfRange { literal: String, location: Location },

    #[error("{location}: variables can only be declared inside a block")]
    MisplacedDeclaration { location: Location },

    #[error("{location}: \"{word}\" is a keyword and cannot be used as a name")]
    ReservedWord { word: String, location: Location },

    #[error("{location}: expression nests more than {} levels deep", MAX_DEPTH)]
    TooDeep { location: Location },
}

impl ParseError {
    pub fn location(&self) -> Location {
        match self {
            ParseError::Expected { location, .. }
            | ParseError::MissingSemicolon { location, .. }
            | ParseError::TrailingToken { location, .. }
            | ParseError::InvalidAssignmentTarget { location }
            | ParseError::IntegerOutOfRange { location, .. }
            | ParseError::MisplacedDeclaration { location }
            | ParseError::ReservedWord { location, .. }
            | ParseError::TooDeep { location } => *location,
        }
    }

    pub fn to_report(&self, file: &str, source: &str) -> Diagnostic {
        let location = self.location();
        match self {
            ParseError::Expected {
                expected, found, ..
            } => diagnostics::report_at(
                file,
                source,
                location,
                if found == "end of input" { "EOF" } else { "Syntax Error" },
                format!("expected {expected}"),
                format!(
                    "expected {} but found {}",
                    Fmt::fg(expected, Color::Yellow).bold(),
                    Fmt::fg(found, Color::Red).bold()
                ),
                None,
            ),
            ParseError::MissingSemicolon { found, .. } => diagnostics::report_at(
                file,
                source,
                location,
                "Syntax Error",
                "missing semicolon between statements",
                format!(
                    "expected {} before {}",
                    Fmt::fg(";", Color::Yellow).bold(),
                    Fmt::fg(found, Color::Red).bold()
                ),
                Some("`;` may only be left out after an if, a block, a call or a `var`".to_string()),
            ),
            ParseError::TrailingToken { found, .. } => diagnostics::report_at(
                file,
                source,
                location,
                "Syntax Error",
                "unexpected trailing token",
                format!(
                    "{} after the end of the expression",
                    Fmt::fg(found, Color::Red).bold()
                ),
                Some("wrap several expressions in a block: { a; b }".to_string()),
            ),
            ParseError::InvalidAssignmentTarget { .. } => diagnostics::report_at(
                file,
                source,
                location,
                "Syntax Error",
                "invalid assignment target",
                "the left side of this `=` is not a variable",
                None,
            ),
            ParseError::IntegerOutOfRange { literal, .. } => diagnostics::report_at(
                file,
                source,
                location,
                "Syntax Error",
                "integer literal out of range",
                format!("{} does not fit in an Int", Fmt::fg(literal, Color::Red).bold()),
                Some(format!("the largest Int is {}", i64::MAX)),
            ),
            ParseError::MisplacedDeclaration { .. } => diagnostics::report_at(
                file,
                source,
                location,
                "Syntax Error",
                "variable declaration outside of a block",
                format!("{} is only allowed as a block statement", Fmt::fg("var", Color::Yellow).bold()),
                None,
            ),
            ParseError::ReservedWord { word, .. } => diagnostics::report_at(
                file,
                source,
                location,
                "Syntax Error",
                "keyword used as a name",
                format!("{} is a keyword", Fmt::fg(word, Color::Red).bold()),
                None,
            ),
            ParseError::TooDeep { .. } => diagnostics::report_at(
                file,
                source,
                location,
                "Syntax Error",
                "expression nested too deeply",
                format!("nesting passes {} levels here", Fmt::fg(MAX_DEPTH, Color::Red).bold()),
                None,
            ),
        }
    }
}
