use crate::ast::{ExprKind, Expression};
use crate::lexer::TokenKind;
use crate::location::Location;
use crate::parser::{KEYWORDS, ParseError, Parser};

/// Left-associative binary operators, loosest binding first.
const BINARY_LEVELS: &[&[&str]] = &[
    &["or"],
    &["and"],
    &["==", "!="],
    &["<", "<=", ">", ">="],
    &["+", "-"],
    &["*", "/", "%"],
];

const UNARY_OPERATORS: &[&str] = &["-", "not"];

impl Parser<'_> {
    pub fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        self.nested(Self::parse_assignment)
    }

    fn parse_assignment(&mut self) -> Result<Expression, ParseError> {
        let target = self.parse_binary(0)?;

        if !self.peek().is("=") {
            return Ok(target);
        }
        let op = self.advance();
        if !matches!(target.kind, ExprKind::Identifier { .. }) {
            return Err(ParseError::InvalidAssignmentTarget {
                location: op.location,
            });
        }
        // right-associative: `x = y = 2` assigns `y = 2` first
        let value = self.parse_expression()?;
        Ok(Expression::binary(target, op.text, value, op.location))
    }

    fn parse_binary(&mut self, level: usize) -> Result<Expression, ParseError> {
        let Some(operators) = BINARY_LEVELS.get(level) else {
            return self.parse_unary();
        };

        let mut left = self.parse_binary(level + 1)?;
        while self.peek_is_any(operators) {
            let op = self.advance();
            let right = self.parse_binary(level + 1)?;
            left = Expression::binary(left, op.text, right, op.location);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        if !self.peek_is_any(UNARY_OPERATORS) {
            return self.parse_atom();
        }
        let op = self.advance();
        let operand = self.nested(Self::parse_unary)?;
        Ok(Expression::unary(op.text, operand, op.location))
    }

    fn parse_atom(&mut self) -> Result<Expression, ParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::IntLiteral => self.parse_int_literal(),
            TokenKind::BoolLiteral => {
                self.advance();
                let value = matches!(token.text.as_str(), "True" | "true");
                Ok(Expression::bool(value, token.location))
            }
            TokenKind::Identifier if token.text == "if" => self.parse_if_expression(),
            TokenKind::Identifier if token.text == "var" => Err(ParseError::MisplacedDeclaration {
                location: token.location,
            }),
            TokenKind::Identifier => self.parse_identifier_or_call(),
            TokenKind::Punctuation if token.text == "(" => self.parse_parenthesized(),
            TokenKind::Punctuation if token.text == "{" => self.parse_block(),
            _ => Err(self.expected("\"(\", \"{\", \"if\", a literal or an identifier")),
        }
    }

    fn parse_int_literal(&mut self) -> Result<Expression, ParseError> {
        let token = self.advance();
        match token.text.parse::<i64>() {
            Ok(value) => Ok(Expression::int(value, token.location)),
            Err(_) => Err(ParseError::IntegerOutOfRange {
                literal: token.text,
                location: token.location,
            }),
        }
    }

    /// An identifier that is not a keyword, consumed.
    pub(super) fn parse_name(&mut self) -> Result<(String, Location), ParseError> {
        let token = self.peek();
        if token.kind != TokenKind::Identifier {
            return Err(self.expected("an identifier"));
        }
        if KEYWORDS.contains(&token.text.as_str()) {
            return Err(ParseError::ReservedWord {
                word: token.text.clone(),
                location: token.location,
            });
        }
        let token = self.advance();
        Ok((token.text, token.location))
    }

    fn parse_identifier_or_call(&mut self) -> Result<Expression, ParseError> {
        let (name, location) = self.parse_name()?;
        let identifier = Expression::identifier(name, location);

        if !self.peek().is("(") {
            return Ok(identifier);
        }
        self.advance();

        let mut arguments = vec![];
        if !self.peek().is(")") {
            loop {
                arguments.push(self.parse_expression()?);
                if self.peek().is(",") {
                    self.advance();
                } else if self.peek().is(")") {
                    break;
                } else {
                    return Err(self.expected("\",\" or \")\""));
                }
            }
        }
        self.consume(")")?;

        Ok(Expression::call(identifier, arguments, location))
    }

    fn parse_parenthesized(&mut self) -> Result<Expression, ParseError> {
        self.consume("(")?;
        let expr = self.parse_expression()?;
        self.consume(")")?;
        Ok(expr)
    }

    fn parse_if_expression(&mut self) -> Result<Expression, ParseError> {
        let if_token = self.consume("if")?;
        let condition = self.parse_expression()?;
        self.consume("then")?;
        let then_branch = self.parse_expression()?;

        let else_branch = if self.peek().is("else") {
            self.advance();
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(Expression::if_else(
            condition,
            then_branch,
            else_branch,
            if_token.location,
        ))
    }
}
