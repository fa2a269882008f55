use crate::ast::Expression;
use crate::lexer::TokenKind;
use crate::parser::{ParseError, Parser};

impl Parser<'_> {
    /// `{ s1; s2; ... }`. The `;` after a statement may be left out when the
    /// statement is compound (if, block, call, var). A trailing `;` makes the
    /// block evaluate to unit.
    pub fn parse_block(&mut self) -> Result<Expression, ParseError> {
        let open = self.consume("{")?;
        let mut statements = vec![];

        while !self.peek().is("}") {
            let statement = self.parse_statement()?;
            let compound = statement.is_compound();
            statements.push(statement);

            if self.peek().is(";") {
                let semicolon = self.advance();
                if self.peek().is("}") {
                    statements.push(Expression::unit(semicolon.location));
                }
                continue;
            }

            let next = self.peek();
            if next.is("}") {
                break;
            }
            if next.kind == TokenKind::End {
                return Err(self.expected("\";\" or \"}\""));
            }
            if !compound {
                return Err(ParseError::MissingSemicolon {
                    found: next.text.clone(),
                    location: next.location,
                });
            }
        }
        self.consume("}")?;

        Ok(Expression::block(statements, open.location))
    }

    fn parse_statement(&mut self) -> Result<Expression, ParseError> {
        if self.peek().is("var") {
            self.parse_variable_declaration()
        } else {
            self.parse_expression()
        }
    }

    fn parse_variable_declaration(&mut self) -> Result<Expression, ParseError> {
        let var = self.consume("var")?;
        let (name, _) = self.parse_name()?;
        self.consume("=")?;
        let value = self.parse_expression()?;
        Ok(Expression::var(name, value, var.location))
    }
}
