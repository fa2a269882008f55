use crate::diagnostics::{self, Diagnostic};
use crate::location::Location;

use ariadne::{Color, Fmt};
use logos::Logos;
use thiserror::Error;
use yansi::Paint;

#[cfg(test)]
pub mod test;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    IntLiteral,
    BoolLiteral,
    Operator,
    Punctuation,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    pub location: Location,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind, location: Location) -> Self {
        Token {
            text: text.into(),
            kind,
            location,
        }
    }

    /// The "past end of input" marker handed out by the parser.
    pub fn end(location: Location) -> Self {
        Token::new("", TokenKind::End, location)
    }

    /// True when this is a real token spelled exactly `text`.
    pub fn is(&self, text: &str) -> bool {
        self.kind != TokenKind::End && self.text == text
    }

    /// How the token is shown in "found ..." parts of error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::End => "end of input".to_string(),
            _ => format!("\"{}\"", self.text),
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")] // whitespace, rows are recovered from byte offsets
#[logos(skip r"(//|#)[^\n]*")] // line comments
enum Lexeme {
    #[regex(r"True|False|true|false", priority = 10)]
    BoolLiteral,

    #[regex(r"[A-Za-z_][A-Za-z_0-9]*")]
    Identifier,

    #[regex(r"[0-9]+")]
    IntLiteral,

    #[token("/*", block_comment)]
    BlockComment,

    #[regex(r"==|!=|<=|>=|[-+*/%=<>]")]
    Operator,

    #[regex(r"[(){},;]")]
    Punctuation,
}

/// Swallows everything up to and including the next `*/`. An unterminated
/// comment consumes the rest of the input and fails.
fn block_comment(lex: &mut logos::Lexer<Lexeme>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

/// Converts increasing byte offsets into row/column locations.
struct LineTracker<'a> {
    source: &'a str,
    offset: usize,
    row: usize,
    column: usize,
}

impl<'a> LineTracker<'a> {
    fn new(source: &'a str) -> Self {
        LineTracker {
            source,
            offset: 0,
            row: 1,
            column: 1,
        }
    }

    fn locate(&mut self, offset: usize) -> Location {
        debug_assert!(offset >= self.offset, "offsets must be monotonic");
        for ch in self.source[self.offset..offset].chars() {
            if ch == '\n' {
                self.row += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset = offset;
        Location::new(self.row, self.column)
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tracker = LineTracker::new(source);
    let mut lexer = Lexeme::lexer(source);
    let mut tokens = Vec::new();

    while let Some(lexeme) = lexer.next() {
        let location = tracker.locate(lexer.span().start);
        let text = lexer.slice();
        let kind = match lexeme {
            Ok(Lexeme::BlockComment) => continue,
            Ok(Lexeme::BoolLiteral) => TokenKind::BoolLiteral,
            Ok(Lexeme::Identifier) => TokenKind::Identifier,
            Ok(Lexeme::IntLiteral) => TokenKind::IntLiteral,
            Ok(Lexeme::Operator) => TokenKind::Operator,
            Ok(Lexeme::Punctuation) => TokenKind::Punctuation,
            Err(()) if text.starts_with("/*") => {
                return Err(LexError::UnterminatedComment { location });
            }
            Err(()) => {
                return Err(LexError::UnexpectedCharacter {
                    character: text.chars().next().unwrap_or_default(),
                    location,
                });
            }
        };
        tokens.push(Token::new(text, kind, location));
    }

    Ok(tokens)
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("{location}: unexpected character {character:?}")]
    UnexpectedCharacter { character: char, location: Location },

    #[error("{location}: unterminated block comment")]
    UnterminatedComment { location: Location },
}

impl LexError {
    pub fn location(&self) -> Location {
        match self {
            LexError::UnexpectedCharacter { location, .. }
            | LexError::UnterminatedComment { location } => *location,
        }
    }

    pub fn to_report(&self, file: &str, source: &str) -> Diagnostic {
        match self {
            LexError::UnexpectedCharacter { character, location } => diagnostics::report_at(
                file,
                source,
                *location,
                "Lexical Error",
                "found a character that does not start any token",
                format!(
                    "unexpected character {}",
                    Fmt::fg(format!("{character:?}"), Color::Red).bold()
                ),
                Some("tokens are identifiers, integers, operators and ( ) { } , ;".to_string()),
            ),
            LexError::UnterminatedComment { location } => diagnostics::report_at(
                file,
                source,
                *location,
                "EOF",
                "reached end of file inside a block comment",
                format!(
                    "comment opened here is never closed with {}",
                    Fmt::fg("*/", Color::Yellow).bold()
                ),
                None,
            ),
        }
    }
}
