use crate::ast::{Expression, Type};
use crate::diagnostics::Diagnostic;
use crate::interpreter::{self, RuntimeError, Value};
use crate::ir::{self, IRValidator, Instruction, IrError};
use crate::lexer::{self, LexError};
use crate::location::Location;
use crate::parser::{self, ParseError};
use crate::stdlib;
use crate::typechecker::{self, TypeError};

use thiserror::Error;

use std::io::Write;

/// Everything the front end produced for one source text.
#[derive(Debug)]
pub struct Compiled {
    pub ast: Option<Expression>,
    pub ty: Type,
    pub instructions: Vec<Instruction>,
    /// Names the IR uses without defining; a back end has to bind them.
    pub reserved_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Ir(#[from] IrError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("generated IR is malformed: {}", .0.join("; "))]
    Malformed(Vec<String>),
}

impl CompileError {
    pub fn location(&self) -> Option<Location> {
        match self {
            CompileError::Lex(err) => Some(err.location()),
            CompileError::Parse(err) => Some(err.location()),
            CompileError::Type(err) => Some(err.location()),
            CompileError::Ir(err) => Some(err.location()),
            CompileError::Runtime(err) => Some(err.location()),
            CompileError::Malformed(_) => None,
        }
    }

    pub fn to_report(&self, file: &str, source: &str) -> Diagnostic {
        match self {
            CompileError::Lex(err) => err.to_report(file, source),
            CompileError::Parse(err) => err.to_report(file, source),
            CompileError::Type(err) => err.to_report(file, source),
            CompileError::Ir(err) => err.to_report(file, source),
            CompileError::Runtime(err) => err.to_report(file, source),
            CompileError::Malformed(problems) => crate::diagnostics::report_at(
                file,
                source,
                Location::default(),
                "Internal Error",
                "generated IR is malformed",
                problems.join("\n"),
                None,
            ),
        }
    }
}

fn front_end(source: &str) -> Result<Option<(Expression, Type)>, CompileError> {
    let tokens = lexer::tokenize(source)?;
    let Some(ast) = parser::parse(&tokens)? else {
        return Ok(None);
    };
    let ty = typechecker::typecheck(&ast)?;
    Ok(Some((ast, ty)))
}

/// Tokenizes, parses, type checks and lowers `source` to IR.
pub fn compile(source: &str) -> Result<Compiled, CompileError> {
    let reserved_names = stdlib::reserved_names();

    let Some((ast, ty)) = front_end(source)? else {
        return Ok(Compiled {
            ast: None,
            ty: Type::Unit,
            instructions: vec![],
            reserved_names,
        });
    };

    let instructions = ir::generate_ir(&reserved_names, &ast, &ty)?;
    IRValidator::validate(&instructions, &reserved_names).map_err(CompileError::Malformed)?;

    Ok(Compiled {
        ast: Some(ast),
        ty,
        instructions,
        reserved_names,
    })
}

/// Type checks `source` and evaluates it directly, without going through IR.
pub fn run(source: &str, out: &mut dyn Write) -> Result<Value, CompileError> {
    match front_end(source)? {
        Some((ast, _)) => Ok(interpreter::interpret(&ast, out)?),
        None => Ok(Value::Unit),
    }
}
