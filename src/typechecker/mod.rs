pub mod expression;


use crate::ast::{Expression, Type};
use crate::diagnostics::{self, Diagnostic};
use crate::location::Location;
use crate::stdlib;
use crate::symtab::SymTab;

use ariadne::{Color, Fmt};
use thiserror::Error;
use yansi::Paint;

pub use expression::check_expression;

/// Names in scope mapped to their static types.
pub type TypeEnv<'a> = SymTab<'a, Type>;

/// A root scope holding the signature of every builtin that has one.
pub fn root_env() -> TypeEnv<'static> {
    let mut env = TypeEnv::new();
    stdlib::add_builtins(&mut env, |builtin| builtin.signature());
    env
}

/// Checks a whole program and returns the type of its value.
pub fn typecheck(ast: &Expression) -> Result<Type, TypeError> {
    check_expression(&mut root_env(), ast)
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeError {
    #[error("{location}: undefined name \"{name}\"")]
    UndefinedName { name: String, location: Location },

    #[error("{location}: {context} should be {expected}, found {found}")]
    Mismatch {
        context: String,
        expected: Type,
        found: Type,
        location: Location,
    },

    #[error("{location}: operands of \"{op}\" must have the same type, found {left} and {right}")]
    UnequalOperands {
        op: String,
        left: Type,
        right: Type,
        location: Location,
    },

    #[error("{location}: if branches have different types, {then_type} and {else_type}")]
    BranchMismatch {
        then_type: Type,
        else_type: Type,
        location: Location,
    },

    #[error("{location}: only a variable can be assigned to")]
    NotAssignable { location: Location },

    #[error("{location}: {found} is not a function")]
    NotAFunction { found: Type, location: Location },

    #[error("{location}: \"{function}\" takes {expected} argument(s) but {found} were given")]
    ArityMismatch {
        function: String,
        expected: usize,
        found: usize,
        location: Location,
    },
}

impl TypeError {
    pub fn location(&self) -> Location {
        match self {
            TypeError::UndefinedName { location, .. }
            | TypeError::Mismatch { location, .. }
            | TypeError::UnequalOperands { location, .. }
            | TypeError::BranchMismatch { location, .. }
            | TypeError::NotAssignable { location }
            | TypeError::NotAFunction { location, .. }
            | TypeError::ArityMismatch { location, .. } => *location,
        }
    }

    pub fn to_report(&self, file: &str, source: &str) -> Diagnostic {
        let location = self.location();
        let (code, message, label, note) = match self {
            TypeError::UndefinedName { name, .. } => (
                "Name Error",
                "undefined name".to_string(),
                format!("{} is not defined in this scope", Fmt::fg(name, Color::Red).bold()),
                Some("declare it first with `var name = value` inside a block".to_string()),
            ),
            TypeError::Mismatch {
                context,
                expected,
                found,
                ..
            } => (
                "Type Error",
                "type mismatch".to_string(),
                format!(
                    "{context} should be {} but is {}",
                    Fmt::fg(expected, Color::Yellow).bold(),
                    Fmt::fg(found, Color::Red).bold()
                ),
                None,
            ),
            TypeError::UnequalOperands {
                op, left, right, ..
            } => (
                "Type Error",
                format!("cannot compare {left} with {right}"),
                format!(
                    "{} needs both sides to be the same type, found {} and {}",
                    Fmt::fg(op, Color::Yellow).bold(),
                    Fmt::fg(left, Color::Red).bold(),
                    Fmt::fg(right, Color::Red).bold()
                ),
                None,
            ),
            TypeError::BranchMismatch {
                then_type,
                else_type,
                ..
            } => (
                "Type Error",
                "if and else have incompatible types".to_string(),
                format!(
                    "then-branch is {} but else-branch is {}",
                    Fmt::fg(then_type, Color::Yellow).bold(),
                    Fmt::fg(else_type, Color::Red).bold()
                ),
                None,
            ),
            TypeError::NotAssignable { .. } => (
                "Type Error",
                "invalid assignment target".to_string(),
                "the left side of this `=` is not a variable".to_string(),
                None,
            ),
            TypeError::NotAFunction { found, .. } => (
                "Type Error",
                "call of a non-function".to_string(),
                format!("this has type {} and cannot be called", Fmt::fg(found, Color::Red).bold()),
                None,
            ),
            TypeError::ArityMismatch {
                function,
                expected,
                found,
                ..
            } => (
                "Type Error",
                "wrong number of arguments".to_string(),
                format!(
                    "{} expects {} argument(s), got {}",
                    Fmt::fg(function, Color::Yellow).bold(),
                    expected,
                    Fmt::fg(found, Color::Red).bold()
                ),
                None,
            ),
        };
        diagnostics::report_at(file, source, location, code, message, label, note)
    }
}
