
use crate::ast::{ExprKind, Expression, Literal};
use crate::diagnostics::{self, Diagnostic};
use crate::location::Location;
use crate::stdlib::{self, Builtin, Fault};
use crate::symtab::{Scope, SymTab};

use ariadne::{Color, Fmt};
use thiserror::Error;
use yansi::Paint;

use std::fmt::{self, Display, Formatter};
use std::io::Write;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Unit,
    Builtin(Builtin),
}

impl Value {
    /// Name of the value's type, for messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "Int",
            Value::Bool(_) => "Bool",
            Value::Unit => "Unit",
            Value::Builtin(_) => "Function",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Unit => write!(f, "unit"),
            Value::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name()),
        }
    }
}

pub type ValueEnv<'a> = SymTab<'a, Value>;

/// A root scope with every builtin bound to its implementation.
pub fn root_env() -> ValueEnv<'static> {
    let mut env = ValueEnv::new();
    stdlib::add_builtins(&mut env, |builtin| Some(Value::Builtin(builtin)));
    env
}

/// Evaluates a program. Output of `print_int` and `print_bool` goes to `out`.
pub fn interpret(ast: &Expression, out: &mut dyn Write) -> Result<Value, RuntimeError> {
    Interpreter::new(out).eval(&mut root_env(), ast)
}

pub struct Interpreter<'w> {
    out: &'w mut dyn Write,
}

impl<'w> Interpreter<'w> {
    pub fn new(out: &'w mut dyn Write) -> Self {
        Interpreter { out }
    }

    pub fn eval(&mut self, env: &mut ValueEnv<'_>, expr: &Expression) -> Result<Value, RuntimeError> {
        let location = expr.location;
        match &expr.kind {
            ExprKind::Literal(Literal::Int(n)) => Ok(Value::Int(*n)),
            ExprKind::Literal(Literal::Bool(b)) => Ok(Value::Bool(*b)),
            ExprKind::Literal(Literal::Unit) => Ok(Value::Unit),

            ExprKind::Identifier { name } => lookup(env, name, location),

            ExprKind::UnaryOp { op, operand } => {
                let builtin = builtin(env, &format!("unary_{op}"), location)?;
                let operand = self.eval(env, operand)?;
                self.apply(builtin, &[operand], location)
            }

            ExprKind::BinaryOp { left, op, right } => match op.as_str() {
                "=" => {
                    let ExprKind::Identifier { name } = &left.kind else {
                        return Err(RuntimeError::NotAssignable {
                            location: left.location,
                        });
                    };
                    let value = self.eval(env, right)?;
                    env.set(name, value.clone())
                        .map_err(|_| RuntimeError::UndefinedName {
                            name: name.clone(),
                            location: left.location,
                        })?;
                    Ok(value)
                }
                "and" | "or" => {
                    let is_or = op == "or";
                    let left = self.eval_bool(env, left)?;
                    if left == is_or {
                        return Ok(Value::Bool(left));
                    }
                    Ok(Value::Bool(self.eval_bool(env, right)?))
                }
                _ => {
                    let builtin = builtin(env, op, location)?;
                    let left = self.eval(env, left)?;
                    let right = self.eval(env, right)?;
                    self.apply(builtin, &[left, right], location)
                }
            },

            ExprKind::IfExpression {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval_bool(env, condition)? {
                    let value = self.eval(env, then_branch)?;
                    Ok(if else_branch.is_some() { value } else { Value::Unit })
                } else if let Some(else_branch) = else_branch {
                    self.eval(env, else_branch)
                } else {
                    Ok(Value::Unit)
                }
            }

            ExprKind::FunctionCall {
                function,
                arguments,
            } => {
                let callee = match self.eval(env, function)? {
                    Value::Builtin(builtin) => builtin,
                    other => {
                        return Err(RuntimeError::NotAFunction {
                            found: other.kind(),
                            location: function.location,
                        });
                    }
                };
                let arguments = arguments
                    .iter()
                    .map(|argument| self.eval(env, argument))
                    .collect::<Result<Vec<_>, _>>()?;
                self.apply(callee, &arguments, location)
            }

            ExprKind::VariableDeclaration { name, value } => {
                let value = self.eval(env, value)?;
                env.define(name.clone(), value.clone());
                Ok(value)
            }

            ExprKind::Block { statements } => {
                let mut scope = env.create_child();
                let mut last = Value::Unit;
                for statement in statements {
                    last = self.eval(&mut scope, statement)?;
                }
                Ok(last)
            }
        }
    }

    fn eval_bool(&mut self, env: &mut ValueEnv<'_>, expr: &Expression) -> Result<bool, RuntimeError> {
        match self.eval(env, expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(RuntimeError::NotABool {
                found: other.kind(),
                location: expr.location,
            }),
        }
    }

    fn apply(&mut self, builtin: Builtin, args: &[Value], location: Location) -> Result<Value, RuntimeError> {
        builtin
            .apply(args, self.out)
            .map_err(|fault| RuntimeError::Builtin { fault, location })
    }
}

fn lookup(env: &ValueEnv<'_>, name: &str, location: Location) -> Result<Value, RuntimeError> {
    env.lookup(name).cloned().ok_or_else(|| RuntimeError::UndefinedName {
        name: name.to_string(),
        location,
    })
}

fn builtin(env: &ValueEnv<'_>, name: &str, location: Location) -> Result<Builtin, RuntimeError> {
    match lookup(env, name, location)? {
        Value::Builtin(builtin) => Ok(builtin),
        other => Err(RuntimeError::NotAFunction {
            found: other.kind(),
            location,
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("{location}: undefined name \"{name}\"")]
    UndefinedName { name: String, location: Location },

    #[error("{location}: expected a Bool, found {found}")]
    NotABool { found: &'static str, location: Location },

    #[error("{location}: {found} is not a function")]
    NotAFunction { found: &'static str, location: Location },

    #[error("{location}: only a variable can be assigned to")]
    NotAssignable { location: Location },

    #[error("{location}: {fault}")]
    Builtin { fault: Fault, location: Location },
}

impl RuntimeError {
    pub fn location(&self) -> Location {
        match self {
            RuntimeError::UndefinedName { location, .. }
            | RuntimeError::NotABool { location, .. }
            | RuntimeError::NotAFunction { location, .. }
            | RuntimeError::NotAssignable { location }
            | RuntimeError::Builtin { location, .. } => *location,
        }
    }

    pub fn to_report(&self, file: &str, source: &str) -> Diagnostic {
        let label = match self {
            RuntimeError::UndefinedName { name, .. } => {
                format!("{} is not defined here", Fmt::fg(name, Color::Red).bold())
            }
            RuntimeError::NotABool { found, .. } => format!(
                "expected {} but this evaluated to {}",
                Fmt::fg("Bool", Color::Yellow).bold(),
                Fmt::fg(found, Color::Red).bold()
            ),
            RuntimeError::NotAFunction { found, .. } => {
                format!("a value of type {} cannot be called", Fmt::fg(found, Color::Red).bold())
            }
            RuntimeError::NotAssignable { .. } => {
                "the left side of this `=` is not a variable".to_string()
            }
            RuntimeError::Builtin { fault, .. } => Fmt::fg(fault, Color::Red).bold().to_string(),
        };
        diagnostics::report_at(
            file,
            source,
            self.location(),
            "Runtime Error",
            "evaluation failed",
            label,
            None,
        )
    }
}
