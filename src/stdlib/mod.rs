pub mod io;
pub mod operators;

use crate::ast::Type;
use crate::interpreter::Value;
use crate::symtab::SymTab;

use thiserror::Error;

use std::io::Write;

/// Everything bound in the root scope before a program runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    Less,
    Greater,
    LessEq,
    GreaterEq,
    Eq,
    NotEq,

    And,
    Or,

    Neg,
    Not,

    PrintInt,
    PrintBool,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Fault {
    #[error("division by zero")]
    DivisionByZero,

    #[error("`{builtin}` cannot be applied to ({found})")]
    BadOperands { builtin: &'static str, found: String },

    #[error("could not write output: {0}")]
    Io(String),
}

impl Builtin {
    pub fn all() -> impl Iterator<Item = Builtin> {
        operators::OPERATORS.iter().chain(io::IO_FUNCTIONS).copied()
    }

    pub fn from_name(name: &str) -> Option<Builtin> {
        Builtin::all().find(|builtin| builtin.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Add => "+",
            Builtin::Sub => "-",
            Builtin::Mul => "*",
            Builtin::Div => "/",
            Builtin::Mod => "%",
            Builtin::Less => "<",
            Builtin::Greater => ">",
            Builtin::LessEq => "<=",
            Builtin::GreaterEq => ">=",
            Builtin::Eq => "==",
            Builtin::NotEq => "!=",
            Builtin::And => "and",
            Builtin::Or => "or",
            Builtin::Neg => "unary_-",
            Builtin::Not => "unary_not",
            Builtin::PrintInt => "print_int",
            Builtin::PrintBool => "print_bool",
        }
    }

    /// The builtin's function type. `==` and `!=` accept any two operands of
    /// the same type, which no single signature expresses, so they have none.
    pub fn signature(self) -> Option<Type> {
        match self {
            Builtin::Eq | Builtin::NotEq => None,
            Builtin::PrintInt | Builtin::PrintBool => Some(io::signature(self)),
            _ => Some(operators::signature(self)),
        }
    }

    pub fn apply(self, args: &[Value], out: &mut dyn Write) -> Result<Value, Fault> {
        match self {
            Builtin::PrintInt | Builtin::PrintBool => io::apply(self, args, out),
            _ => operators::apply(self, args),
        }
    }

    fn bad_operands(self, args: &[Value]) -> Fault {
        let found = args
            .iter()
            .map(Value::kind)
            .collect::<Vec<_>>()
            .join(", ");
        Fault::BadOperands {
            builtin: self.name(),
            found,
        }
    }
}

/// Names a back end has to bind: every builtin plus the `unit` sentinel.
pub fn reserved_names() -> Vec<String> {
    std::iter::once("unit")
        .chain(Builtin::all().map(Builtin::name))
        .map(str::to_string)
        .collect()
}

/// Seeds a root scope with one payload per builtin. Builtins for which
/// `payload` returns `None` are left unbound.
pub fn add_builtins<T>(table: &mut SymTab<'_, T>, mut payload: impl FnMut(Builtin) -> Option<T>) {
    operators::add_operators(table, &mut payload);
    io::add_io_functions(table, &mut payload);
}
