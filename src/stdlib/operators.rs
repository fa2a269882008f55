use super::{Builtin, Fault};
use crate::ast::Type;
use crate::interpreter::Value;
use crate::symtab::SymTab;

use crate::t_bool;
use crate::t_int;

pub const OPERATORS: &[Builtin] = &[
    Builtin::Add,
    Builtin::Sub,
    Builtin::Mul,
    Builtin::Div,
    Builtin::Mod,
    Builtin::Less,
    Builtin::Greater,
    Builtin::LessEq,
    Builtin::GreaterEq,
    Builtin::Eq,
    Builtin::NotEq,
    Builtin::And,
    Builtin::Or,
    Builtin::Neg,
    Builtin::Not,
];

pub fn add_operators<T>(table: &mut SymTab<'_, T>, payload: &mut impl FnMut(Builtin) -> Option<T>) {
    for &op in OPERATORS {
        if let Some(value) = payload(op) {
            table.define(op.name(), value);
        }
    }
}

pub(super) fn signature(op: Builtin) -> Type {
    match op {
        // (Int, Int) => Int
        Builtin::Add | Builtin::Sub | Builtin::Mul | Builtin::Div | Builtin::Mod => {
            Type::function(vec![t_int!(), t_int!()], t_int!())
        }
        // (Int, Int) => Bool
        Builtin::Less | Builtin::Greater | Builtin::LessEq | Builtin::GreaterEq => {
            Type::function(vec![t_int!(), t_int!()], t_bool!())
        }
        // (Bool, Bool) => Bool
        Builtin::And | Builtin::Or => Type::function(vec![t_bool!(), t_bool!()], t_bool!()),
        Builtin::Neg => Type::function(vec![t_int!()], t_int!()),
        Builtin::Not => Type::function(vec![t_bool!()], t_bool!()),
        _ => unreachable!("{} is not an operator with a fixed signature", op.name()),
    }
}

pub(super) fn apply(op: Builtin, args: &[Value]) -> Result<Value, Fault> {
    let value = match (op, args) {
        (Builtin::Add, [Value::Int(a), Value::Int(b)]) => Value::Int(a.wrapping_add(*b)),
        (Builtin::Sub, [Value::Int(a), Value::Int(b)]) => Value::Int(a.wrapping_sub(*b)),
        (Builtin::Mul, [Value::Int(a), Value::Int(b)]) => Value::Int(a.wrapping_mul(*b)),
        (Builtin::Div | Builtin::Mod, [Value::Int(_), Value::Int(0)]) => {
            return Err(Fault::DivisionByZero);
        }
        (Builtin::Div, [Value::Int(a), Value::Int(b)]) => Value::Int(a.wrapping_div(*b)),
        (Builtin::Mod, [Value::Int(a), Value::Int(b)]) => Value::Int(a.wrapping_rem(*b)),

        (Builtin::Less, [Value::Int(a), Value::Int(b)]) => Value::Bool(a < b),
        (Builtin::Greater, [Value::Int(a), Value::Int(b)]) => Value::Bool(a > b),
        (Builtin::LessEq, [Value::Int(a), Value::Int(b)]) => Value::Bool(a <= b),
        (Builtin::GreaterEq, [Value::Int(a), Value::Int(b)]) => Value::Bool(a >= b),

        (Builtin::Eq, [a, b]) if a.kind() == b.kind() => Value::Bool(a == b),
        (Builtin::NotEq, [a, b]) if a.kind() == b.kind() => Value::Bool(a != b),

        (Builtin::And, [Value::Bool(a), Value::Bool(b)]) => Value::Bool(*a && *b),
        (Builtin::Or, [Value::Bool(a), Value::Bool(b)]) => Value::Bool(*a || *b),

        (Builtin::Neg, [Value::Int(a)]) => Value::Int(a.wrapping_neg()),
        (Builtin::Not, [Value::Bool(a)]) => Value::Bool(!a),

        _ => return Err(op.bad_operands(args)),
    };
    Ok(value)
}
