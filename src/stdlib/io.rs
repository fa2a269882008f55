use super::{Builtin, Fault};
use crate::ast::Type;
use crate::interpreter::Value;
use crate::symtab::SymTab;

use crate::t_bool;
use crate::t_int;
use crate::t_unit;

use std::io::Write;

pub const IO_FUNCTIONS: &[Builtin] = &[Builtin::PrintInt, Builtin::PrintBool];

pub fn add_io_functions<T>(
    table: &mut SymTab<'_, T>,
    payload: &mut impl FnMut(Builtin) -> Option<T>,
) {
    for &function in IO_FUNCTIONS {
        if let Some(value) = payload(function) {
            table.define(function.name(), value);
        }
    }
}

pub(super) fn signature(function: Builtin) -> Type {
    match function {
        // print_int(x: Int) -> Unit
        Builtin::PrintInt => Type::function(vec![t_int!()], t_unit!()),
        // print_bool(x: Bool) -> Unit
        Builtin::PrintBool => Type::function(vec![t_bool!()], t_unit!()),
        _ => unreachable!("{} is not an io function", function.name()),
    }
}

pub(super) fn apply(function: Builtin, args: &[Value], out: &mut dyn Write) -> Result<Value, Fault> {
    let written = match (function, args) {
        (Builtin::PrintInt, [Value::Int(n)]) => writeln!(out, "{n}"),
        (Builtin::PrintBool, [Value::Bool(b)]) => writeln!(out, "{b}"),
        _ => return Err(function.bad_operands(args)),
    };
    written.map_err(|err| Fault::Io(err.to_string()))?;
    Ok(Value::Unit)
}
