//! Whole-pipeline tests going from source text to IR and to evaluated values

use exprc::ast::Type;
use exprc::interpreter::Value;
use exprc::ir;
use exprc::{CompileError, compile, run};

use indoc::indoc;
use pretty_assertions::assert_eq;

/// Run a program, returning its value and everything it printed
fn run_program(input: &str) -> (Value, String) {
    let mut out = Vec::new();
    let value = run(input, &mut out).expect("program should run");
    (value, String::from_utf8(out).expect("output should be utf-8"))
}

#[test]
fn e2e_addition_ir() {
    let compiled = compile("2 + 3").expect("compile failed");
    assert_eq!(compiled.ty, Type::Int);
    assert_eq!(
        ir::listing(&compiled.instructions),
        indoc! {"
            LoadIntConst(2, x1)
            LoadIntConst(3, x2)
            Call(+, [x1, x2], x3)
            Call(print_int, [x3], x4)
        "}
    );
}

#[test]
fn e2e_empty_program() {
    let compiled = compile("  // nothing here\n").expect("compile failed");
    assert!(compiled.ast.is_none());
    assert!(compiled.instructions.is_empty());
    assert_eq!(compiled.ty, Type::Unit);
}

#[test]
fn e2e_reserved_names_listed() {
    let compiled = compile("1").expect("compile failed");
    for name in ["unit", "+", "unary_-", "unary_not", "print_int", "print_bool"] {
        assert!(compiled.reserved_names.iter().any(|reserved| reserved == name), "{name}");
    }
}

#[test]
fn e2e_var_block() {
    let compiled = compile("{ var x = 1 + 2 }").expect("compile failed");
    assert_eq!(compiled.ty, Type::Int);
    let (value, _) = run_program("{ var x = 1 + 2 }");
    assert_eq!(value, Value::Int(3));
}

#[test]
fn e2e_program_with_output() {
    let source = indoc! {"
        /* sum the first few numbers */
        {
            var total = 0;
            var i = 1;
            total = total + i; i = i + 1;
            total = total + i; i = i + 1;
            total = total + i;
            print_int(total);
            if total > 5 then print_bool(true) else print_bool(false);
            total * 2
        }
    "};
    let (value, output) = run_program(source);
    assert_eq!(value, Value::Int(12));
    assert_eq!(output, "6\ntrue\n");

    let compiled = compile(source).expect("compile failed");
    let last = compiled.instructions.last().expect("some instructions");
    assert!(last.to_string().starts_with("Call(print_int, "));
}

#[test]
fn e2e_lex_error() {
    let err = compile("1 @ 2").unwrap_err();
    assert!(matches!(err, CompileError::Lex(_)));
    assert_eq!(err.to_string(), "1:3: unexpected character '@'");
}

#[test]
fn e2e_parse_error() {
    let err = compile("{ a b }").unwrap_err();
    assert!(matches!(err, CompileError::Parse(_)));
}

#[test]
fn e2e_type_errors() {
    for source in ["1 + True", "if 1 then 2 else 3", "if true then 1 else True"] {
        let err = compile(source).unwrap_err();
        assert!(matches!(err, CompileError::Type(_)), "{source}: {err}");
    }
}

#[test]
fn e2e_runtime_error() {
    let mut out = Vec::new();
    let err = run("10 % (5 - 5)", &mut out).unwrap_err();
    assert!(matches!(err, CompileError::Runtime(_)));
    assert_eq!(err.location().map(|l| (l.row, l.column)), Some((1, 4)));
}

#[test]
fn e2e_errors_render_as_reports() {
    let source = "{ var x = 1; x = true }";
    let err = compile(source).unwrap_err();
    let rendered = exprc::diagnostics::render(&err.to_report("main.expr", source), "main.expr", source)
        .expect("report should render");
    assert!(rendered.contains("main.expr"));
}
