use super::*;
use crate::ast::ExprKind;
use crate::lexer::tokenize;

use indoc::indoc;
use pretty_assertions::assert_eq;

const L: Location = Location::synthetic();

// Helper function to go straight from source text to a tree
fn parse_str(input: &str) -> Result<Option<Expression>, ParseError> {
    let tokens = tokenize(input).expect("test input should tokenize");
    parse(&tokens)
}

fn parse_ok(input: &str) -> Expression {
    parse_str(input)
        .expect("test input should parse")
        .expect("test input should not be empty")
}

fn parse_err(input: &str) -> ParseError {
    parse_str(input).expect_err("test input should not parse")
}

fn int(value: i64) -> Expression {
    Expression::int(value, L)
}

fn ident(name: &str) -> Expression {
    Expression::identifier(name, L)
}

fn bin(left: Expression, op: &str, right: Expression) -> Expression {
    Expression::binary(left, op, right, L)
}

fn block(statements: Vec<Expression>) -> Expression {
    Expression::block(statements, L)
}

fn call(name: &str, arguments: Vec<Expression>) -> Expression {
    Expression::call(ident(name), arguments, L)
}

#[test]
fn test_empty_input() {
    assert_eq!(parse(&[]), Ok(None));
    assert_eq!(parse_str("// only a comment"), Ok(None));
}

#[test]
fn test_parse_literals() {
    assert_eq!(parse_ok("5"), int(5));
    assert_eq!(parse_ok("True"), Expression::bool(true, L));
    assert_eq!(parse_ok("false"), Expression::bool(false, L));
    assert_eq!(parse_ok("my_var"), ident("my_var"));
}

#[test]
fn test_addition_is_left_associative() {
    assert_eq!(
        parse_ok("1 - 2 - 3"),
        bin(bin(int(1), "-", int(2)), "-", int(3))
    );
}

#[test]
fn test_multiplication_binds_tighter() {
    assert_eq!(
        parse_ok("1 + 2 * 3"),
        bin(int(1), "+", bin(int(2), "*", int(3)))
    );
    assert_eq!(
        parse_ok("(1 + 2) % 3"),
        bin(bin(int(1), "+", int(2)), "%", int(3))
    );
}

#[test]
fn test_full_precedence_ladder() {
    assert_eq!(
        parse_ok("a or b and c == d < e + f * g"),
        bin(
            ident("a"),
            "or",
            bin(
                ident("b"),
                "and",
                bin(
                    ident("c"),
                    "==",
                    bin(
                        ident("d"),
                        "<",
                        bin(ident("e"), "+", bin(ident("f"), "*", ident("g")))
                    )
                )
            )
        )
    );
}

#[test]
fn test_assignment_is_right_associative() {
    assert_eq!(
        parse_ok("x = y = 2"),
        bin(ident("x"), "=", bin(ident("y"), "=", int(2)))
    );
    assert_eq!(
        parse_ok("x = 1 + 2"),
        bin(ident("x"), "=", bin(int(1), "+", int(2)))
    );
}

#[test]
fn test_assignment_needs_a_variable() {
    assert_eq!(
        parse_err("1 + x = 2"),
        ParseError::InvalidAssignmentTarget {
            location: Location::new(1, 7),
        }
    );
}

#[test]
fn test_unary_operators_nest() {
    assert_eq!(
        parse_ok("not not x"),
        Expression::unary("not", Expression::unary("not", ident("x"), L), L)
    );
    assert_eq!(
        parse_ok("- 1 * 2"),
        bin(Expression::unary("-", int(1), L), "*", int(2))
    );
    assert_eq!(
        parse_ok("1 - -2"),
        bin(int(1), "-", Expression::unary("-", int(2), L))
    );
}

#[test]
fn test_if_on_right_of_operator() {
    assert_eq!(
        parse_ok("1 + if true then 2 else 3"),
        bin(
            int(1),
            "+",
            Expression::if_else(Expression::bool(true, L), int(2), Some(int(3)), L)
        )
    );
}

#[test]
fn test_if_without_else() {
    let parsed = parse_ok("if a then b");
    assert_eq!(parsed, Expression::if_else(ident("a"), ident("b"), None, L));
}

#[test]
fn test_if_location_is_the_if_keyword() {
    let parsed = parse_ok("  if a then b");
    assert_eq!(parsed.location, Location::new(1, 3));
    assert!(!parsed.location.synthetic);
}

#[test]
fn test_binary_location_is_the_operator() {
    let parsed = parse_ok("a +\n b");
    assert_eq!(parsed.location, Location::new(1, 3));
}

#[test]
fn test_function_calls() {
    assert_eq!(parse_ok("f()"), call("f", vec![]));
    assert_eq!(
        parse_ok("f(x, y + z)"),
        call("f", vec![ident("x"), bin(ident("y"), "+", ident("z"))])
    );
    assert_eq!(
        parse_ok("f(a = 1, if b then c else d)"),
        call(
            "f",
            vec![
                bin(ident("a"), "=", int(1)),
                Expression::if_else(ident("b"), ident("c"), Some(ident("d")), L),
            ]
        )
    );
}

#[test]
fn test_nested_calls() {
    assert_eq!(
        parse_ok("print_int(f(1))"),
        call("print_int", vec![call("f", vec![int(1)])])
    );
}

#[test]
fn test_call_argument_errors() {
    assert!(matches!(
        parse_err("f(1 2)"),
        ParseError::Expected { found, .. } if found == "\"2\""
    ));
    assert!(matches!(
        parse_err("f(1,"),
        ParseError::Expected { found, .. } if found == "end of input"
    ));
}

#[test]
fn test_blocks() {
    assert_eq!(parse_ok("{}"), block(vec![]));
    assert_eq!(parse_ok("{ a }"), block(vec![ident("a")]));
    assert_eq!(parse_ok("{ a; b }"), block(vec![ident("a"), ident("b")]));
}

#[test]
fn test_trailing_semicolon_yields_unit() {
    assert_eq!(
        parse_ok("{ a; }"),
        block(vec![ident("a"), Expression::unit(L)])
    );
}

#[test]
fn test_variable_declarations() {
    assert_eq!(
        parse_ok("{ var x = 1 + 2 }"),
        block(vec![Expression::var("x", bin(int(1), "+", int(2)), L)])
    );
    assert_eq!(
        parse_ok("{ var x = 1 var y = 2 }"),
        block(vec![
            Expression::var("x", int(1), L),
            Expression::var("y", int(2), L),
        ])
    );
}

#[test]
fn test_var_only_in_blocks() {
    assert!(matches!(
        parse_err("var x = 1"),
        ParseError::MisplacedDeclaration { .. }
    ));
    assert!(matches!(
        parse_err("{ 1 + var x = 2 }"),
        ParseError::MisplacedDeclaration { .. }
    ));
}

#[test]
fn test_missing_semicolon() {
    assert_eq!(
        parse_err("{ a b }"),
        ParseError::MissingSemicolon {
            found: "b".to_string(),
            location: Location::new(1, 5),
        }
    );
}

#[test]
fn test_compound_statements_skip_semicolon() {
    assert_eq!(
        parse_ok("{ if true then { a } b }"),
        block(vec![
            Expression::if_else(Expression::bool(true, L), block(vec![ident("a")]), None, L),
            ident("b"),
        ])
    );
    assert_eq!(
        parse_ok("{ { a } { b } }"),
        block(vec![block(vec![ident("a")]), block(vec![ident("b")])])
    );
    assert_eq!(
        parse_ok("{ f(1) g(2) }"),
        block(vec![call("f", vec![int(1)]), call("g", vec![int(2)])])
    );
}

#[test]
fn test_compound_then_two_bare_expressions() {
    assert!(matches!(
        parse_err("{ if true then { a } b c }"),
        ParseError::MissingSemicolon { found, .. } if found == "c"
    ));
}

#[test]
fn test_nested_blocks_and_shadowing_shape() {
    let parsed = parse_ok(indoc! {"
        {
            var x = 1;
            { var x = 2 };
            x
        }
    "});
    assert_eq!(
        parsed,
        block(vec![
            Expression::var("x", int(1), L),
            block(vec![Expression::var("x", int(2), L)]),
            ident("x"),
        ])
    );
}

#[test]
fn test_unclosed_block() {
    assert!(matches!(
        parse_err("{ a; b"),
        ParseError::Expected { found, .. } if found == "end of input"
    ));
    assert!(matches!(
        parse_err("{ a;"),
        ParseError::Expected { .. }
    ));
}

#[test]
fn test_unclosed_parenthesis() {
    assert_eq!(
        parse_err("(1 + 2"),
        ParseError::Expected {
            expected: "\")\"".to_string(),
            found: "end of input".to_string(),
            location: Location::new(1, 6),
        }
    );
}

#[test]
fn test_trailing_token() {
    assert_eq!(
        parse_err("a + b c"),
        ParseError::TrailingToken {
            found: "c".to_string(),
            location: Location::new(1, 7),
        }
    );
}

#[test]
fn test_missing_then() {
    assert!(matches!(
        parse_err("if a b"),
        ParseError::Expected { expected, .. } if expected == "\"then\""
    ));
}

#[test]
fn test_keywords_are_not_names() {
    assert!(matches!(
        parse_err("{ var if = 1 }"),
        ParseError::ReservedWord { word, .. } if word == "if"
    ));
    assert!(matches!(parse_err("then"), ParseError::ReservedWord { .. }));
}

#[test]
fn test_integer_out_of_range() {
    assert!(matches!(
        parse_err("9223372036854775808"),
        ParseError::IntegerOutOfRange { .. }
    ));
    assert_eq!(parse_ok("9223372036854775807"), int(i64::MAX));
}

#[test]
fn test_unexpected_operator_at_start() {
    let err = parse_err("* 2");
    assert_eq!(err.location(), Location::new(1, 1));
    assert!(err.to_string().starts_with("1:1: expected"));
}

#[test]
fn test_report_renders() {
    let source = "{ a b }";
    let err = parse_err(source);
    let rendered = diagnostics::render(&err.to_report("test", source), "test", source)
        .expect("report should render");
    assert!(rendered.contains("missing semicolon"));
}

#[test]
fn test_parse_tree_kinds() {
    let parsed = parse_ok("{ var x = 3; x = x * 2; print_int(x) }");
    let ExprKind::Block { statements } = parsed.kind else {
        panic!("expected a block");
    };
    assert!(matches!(statements[0].kind, ExprKind::VariableDeclaration { .. }));
    assert!(matches!(&statements[1].kind, ExprKind::BinaryOp { op, .. } if op == "="));
    assert!(matches!(statements[2].kind, ExprKind::FunctionCall { .. }));
}

#[test]
fn test_deep_nesting_is_an_error() {
    let depth = 100_000;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(
        parse_err(&source),
        ParseError::TooDeep {
            location: Location::new(1, MAX_DEPTH + 1),
        }
    );

    let source = format!("{}1", "- ".repeat(depth));
    assert!(matches!(parse_err(&source), ParseError::TooDeep { .. }));

    let source = format!("{}1", "x = ".repeat(depth));
    assert!(matches!(parse_err(&source), ParseError::TooDeep { .. }));
}

#[test]
fn test_moderate_nesting_parses() {
    let depth = MAX_DEPTH / 2;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(parse_ok(&source), int(1));

    let source = format!("{}{{ 1 }}{}", "{ ".repeat(depth / 2), " }".repeat(depth / 2));
    assert!(parse_str(&source).is_ok());
}
