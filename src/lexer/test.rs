use super::*;
use pretty_assertions::assert_eq;

const L: Location = Location::synthetic();

fn tok(text: &str, kind: TokenKind) -> Token {
    Token::new(text, kind, L)
}

fn tokens(input: &str) -> Vec<Token> {
    tokenize(input).expect("input should tokenize")
}

#[test]
fn test_basic_tokens() {
    assert_eq!(
        tokens("if  3\nwhile"),
        vec![
            tok("if", TokenKind::Identifier),
            tok("3", TokenKind::IntLiteral),
            tok("while", TokenKind::Identifier),
        ]
    );
}

#[test]
fn test_locations() {
    let lexed = tokens("if  3\nwhile");
    let locations: Vec<_> = lexed.iter().map(|t| t.location).collect();
    assert_eq!(
        locations,
        vec![Location::new(1, 1), Location::new(1, 5), Location::new(2, 1)]
    );
    assert!(locations.iter().all(|l| !l.synthetic));
}

#[test]
fn test_operators() {
    let lexed = tokens("+-*/%= < >");
    let texts: Vec<_> = lexed.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["+", "-", "*", "/", "%", "=", "<", ">"]);
    assert!(lexed.iter().all(|t| t.kind == TokenKind::Operator));
}

#[test]
fn test_two_character_operators_win() {
    assert_eq!(
        tokens("==!=<=>= ="),
        vec![
            tok("==", TokenKind::Operator),
            tok("!=", TokenKind::Operator),
            tok("<=", TokenKind::Operator),
            tok(">=", TokenKind::Operator),
            tok("=", TokenKind::Operator),
        ]
    );
}

#[test]
fn test_punctuation() {
    let lexed = tokens("(){},;");
    let texts: Vec<_> = lexed.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["(", ")", "{", "}", ",", ";"]);
    assert!(lexed.iter().all(|t| t.kind == TokenKind::Punctuation));
}

#[test]
fn test_bool_literals_are_whole_words() {
    assert_eq!(
        tokens("True False Trueish true_ false"),
        vec![
            tok("True", TokenKind::BoolLiteral),
            tok("False", TokenKind::BoolLiteral),
            tok("Trueish", TokenKind::Identifier),
            tok("true_", TokenKind::Identifier),
            tok("false", TokenKind::BoolLiteral),
        ]
    );
}

#[test]
fn test_line_comments() {
    assert_eq!(
        tokens("x // this is a comment\ny # and this too\nz"),
        vec![
            tok("x", TokenKind::Identifier),
            tok("y", TokenKind::Identifier),
            tok("z", TokenKind::Identifier),
        ]
    );
}

#[test]
fn test_multiline_comment_tracks_rows() {
    let input = "/*\nMany lines\nof comment\ntext.\n*/\nprint_int(123)\n/* Another\ncomment. */";
    let lexed = tokens(input);
    assert_eq!(
        lexed,
        vec![
            Token::new("print_int", TokenKind::Identifier, Location::new(6, 1)),
            Token::new("(", TokenKind::Punctuation, Location::new(6, 10)),
            Token::new("123", TokenKind::IntLiteral, Location::new(6, 11)),
            Token::new(")", TokenKind::Punctuation, Location::new(6, 14)),
        ]
    );
}

#[test]
fn test_block_comment_is_not_greedy() {
    assert_eq!(
        tokens("a /* one */ b /* two */ c"),
        vec![
            tok("a", TokenKind::Identifier),
            tok("b", TokenKind::Identifier),
            tok("c", TokenKind::Identifier),
        ]
    );
}

#[test]
fn test_mixed_tokens() {
    assert_eq!(
        tokens("x = 5 + 3;"),
        vec![
            tok("x", TokenKind::Identifier),
            tok("=", TokenKind::Operator),
            tok("5", TokenKind::IntLiteral),
            tok("+", TokenKind::Operator),
            tok("3", TokenKind::IntLiteral),
            tok(";", TokenKind::Punctuation),
        ]
    );
}

#[test]
fn test_digits_then_letters_split() {
    assert_eq!(
        tokens("2a"),
        vec![
            tok("2", TokenKind::IntLiteral),
            tok("a", TokenKind::Identifier),
        ]
    );
}

#[test]
fn test_empty_and_blank_input() {
    assert!(tokens("").is_empty());
    assert!(tokens("  \n\t // nothing\n").is_empty());
}

#[test]
fn test_tokenizing_is_deterministic() {
    let input = "{ var x = 1; /* c */ if x < 2 then print_int(x) }";
    let first = tokens(input);
    let second = tokens(input);
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.text, b.text);
        assert_eq!(a.kind, b.kind);
        assert_eq!((a.location.row, a.location.column), (b.location.row, b.location.column));
    }
}

#[test]
fn test_unexpected_character_is_fatal() {
    let err = tokenize("let @ x = 5;").unwrap_err();
    assert_eq!(
        err,
        LexError::UnexpectedCharacter {
            character: '@',
            location: Location::new(1, 5),
        }
    );
    assert_eq!(err.to_string(), "1:5: unexpected character '@'");
}

#[test]
fn test_unterminated_block_comment() {
    let err = tokenize("1 +\n  /* never closed").unwrap_err();
    assert_eq!(
        err,
        LexError::UnterminatedComment {
            location: Location::new(2, 3),
        }
    );
}

#[test]
fn test_error_report_mentions_character() {
    let source = "1 $ 2";
    let err = tokenize(source).unwrap_err();
    let rendered = diagnostics::render(&err.to_report("test", source), "test", source)
        .expect("report should render");
    assert!(rendered.contains("Lexical Error"));
    assert!(rendered.contains("'$'"));
}
