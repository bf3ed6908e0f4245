//! Frontend error tests

use constfold::syntax::ParseErrorKind;
use constfold::{SourceError, parse_expression, parse_source};

fn source_error(source: &str) -> SourceError {
    match parse_source(source) {
        Ok(_) => panic!("expected an error for {:?}", source),
        Err(e) => e,
    }
}

// ============================================================================
// Lexer Errors
// ============================================================================

#[test]
fn unexpected_character_is_positioned() {
    let source = "fun f() { val x = @ }";
    let err = source_error(source);
    assert!(matches!(err, SourceError::Lex(_)));
    assert_eq!(err.format_with_source(source), "unexpected character: \"@\" at 1:19");
    assert_eq!(err.span().start, 18);
}

#[test]
fn out_of_range_literal_is_a_lex_error() {
    let err = source_error("val big = 99999999999999999999");
    assert!(matches!(err, SourceError::Lex(_)));
}

// ============================================================================
// Parser Errors
// ============================================================================

#[test]
fn unexpected_token_names_what_was_found() {
    let source = "fun f() {\n    g(1 }";
    let err = source_error(source);
    let SourceError::Parse(parse) = &err else {
        panic!("expected a parse error, found {:?}", err);
    };
    assert!(matches!(parse.kind, ParseErrorKind::UnexpectedToken { .. }));
    let message = err.format_with_source(source);
    assert!(message.contains("found '}'"), "{message}");
    assert!(message.ends_with("at 2:9"), "{message}");
}

#[test]
fn end_of_input_has_no_position() {
    let source = "(1 + ";
    let err = parse_expression(source).unwrap_err();
    assert_eq!(
        err.format_with_source(source),
        "unexpected end of file, expected expression"
    );
}

#[test]
fn trailing_tokens_after_expression() {
    let err = parse_expression("1 + 2 3").unwrap_err();
    assert!(err.to_string().contains("end of expression"));
}

#[test]
fn array_creation_needs_size_or_initializer() {
    let err = source_error("void f() { int[] a = new int[]; }");
    assert!(err.to_string().contains("without a size"), "{err}");
}

#[test]
fn unterminated_template() {
    let err = source_error("val s = \"a${b\"");
    assert!(err.to_string().contains("unterminated template"), "{err}");
}

#[test]
fn errors_do_not_poison_later_parses() {
    assert!(parse_source("fun f( {").is_err());
    assert!(parse_source("fun f() {}").is_ok());
}
