//! String folding tests
//!
//! Concatenation, templates and number rendering

use crate::common::*;
use constfold::{evaluate_string, parse_source};

// ============================================================================
// Concatenation
// ============================================================================

#[test]
fn concatenation_is_left_to_right() {
    assert_folds("\"a\" + 1 + 2", "a12");
    assert_folds("1 + 2 + \"a\"", "3a");
    assert_folds("\"a\" + (1 + 2)", "a3");
}

#[test]
fn concatenation_renders_scalars() {
    assert_folds("\"c\" + 'd'", "cd");
    assert_folds("\"b\" + true", "btrue");
    assert_folds("\"\" + 1L", "1");
    assert_folds("\"\" + -5", "-5");
}

#[test]
fn concatenation_renders_floating_point_like_the_host() {
    assert_folds("\"x\" + 1.0", "x1.0");
    assert_folds("\"x\" + 1.5f", "x1.5");
    assert_folds("\"\" + 0.1f", "0.1");
    assert_folds("\"\" + 1e10", "1.0E10");
    assert_folds("\"\" + 1.0E-5", "1.0E-5");
    assert_folds("\"\" + 100.0 / 3", "33.333333333333336");
    assert_folds("\"\" + 1.0 / 0", "Infinity");
}

#[test]
fn concatenation_with_arrays_is_not_constant() {
    assert_not_constant("\"a\" + new int[2]");
}

#[test]
fn other_operators_on_strings_are_not_constant() {
    assert_not_constant("\"a\" - 1");
    assert_not_constant("\"a\" * 2");
}

// ============================================================================
// Templates
// ============================================================================

#[test]
fn template_with_known_parts() {
    assert_watch(
        r#"
        fun test() {
            val name = "w"
            watch("hello ${name}!")
        }
        "#,
        "hello w!",
    );
}

#[test]
fn template_with_expression() {
    assert_folds("\"v${1 + 2}\"", "v3");
    assert_folds("\"${1.0}|${'c'}\"", "1.0|c");
}

#[test]
fn template_with_unknown_part() {
    assert_not_constant("\"a${x}b\"");
    assert_folds_with("\"a${x}b\"", lenient(), "ab");
}

#[test]
fn escaped_dollar_is_literal_text() {
    assert_folds(r#""cost: \$5""#, "cost: $5");
}

// ============================================================================
// String API
// ============================================================================

#[test]
fn evaluate_string_rejects_other_values() {
    let tree = parse_source("fun f() { watch(\"a\" + 1); watch(1 + 1) }").unwrap();
    let watches = watched(&tree);
    assert_eq!(evaluate_string(&tree, &tree, watches[0], false), Some("a1".to_string()));
    assert_eq!(evaluate_string(&tree, &tree, watches[1], false), None);
}

#[test]
fn evaluate_string_tolerates_unknowns_when_asked() {
    let tree = parse_source("fun f(x: String) { watch(\"<\" + x + \">\") }").unwrap();
    let node = watched(&tree)[0];
    assert_eq!(evaluate_string(&tree, &tree, node, false), None);
    assert_eq!(evaluate_string(&tree, &tree, node, true), Some("<>".to_string()));
}
