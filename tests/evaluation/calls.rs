//! Recognized call tests
//!
//! Indentation trimming, length and formatting calls

use crate::common::*;
use constfold::eval::is_recognized_call;

// ============================================================================
// Indentation
// ============================================================================

#[test]
fn trim_indent_removes_common_indent() {
    assert_watch(
        r#"
        fun test() {
            watch("""
                first
                  second
                """.trimIndent())
        }
        "#,
        "first\n  second",
    );
}

#[test]
fn trim_margin_with_default_prefix() {
    assert_watch(
        r#"
        fun test() {
            watch("""
                |one
                |two
                """.trimMargin())
        }
        "#,
        "one\ntwo",
    );
}

#[test]
fn trim_margin_with_custom_prefix() {
    assert_watch(
        r#"
        fun test() {
            watch("""
                >one
                  >two
                """.trimMargin(">"))
        }
        "#,
        "one\ntwo",
    );
}

#[test]
fn trim_of_unknown_receiver_is_not_constant() {
    assert_not_constant("text.trimIndent()");
}

// ============================================================================
// Length
// ============================================================================

#[test]
fn string_length() {
    assert_folds("\"abc\".length()", 3);
    assert_folds("\"abc\".length", 3);
    assert_folds("(\"ab\" + \"cd\").length()", 4);
    assert_folds("\"h\\u00e9llo\".length()", 5);
}

#[test]
fn length_of_unknown_is_not_constant() {
    assert_not_constant("text.length()");
}

// ============================================================================
// Formatting
// ============================================================================

#[test]
fn format_is_not_constant_by_default() {
    assert_not_constant("String.format(\"%d items\", n)");
    assert_not_constant("\"%s!\".format(x)");
}

#[test]
fn format_approximates_to_format_string() {
    assert_folds_with("String.format(\"%d items\", n)", lenient(), "%d items");
    assert_folds_with("String.format(locale, \"%d items\", n)", lenient(), "%d items");
    assert_folds_with("\"%s!\".format(x)", lenient(), "%s!");
}

// ============================================================================
// Unrecognized Calls
// ============================================================================

#[test]
fn unresolved_calls_are_not_constant() {
    assert_not_constant("compute()");
    assert_not_constant("Math.max(1, 2)");
}

#[test]
fn recognized_call_names() {
    let names = [
        "intArrayOf",
        "arrayOf",
        "IntArray",
        "trimIndent",
        "trimMargin",
        "format",
        "length",
    ];
    for name in names {
        assert!(is_recognized_call(name), "{name}");
    }
    assert!(!is_recognized_call("max"));
}
