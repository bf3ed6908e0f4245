//! Operator folding tests
//!
//! Arithmetic, comparison, logical, bitwise and cast semantics

use crate::common::*;
use constfold::Value;

// ============================================================================
// Arithmetic and Promotion
// ============================================================================

#[test]
fn int_arithmetic_respects_precedence() {
    assert_folds("1 + 2 * 3", 7);
    assert_folds("(1 + 2) * 3", 9);
    assert_folds("10 - 4 - 3", 3);
    assert_folds("1 - (2 - 3)", 2);
}

#[test]
fn int_overflow_wraps() {
    assert_folds("2147483647 + 1", i32::MIN);
    assert_folds("-2147483648 - 1", i32::MAX);
    assert_folds("65536 * 65536", 0);
}

#[test]
fn integer_division_truncates_toward_zero() {
    assert_folds("7 / 2", 3);
    assert_folds("-7 / 2", -3);
    assert_folds("-7 % 2", -1);
    assert_folds("7 % -2", 1);
}

#[test]
fn integer_division_by_zero_is_not_constant() {
    assert_not_constant("1 / 0");
    assert_not_constant("1 % 0");
    assert_not_constant("5L / 0L");
}

#[test]
fn floating_division_by_zero_is_infinite() {
    assert_folds("1.0 / 0", f64::INFINITY);
    assert_folds("-1.0 / 0", f64::NEG_INFINITY);
}

#[test]
fn mixed_operands_promote() {
    assert_folds("1 + 2L", 3i64);
    assert_folds("1 / 2.0", 0.5);
    assert_folds("1.5f + 1", Value::Float(2.5));
    assert_folds("1.5f + 1.0", 2.5);
    assert_folds("'a' + 1", 98);
    assert_folds("(byte) 1 + (byte) 2", 3);
}

#[test]
fn long_literals_keep_width() {
    assert_folds("2147483648", 2147483648i64);
    assert_folds("4000000000L * 4", 16000000000i64);
}

#[test]
fn radix_literals_use_all_bits() {
    assert_folds("0xFF", 255);
    assert_folds("0xFFFFFFFF", -1);
    assert_folds("0b1010", 10);
    assert_folds("0x7FFFFFFFFFFFFFFFL", i64::MAX);
}

// ============================================================================
// Shifts and Bitwise Operators
// ============================================================================

#[test]
fn shift_distance_is_masked() {
    assert_folds("1 << 33", 2);
    assert_folds("1L << 33", 8589934592i64);
    assert_folds("-16 >> 2", -4);
    assert_folds("-1 >>> 28", 15);
    assert_folds("-1L >>> 60", 15i64);
}

#[test]
fn bitwise_operators() {
    assert_folds("12 & 10", 8);
    assert_folds("12 | 3", 15);
    assert_folds("12 ^ 10", 6);
    assert_folds("~0", -1);
    assert_folds("~0L", -1i64);
}

#[test]
fn boolean_bitwise_operators() {
    assert_folds("true & false", false);
    assert_folds("true | false", true);
    assert_folds("true ^ true", false);
}

#[test]
fn bitwise_on_floating_is_not_constant() {
    assert_not_constant("1.5 & 1");
    assert_not_constant("~1.5");
}

// ============================================================================
// Comparison and Logic
// ============================================================================

#[test]
fn comparisons_promote_operands() {
    assert_folds("3 > 2", true);
    assert_folds("3 <= 2", false);
    assert_folds("1 == 1.0", true);
    assert_folds("'a' == 97", true);
    assert_folds("2L != 2", false);
}

#[test]
fn logical_operators_short_circuit_over_unknowns() {
    assert_folds("unknown && false", false);
    assert_folds("unknown || true", true);
    assert_not_constant("unknown && true");
    assert_not_constant("unknown || false");
}

#[test]
fn logical_chain_of_constants() {
    assert_folds("true && true && false", false);
    assert_folds("false || false || true", true);
    assert_folds("1 < 2 && 2 < 3", true);
}

#[test]
fn boolean_equality() {
    assert_folds("true == false", false);
    assert_folds("true != false", true);
}

#[test]
fn string_equality_is_not_folded() {
    assert_not_constant("\"a\" == \"a\"");
    assert_not_constant("\"a\" != \"b\"");
}

// ============================================================================
// Prefix Operators
// ============================================================================

#[test]
fn prefix_operators() {
    assert_folds("-(5)", -5);
    assert_folds("-'a'", -97);
    assert_folds("!true", false);
    assert_folds("+3", 3);
    assert_folds("-2.5", -2.5);
}

#[test]
fn negating_min_int_wraps() {
    assert_folds("-(-2147483648)", i32::MIN);
}

#[test]
fn increment_is_never_folded() {
    assert_not_constant("++x");
    assert_not_constant("x++");
}

// ============================================================================
// Casts
// ============================================================================

#[test]
fn narrowing_casts_truncate() {
    assert_folds("(byte) 200", Value::Byte(-56));
    assert_folds("(short) 70000", Value::Short(4464));
    assert_folds("(char) 65", Value::Char(65));
    assert_folds("(int) 4294967297L", 1);
}

#[test]
fn floating_casts_saturate() {
    assert_folds("(int) 3.9", 3);
    assert_folds("(int) -3.9", -3);
    assert_folds("(int) 1e20", i32::MAX);
    assert_folds("(long) -2.5", -2i64);
    assert_folds("(int) (0.0 / 0)", 0);
}

#[test]
fn widening_casts() {
    assert_folds("(long) 7", 7i64);
    assert_folds("(double) 1", 1.0);
    assert_folds("(float) 1", Value::Float(1.0));
}

#[test]
fn string_cast_keeps_value() {
    assert_folds("(String) \"s\"", "s");
}

// ============================================================================
// Conditionals
// ============================================================================

#[test]
fn ternary_with_constant_condition() {
    assert_folds("true ? 1 : 2", 1);
    assert_folds("1 > 2 ? \"a\" : \"b\"", "b");
    assert_not_constant("flag ? 1 : 2");
}

#[test]
fn if_expression_with_constant_condition() {
    assert_folds("if (false) \"a\" else \"b\"", "b");
    assert_folds("if (2 > 1) 10 else 20", 10);
}

#[test]
fn if_expression_with_braced_branches() {
    assert_folds("if (true) { 1 } else { 2 }", 1);
    assert_folds("if (1 > 2) { 1 } else { \"small\" }", "small");
    assert_watch(
        r#"
        fun test() {
            val y = if (true) { 1 } else { 2 }
            watch(y)
        }
        "#,
        1,
    );
}

#[test]
fn braced_branch_ending_in_statement_is_not_constant() {
    assert_not_constant("if (true) { val t = 1 } else { 2 }");
    assert_not_constant("if (true) { } else { 2 }");
}

#[test]
fn null_is_not_constant() {
    assert_not_constant("null");
}

// ============================================================================
// Unknown Operands
// ============================================================================

#[test]
fn unknown_operand_fails_by_default() {
    assert_not_constant("1 + unknown");
    assert_not_constant("\"a\" + unknown + \"b\"");
}

#[test]
fn unknown_operand_is_dropped_from_concatenation() {
    assert_folds_with("\"a\" + unknown + \"b\"", lenient(), "ab");
    assert_folds_with("unknown + \"b\"", lenient(), "b");
}

#[test]
fn unknown_operand_is_kept_unknown_outside_concatenation() {
    assert!(eval_expr_with("1 + unknown", lenient()).is_none());
    assert!(eval_expr_with("2 * unknown * 3", lenient()).is_none());
}
