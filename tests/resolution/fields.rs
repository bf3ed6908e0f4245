//! Field, property and method resolution tests

use crate::common::fixtures::{CYCLIC_FIELDS, JAVA_LIMITS, KOTLIN_KEYS, watching};
use crate::common::*;
use constfold::Value;

// ============================================================================
// Java Fields
// ============================================================================

#[test]
fn static_final_constants() {
    assert_watch(&watching(JAVA_LIMITS, "Limits.MAX"), 10);
    assert_watch(&watching(JAVA_LIMITS, "Limits.PREFIX"), "limit-");
}

#[test]
fn static_final_fields_computed_from_initializers() {
    assert_watch(&watching(JAVA_LIMITS, "Limits.DOUBLE_MAX"), 20);
    assert_watch(&watching(JAVA_LIMITS, "Limits.LABEL"), "limit-10");
}

#[test]
fn field_initializer_converts_to_declared_type() {
    assert_watch(&watching(JAVA_LIMITS, "Limits.WIDE"), 10i64);
}

#[test]
fn final_instance_field_with_literal_is_constant() {
    assert_watch(
        r#"
        class Box {
            final int fixed = 4;
            void test() { watch(this.fixed + 1); }
        }
        "#,
        5,
    );
}

#[test]
fn mutable_field_is_not_trusted_by_default() {
    assert_watch_unknown(&watching(JAVA_LIMITS, "Limits.count"));
}

#[test]
fn mutable_field_is_trusted_when_configured() {
    assert_watch_with(&watching(JAVA_LIMITS, "Limits.count"), trusting_fields(), 3);
}

#[test]
fn unqualified_field_inside_its_class() {
    assert_watch(
        r#"
        class Sizes {
            static final int SMALL = 2;
            static final int LARGE = SMALL << 4;
            int pick() {
                watch(LARGE + SMALL);
                return 0;
            }
        }
        "#,
        34,
    );
}

#[test]
fn top_level_declarations_are_fields() {
    assert_watch("static final int X = 3;\nfun test() { watch(X * X) }", 9);
    assert_watch_unknown("int y = 3;\nfun test() { watch(y) }");
}

// ============================================================================
// Kotlin Properties
// ============================================================================

#[test]
fn const_val_is_constant() {
    assert_watch(&watching(KOTLIN_KEYS, "Keys.ID"), 7);
}

#[test]
fn read_only_property_initializer_is_trusted() {
    assert_watch(&watching(KOTLIN_KEYS, "Keys.NAME"), "key7");
}

#[test]
fn var_property_is_not_trusted() {
    assert_watch_unknown(&watching(KOTLIN_KEYS, "Keys.mutable"));
    assert_watch_with(&watching(KOTLIN_KEYS, "Keys.mutable"), trusting_fields(), 1);
}

#[test]
fn companion_object_constants() {
    assert_watch(
        r#"
        class Holder {
            companion object {
                const val ID = 41
            }
        }
        fun test() { watch(Holder.ID + 1) }
        "#,
        42,
    );
}

// ============================================================================
// Methods
// ============================================================================

#[test]
fn single_return_method() {
    assert_watch(&watching(JAVA_LIMITS, "Limits.name()"), "limits");
    assert_watch(&watching(KOTLIN_KEYS, "Keys.size()"), 3);
}

#[test]
fn single_return_method_composing_members() {
    assert_watch(&watching(KOTLIN_KEYS, "Keys.describe()"), "key7/3");
}

#[test]
fn method_with_parameters_is_not_evaluated() {
    assert_watch_unknown(&watching(JAVA_LIMITS, "Limits.twice(2)"));
}

#[test]
fn method_with_several_statements_is_not_evaluated() {
    assert_watch_unknown(
        r#"
        fun compute(): Int {
            val x = 1
            return x
        }
        fun test() { watch(compute()) }
        "#,
    );
}

// ============================================================================
// Recursion
// ============================================================================

#[test]
fn cyclic_field_initializers_are_not_constant() {
    assert_watch_unknown(&watching(CYCLIC_FIELDS, "Cycle.A"));
    assert_watch(&watching(CYCLIC_FIELDS, "Cycle.C"), 5);
}

#[test]
fn self_referential_field() {
    assert_watch_unknown(
        r#"
        class Loop {
            static final String S = S + "x";
        }
        fun test() { watch(Loop.S) }
        "#,
    );
}

#[test]
fn recursive_method_is_not_constant() {
    assert_watch_unknown(
        r#"
        fun again(): Int = again() + 1
        fun test() { watch(again()) }
        "#,
    );
}

#[test]
fn member_used_twice_in_one_expression() {
    assert_watch(&watching(JAVA_LIMITS, "Limits.DOUBLE_MAX + Limits.DOUBLE_MAX"), 40);
}

#[test]
fn values_are_stable_across_evaluations() {
    let source = watching(KOTLIN_KEYS, "Keys.describe()");
    let first = eval_watch(&source);
    assert_eq!(first, eval_watch(&source));
    assert_eq!(first, Some(Value::from("key7/3")));
}
