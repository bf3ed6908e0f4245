//! Guard check tests
//!
//! A value tested by an enclosing condition is not reported inside it

use crate::common::*;

#[test]
fn usage_inside_checked_branch_is_suppressed() {
    assert_watch_unknown(
        r#"
        fun test() {
            val x = 5
            if (x > 3) {
                watch(x)
            }
        }
        "#,
    );
}

#[test]
fn usage_in_else_branch_is_suppressed() {
    assert_watch_unknown(
        r#"
        void test() {
            int x = 5;
            if (x > 3) {
            } else {
                watch(x);
            }
        }
        "#,
    );
}

#[test]
fn usage_nested_below_the_check_is_suppressed() {
    assert_watch_unknown(
        r#"
        fun test(c: Boolean) {
            val x = 5
            if (x != 0) {
                while (c) {
                    watch(x)
                }
            }
        }
        "#,
    );
}

#[test]
fn usage_inside_ternary_is_suppressed() {
    assert_watch_unknown(
        r#"
        void test() {
            int x = 5;
            int y = x > 3 ? watch(x) : 0;
        }
        "#,
    );
}

#[test]
fn condition_itself_still_folds() {
    assert_watch(
        r#"
        fun test() {
            val x = 5
            if (watch(x) > 3) {
            }
        }
        "#,
        5,
    );
}

#[test]
fn unrelated_condition_does_not_suppress() {
    assert_watch(
        r#"
        fun test(c: Boolean) {
            val x = 5
            if (c) {
                watch(x)
            }
        }
        "#,
        5,
    );
}

#[test]
fn shadowing_name_in_condition_does_not_suppress() {
    assert_watch(
        r#"
        class Holder {
            int x = 0;
            void test() {
                int y = 5;
                if (this.x > 0) {
                    int x = 7;
                    watch(y + x);
                }
            }
        }
        "#,
        12,
    );
}

#[test]
fn derived_field_is_suppressed_under_check() {
    let source = r#"
        class Limits {
            static final int MAX = 10;
            static final int LIMIT = MAX * 2;
            void test(int v) {
                if (v > LIMIT) {
                    watch(LIMIT);
                }
                if (v > MAX) {
                    watch(MAX);
                }
                watch(LIMIT);
            }
        }
    "#;
    let values = eval_watches(source);
    assert_eq!(values[0], None);
    // Compile-time constants are reported as is
    assert_eq!(values[1], Some(constfold::Value::Int(10)));
    assert_eq!(values[2], Some(constfold::Value::Int(20)));
}
