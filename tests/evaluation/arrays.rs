//! Array folding tests
//!
//! Allocation, initializers, descriptors, indexing and array-literal detection

use crate::common::*;
use constfold::{ConstantEvaluator, ElementType, Value, array_size};

fn elements(value: &Option<Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(array)) => array.elements().to_vec(),
        other => panic!("expected an array, found {:?}", other),
    }
}

fn element_type(value: &Option<Value>) -> ElementType {
    match value {
        Some(Value::Array(array)) => array.element_type().clone(),
        Some(Value::Descriptor(desc)) => desc.element_type().clone(),
        other => panic!("expected an array, found {:?}", other),
    }
}

// ============================================================================
// Allocation
// ============================================================================

#[test]
fn small_allocation_is_zero_filled() {
    let value = eval_expr("new int[3]");
    assert_eq!(elements(&value), vec![Value::Int(0); 3]);
    assert_renders(&value, "[0, 0, 0]");
}

#[test]
fn reference_elements_start_unknown() {
    assert_renders(&eval_expr("new String[2]"), "[null, null]");
    assert_renders(&eval_expr("new boolean[2]"), "[false, false]");
}

#[test]
fn large_allocation_is_a_descriptor() {
    let value = eval_expr("new int[100]");
    assert!(matches!(value, Some(Value::Descriptor(_))));
    assert_renders(&value, "int[100]");
    assert_eq!(value.as_ref().and_then(array_size), Some(100));
}

#[test]
fn largest_materialized_allocation() {
    assert!(matches!(eval_expr("new byte[12]"), Some(Value::Array(_))));
    assert!(matches!(eval_expr("new byte[13]"), Some(Value::Descriptor(_))));
}

#[test]
fn multi_dimensional_allocation_is_a_descriptor() {
    let value = eval_expr("new int[2][3]");
    assert_renders(&value, "int[2][]");
    assert_eq!(value.as_ref().and_then(array_size), Some(2));
}

#[test]
fn class_typed_allocation_is_a_descriptor() {
    let value = eval_expr("new java.util.Date[2]");
    assert!(matches!(value, Some(Value::Descriptor(_))));
    assert_eq!(value.as_ref().and_then(array_size), Some(2));
}

#[test]
fn allocation_with_unknown_or_negative_size() {
    assert_not_constant("new int[n]");
    assert_not_constant("new int[-1]");
}

#[test]
fn allocation_size_may_be_computed() {
    assert_eq!(eval_expr("new long[1 + 2]").as_ref().and_then(array_size), Some(3));
}

// ============================================================================
// Initializers
// ============================================================================

#[test]
fn java_initializer_takes_declared_type() {
    let value = eval_expr("new long[]{1, 2}");
    assert_eq!(elements(&value), vec![Value::Long(1), Value::Long(2)]);
    let value = eval_expr("new byte[]{1, 2}");
    assert_eq!(element_type(&value), ElementType::Byte);
}

#[test]
fn declaration_initializer_list() {
    let values = eval_watches(
        r#"
        void test() {
            int[] a = {1, 2, 3};
            watch(a);
            watch(a[1]);
            watch(a.length);
            watch(a[5]);
            watch(a[-1]);
        }
        "#,
    );
    assert_renders(&values[0], "[1, 2, 3]");
    assert_eq!(values[1], Some(Value::Int(2)));
    assert_eq!(values[2], Some(Value::Int(3)));
    assert_eq!(values[3], None);
    assert_eq!(values[4], None);
}

#[test]
fn nested_initializer_lists() {
    assert_watch(
        r#"
        void test() {
            int[][] grid = {{1, 2}, {3, 4}};
            watch(grid[1][0]);
        }
        "#,
        3,
    );
}

#[test]
fn typed_array_constructors() {
    let value = eval_expr("intArrayOf(1, 2, 3)");
    assert_eq!(elements(&value), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    let value = eval_expr("longArrayOf(1, 2)");
    assert_eq!(element_type(&value), ElementType::Long);
    let value = eval_expr("doubleArrayOf(1.5)");
    assert_eq!(elements(&value), vec![Value::Double(1.5)]);
}

#[test]
fn array_of_infers_element_type() {
    let value = eval_expr("arrayOf(\"a\", \"b\")");
    assert_eq!(element_type(&value), ElementType::String);
    assert_renders(&value, "[a, b]");
}

#[test]
fn array_of_mixed_types_is_not_constant() {
    assert_not_constant("arrayOf(1, \"a\")");
}

#[test]
fn sized_constructors() {
    assert_renders(&eval_expr("IntArray(3)"), "[0, 0, 0]");
    assert_renders(&eval_expr("arrayOfNulls(2)"), "[null, null]");
    assert!(matches!(eval_expr("IntArray(20)"), Some(Value::Descriptor(_))));
    assert_folds("Array(2) { \"x\" }.size", 2);
}

#[test]
fn kotlin_package_prefix_is_ignored() {
    assert_renders(&eval_expr("kotlin.IntArray(2)"), "[0, 0]");
    assert_not_constant("other.IntArray(2)");
}

#[test]
fn long_initializer_becomes_descriptor() {
    let items: Vec<String> = (0..41).map(|i| i.to_string()).collect();
    let value = eval_expr(&format!("intArrayOf({})", items.join(", ")));
    assert!(matches!(value, Some(Value::Descriptor(_))));
    assert_eq!(value.as_ref().and_then(array_size), Some(41));
    assert_eq!(element_type(&value), ElementType::Int);
}

#[test]
fn initializer_at_element_limit_is_materialized() {
    let items: Vec<String> = (0..40).map(|i| i.to_string()).collect();
    let value = eval_expr(&format!("intArrayOf({})", items.join(", ")));
    assert_eq!(elements(&value).len(), 40);
}

#[test]
fn unknown_elements() {
    assert_not_constant("intArrayOf(1, x)");
    assert_renders(&eval_expr_with("intArrayOf(1, x)", lenient()), "[1, 0]");
    assert_renders(&eval_expr_with("arrayOf(\"a\", x)", lenient()), "[a, null]");
}

// ============================================================================
// Array Literal Detection
// ============================================================================

#[test]
fn array_literal_detection() {
    let tree = parse(
        r#"
        fun test(p: IntArray) {
            val a = intArrayOf(1)
            val b = a
            val s = "x"
            var c = "y"
            c = IntArray(4)
            watch(a)
            watch(b)
            watch(s)
            watch(c)
            watch(p)
            watch((new int[3]))
        }
        "#,
    );
    let evaluator = ConstantEvaluator::new(&tree, &tree);
    let detected: Vec<bool> = watched(&tree)
        .into_iter()
        .map(|node| evaluator.is_array_literal(node))
        .collect();
    assert_eq!(detected, vec![true, true, false, true, false, true]);
}

#[test]
fn array_literal_detection_through_fields() {
    let tree = parse(
        r#"
        class Tables {
            static final int[] PRIMES = {2, 3, 5};
            static final String NAME = "t";
        }
        fun test() {
            watch(Tables.PRIMES)
            watch(Tables.NAME)
        }
        "#,
    );
    let evaluator = ConstantEvaluator::new(&tree, &tree);
    let watches = watched(&tree);
    assert!(evaluator.is_array_literal(watches[0]));
    assert!(!evaluator.is_array_literal(watches[1]));
}
