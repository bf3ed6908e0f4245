//! Custom assertions for folded values

use constfold::{EvaluatorConfig, Value};
use pretty_assertions::assert_eq;

use super::harness::{eval_expr, eval_expr_with, eval_watch, eval_watch_with};

/// Assert that a single expression folds to `expected`
pub fn assert_folds(source: &str, expected: impl Into<Value>) {
    assert_eq!(eval_expr(source), Some(expected.into()), "folding `{}`", source);
}

/// Assert that a single expression folds to `expected` under `config`
pub fn assert_folds_with(source: &str, config: EvaluatorConfig, expected: impl Into<Value>) {
    assert_eq!(
        eval_expr_with(source, config),
        Some(expected.into()),
        "folding `{}` with {:?}",
        source,
        config
    );
}

/// Assert that a single expression is not a constant
pub fn assert_not_constant(source: &str) {
    let value = eval_expr(source);
    assert!(value.is_none(), "`{}` unexpectedly folded to {:?}", source, value);
}

/// Assert that the last watch in a snippet folds to `expected`
pub fn assert_watch(source: &str, expected: impl Into<Value>) {
    assert_eq!(eval_watch(source), Some(expected.into()));
}

/// Assert that the last watch in a snippet folds to `expected` under `config`
pub fn assert_watch_with(source: &str, config: EvaluatorConfig, expected: impl Into<Value>) {
    assert_eq!(eval_watch_with(source, config), Some(expected.into()));
}

/// Assert that the last watch in a snippet is not a constant
pub fn assert_watch_unknown(source: &str) {
    let value = eval_watch(source);
    assert!(value.is_none(), "watch unexpectedly folded to {:?}", value);
}

/// Assert that a value renders as `expected`
pub fn assert_renders(value: &Option<Value>, expected: &str) {
    match value {
        Some(value) => assert_eq!(value.to_string(), expected),
        None => panic!("expected a value rendering as {:?}, found none", expected),
    }
}
