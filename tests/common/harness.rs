//! Test harness for evaluating snippets
//!
//! Snippets mark the expressions under test with calls to `watch(...)`; the
//! helpers here parse a snippet and evaluate the first argument of those
//! calls.

use constfold::{
    ConstantEvaluator, EvaluatorConfig, SourceTree, Value, parse_expression, parse_source,
};
use constfold::syntax::NodeId;

/// Name of the marker call wrapping expressions under test
pub const WATCH: &str = "watch";

/// Parse a snippet, panicking with a positioned message on failure
pub fn parse(source: &str) -> SourceTree {
    init_tracing();
    match parse_source(source) {
        Ok(tree) => tree,
        Err(e) => panic!("failed to parse snippet: {}", e.format_with_source(source)),
    }
}

/// Parse a single expression
pub fn parse_expr(source: &str) -> SourceTree {
    init_tracing();
    match parse_expression(source) {
        Ok(tree) => tree,
        Err(e) => panic!("failed to parse expression: {}", e.format_with_source(source)),
    }
}

/// Evaluate a single expression with the default configuration
pub fn eval_expr(source: &str) -> Option<Value> {
    eval_expr_with(source, EvaluatorConfig::default())
}

/// Evaluate a single expression with `config`
pub fn eval_expr_with(source: &str, config: EvaluatorConfig) -> Option<Value> {
    let tree = parse_expr(source);
    ConstantEvaluator::with_config(&tree, &tree, config).evaluate(tree.root())
}

/// Evaluate the expression watched last in `source`
pub fn eval_watch(source: &str) -> Option<Value> {
    eval_watch_with(source, EvaluatorConfig::default())
}

/// Evaluate the expression watched last in `source` with `config`
pub fn eval_watch_with(source: &str, config: EvaluatorConfig) -> Option<Value> {
    eval_watches_with(source, config).pop().flatten()
}

/// Evaluate every watched expression, in source order
pub fn eval_watches(source: &str) -> Vec<Option<Value>> {
    eval_watches_with(source, EvaluatorConfig::default())
}

pub fn eval_watches_with(source: &str, config: EvaluatorConfig) -> Vec<Option<Value>> {
    let tree = parse(source);
    let watches = watched(&tree);
    assert!(!watches.is_empty(), "snippet has no {}(...) call", WATCH);
    let evaluator = ConstantEvaluator::with_config(&tree, &tree, config);
    watches.into_iter().map(|node| evaluator.evaluate(node)).collect()
}

/// First arguments of the watch calls in `tree`
pub fn watched(tree: &SourceTree) -> Vec<NodeId> {
    tree.first_arguments(WATCH)
}

/// Configuration tolerating unknown operands
pub fn lenient() -> EvaluatorConfig {
    EvaluatorConfig {
        allow_unknown: true,
        ..EvaluatorConfig::default()
    }
}

/// Configuration trusting every field initializer
pub fn trusting_fields() -> EvaluatorConfig {
    EvaluatorConfig {
        allow_field_initializers: true,
        ..EvaluatorConfig::default()
    }
}

/// Route evaluator traces to the test output; `RUST_LOG=constfold=trace`
/// shows the assignment search
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
