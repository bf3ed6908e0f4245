use afl::fuzz;
use constfold::{ConstantEvaluator, EvaluatorConfig};

fn main() {
    let lenient = EvaluatorConfig {
        allow_unknown: true,
        allow_field_initializers: true,
    };
    fuzz!(|data: &[u8]| {
        if let Ok(input) = std::str::from_utf8(data) {
            // Parse the snippet, then fold every node of it
            if let Ok(tree) = constfold::parse_source(input) {
                let strict = ConstantEvaluator::new(&tree, &tree);
                let loose = ConstantEvaluator::with_config(&tree, &tree, lenient);
                for node in tree.node_ids() {
                    let _ = strict.evaluate(node);
                    let _ = loose.evaluate(node);
                    let _ = strict.is_array_literal(node);
                }
            }
        }
    });
}
