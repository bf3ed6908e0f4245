//! Guard-check suppression
//!
//! `if (x > MAX) { ... x ... }` suggests the value of `x` is validated or
//! clamped at runtime, so a constant found for `x` is not reported inside
//! such a branch. The condition itself is still folded.

use crate::resolve::{SymbolId, SymbolResolver};
use crate::tree::{NodeKind, SyntaxTree};

use super::ConstantEvaluator;

impl<'t, T, R> ConstantEvaluator<'t, T, R>
where
    T: SyntaxTree,
    R: SymbolResolver<T::Node>,
{
    /// Returns true if a conditional enclosing `usage` tests `symbol` in a
    /// condition that does not itself contain `usage`
    pub(super) fn surrounded_by_check(&self, usage: T::Node, symbol: SymbolId) -> bool {
        let mut current = self.tree.parent(usage);
        while let Some(node) = current {
            if let NodeKind::Conditional { condition, .. } = self.tree.kind(node)
                && !self.tree.is_within(usage, condition)
                && self.references(condition, symbol)
            {
                tracing::debug!(?symbol, "constant suppressed by surrounding check");
                return true;
            }
            current = self.tree.parent(node);
        }
        false
    }

    /// Returns true if any reference under `root` resolves to `symbol`
    fn references(&self, root: T::Node, symbol: SymbolId) -> bool {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if let NodeKind::Reference { .. } = self.tree.kind(node)
                && self
                    .resolver
                    .resolve(node)
                    .is_some_and(|decl| decl.symbol() == symbol)
            {
                return true;
            }
            stack.extend(self.tree.children(node));
        }
        false
    }
}
