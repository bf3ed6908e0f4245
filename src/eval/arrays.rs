//! Array construction and array-literal detection

use rustc_hash::FxHashSet;

use crate::resolve::{Declaration, SymbolResolver};
use crate::tree::{NodeKind, SyntaxTree};
use crate::value::{ElementType, MAX_INITIALIZER_ELEMENTS, Value, fresh_array, reify_array};

use super::{ConstantEvaluator, EvalState, calls};

impl<'t, T, R> ConstantEvaluator<'t, T, R>
where
    T: SyntaxTree,
    R: SymbolResolver<T::Node>,
{
    /// `new int[n]`; only the outermost size matters
    pub(super) fn eval_new_array(
        &self,
        element: &ElementType,
        dimensions: u32,
        sizes: &[T::Node],
        state: &mut EvalState,
    ) -> Option<Value> {
        let size = self.eval_size(*sizes.first()?, state)?;
        Some(fresh_array(element.clone(), size, dimensions))
    }

    pub(super) fn eval_size(&self, node: T::Node, state: &mut EvalState) -> Option<usize> {
        let size = self.eval(node, state)?.as_integral()?;
        usize::try_from(size).ok()
    }

    /// Initializer lists: `{1, 2}`, `new int[]{1, 2}`, `intArrayOf(1, 2)`
    pub(super) fn eval_initializer(
        &self,
        element: Option<ElementType>,
        elements: &[T::Node],
        state: &mut EvalState,
    ) -> Option<Value> {
        if elements.len() > MAX_INITIALIZER_ELEMENTS {
            tracing::trace!(len = elements.len(), "initializer too long to evaluate");
            let element = element.unwrap_or(ElementType::Object);
            return Some(fresh_array(element, elements.len(), 1));
        }

        let mut values = Vec::with_capacity(elements.len());
        for &node in elements {
            match self.eval(node, state) {
                Some(value) => values.push(value),
                None if self.config.allow_unknown => values.push(Value::Unknown),
                None => return None,
            }
        }
        reify_array(element, values)
    }

    /// Returns true if `node` denotes an array construction, looking through
    /// parentheses, casts, and the values assigned to variables and fields
    pub fn is_array_literal(&self, node: T::Node) -> bool {
        let mut seen = FxHashSet::default();
        let mut current = node;
        loop {
            let next = match self.tree.kind(current) {
                NodeKind::NewArray { .. } | NodeKind::ArrayLiteral { .. } => return true,
                NodeKind::Call { name, .. } => {
                    return calls::call_rule(name).is_some_and(calls::CallRule::builds_array);
                }
                NodeKind::Parenthesized(inner) => Some(inner),
                NodeKind::Cast { operand, .. } => Some(operand),
                NodeKind::Reference { .. } => match self.resolver.resolve(current) {
                    Some(decl) if !seen.insert(decl.symbol()) => None,
                    Some(Declaration::Variable(var)) => self.last_assignment(&var, current),
                    Some(Declaration::Field(field)) => field.initializer,
                    _ => None,
                },
                _ => None,
            };
            match next {
                Some(next) => current = next,
                None => return false,
            }
        }
    }
}
