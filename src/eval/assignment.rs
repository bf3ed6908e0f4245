//! Leveled assignment search
//!
//! Walks forward from the start of the enclosing function to the usage,
//! counting how many branch constructs (conditionals, loops, lambdas, the
//! right side of `&&`/`||`) enclose the current node. An assignment at the
//! declaration's own level always runs before the usage and replaces the
//! candidate value; an assignment nested deeper may or may not run, which
//! makes the result indeterminate until the next same-level assignment.
//!
//! A usage inside a local function or lambda starts the walk from the
//! function that declares the variable; the nested function is one more
//! branch level, and any update the walk does not reach before the usage
//! leaves the captured value indeterminate.
//!
//! The same walk serves statement trees and expression trees because both
//! are seen through [`SyntaxTree::shape`].

use crate::ops::{self, BinaryOp, PostfixOp, PrefixOp};
use crate::resolve::{Declaration, SymbolResolver, VariableDecl};
use crate::tree::{NodeKind, Shape, SyntaxTree};
use crate::value::Value;

use super::{AssignmentSearchResult, ConstantEvaluator, EvalState};

/// What an observed assignment does to the variable
#[derive(Debug, Clone, Copy)]
enum Update<N> {
    /// `x = value`
    Set(N),
    /// `x op= value`
    Compound(BinaryOp, N),
    /// `x++`, `--x`, ...
    Step(BinaryOp),
}

struct LastAssignmentFinder<'v, N> {
    variable: &'v VariableDecl<N>,
    usage: N,
    /// Evaluate right-hand sides; off when only the assigned node matters
    track_values: bool,
    level: u32,
    variable_level: Option<u32>,
    done: bool,
    /// Updates seen at or below the declaration's level
    observed: usize,
    result: AssignmentSearchResult,
    /// Node holding the last assigned expression
    last_assignment: Option<N>,
}

impl<'v, N: Copy + Eq> LastAssignmentFinder<'v, N> {
    fn new(variable: &'v VariableDecl<N>, usage: N, track_values: bool) -> Self {
        Self {
            variable,
            usage,
            track_values,
            level: 0,
            variable_level: None,
            done: false,
            observed: 0,
            result: AssignmentSearchResult::NotFound,
            last_assignment: variable.initializer,
        }
    }
}

impl<'t, T, R> ConstantEvaluator<'t, T, R>
where
    T: SyntaxTree,
    R: SymbolResolver<T::Node>,
{
    pub(super) fn last_value(
        &self,
        variable: &VariableDecl<T::Node>,
        usage: T::Node,
        state: &mut EvalState,
    ) -> AssignmentSearchResult {
        let mut finder = LastAssignmentFinder::new(variable, usage, true);
        self.run_finder(&mut finder, state);
        finder.result
    }

    /// Node last assigned to `variable` before `usage`, or its initializer
    pub(super) fn last_assignment(
        &self,
        variable: &VariableDecl<T::Node>,
        usage: T::Node,
    ) -> Option<T::Node> {
        let mut finder = LastAssignmentFinder::new(variable, usage, false);
        self.run_finder(&mut finder, &mut EvalState::default());
        finder.last_assignment
    }

    fn run_finder(&self, finder: &mut LastAssignmentFinder<'_, T::Node>, state: &mut EvalState) {
        let (root, captured) = self.search_root(finder.usage, finder.variable.declaration);
        self.visit(root, finder, state);

        if finder.variable_level.is_none() {
            return;
        }
        if self.assigned_in_enclosing_loop(finder, root) {
            tracing::trace!(symbol = ?finder.variable.symbol, "loop-carried assignment");
            finder.result = AssignmentSearchResult::AssignedButIndeterminate;
        } else if captured && self.count_updates(root, finder.variable) > finder.observed {
            // A local function or lambda may run after any later update
            tracing::trace!(symbol = ?finder.variable.symbol, "captured variable updated later");
            finder.result = AssignmentSearchResult::AssignedButIndeterminate;
        }
    }

    /// The innermost function around `usage` that also contains the
    /// declaration, or the top of the tree. The flag is set when the usage
    /// sits in a nested function or lambda that captures the variable.
    fn search_root(&self, usage: T::Node, declaration: T::Node) -> (T::Node, bool) {
        let mut root = usage;
        let mut captured = false;
        while let Some(parent) = self.tree.parent(root) {
            root = parent;
            if matches!(self.tree.kind(root), NodeKind::Function { .. }) {
                if self.tree.is_within(declaration, root) {
                    break;
                }
                captured = true;
            }
        }
        (root, captured)
    }

    fn visit(
        &self,
        node: T::Node,
        finder: &mut LastAssignmentFinder<'_, T::Node>,
        state: &mut EvalState,
    ) {
        if node == finder.usage {
            finder.done = true;
            return;
        }

        let branch = self.tree.shape(node) == Shape::Branch;
        if branch {
            finder.level += 1;
        }
        if node == finder.variable.declaration && finder.variable_level.is_none() {
            finder.variable_level = Some(finder.level);
        }

        for child in self.tree.children(node) {
            self.visit(child, finder, state);
            if finder.done {
                break;
            }
        }

        // Assignments take effect after their operands
        if !finder.done
            && let Some(update) = self.update_of(node, finder.variable)
        {
            self.observe(node, update, finder, state);
        }

        if branch {
            finder.level -= 1;
        }
    }

    /// Recognizes `node` as an update of `variable`
    fn update_of(
        &self,
        node: T::Node,
        variable: &VariableDecl<T::Node>,
    ) -> Option<Update<T::Node>> {
        let (target, update) = match self.tree.kind(node) {
            NodeKind::Assignment {
                op: None,
                target,
                value,
            } => (target, Update::Set(value)),
            NodeKind::Assignment {
                op: Some(op),
                target,
                value,
            } => (target, Update::Compound(op, value)),
            NodeKind::Prefix {
                op: PrefixOp::Increment,
                operand,
            }
            | NodeKind::Postfix {
                op: PostfixOp::Increment,
                operand,
            } => (operand, Update::Step(BinaryOp::Add)),
            NodeKind::Prefix {
                op: PrefixOp::Decrement,
                operand,
            }
            | NodeKind::Postfix {
                op: PostfixOp::Decrement,
                operand,
            } => (operand, Update::Step(BinaryOp::Sub)),
            _ => return None,
        };
        self.is_variable(target, variable).then_some(update)
    }

    fn is_variable(&self, target: T::Node, variable: &VariableDecl<T::Node>) -> bool {
        let target = self.unparenthesize(target);
        if !matches!(
            self.tree.kind(target),
            NodeKind::Reference {
                qualifier: None,
                ..
            }
        ) {
            return false;
        }
        matches!(
            self.resolver.resolve(target),
            Some(Declaration::Variable(ref var)) if var.symbol == variable.symbol
        )
    }

    fn unparenthesize(&self, mut node: T::Node) -> T::Node {
        while let NodeKind::Parenthesized(inner) = self.tree.kind(node) {
            node = inner;
        }
        node
    }

    fn observe(
        &self,
        node: T::Node,
        update: Update<T::Node>,
        finder: &mut LastAssignmentFinder<'_, T::Node>,
        state: &mut EvalState,
    ) {
        let Some(variable_level) = finder.variable_level else {
            return;
        };
        finder.observed += 1;

        finder.last_assignment = Some(match update {
            Update::Set(value) => value,
            Update::Compound(..) | Update::Step(_) => node,
        });

        if finder.level > variable_level {
            // Not guaranteed to run
            tracing::trace!(
                symbol = ?finder.variable.symbol,
                level = finder.level,
                variable_level,
                "conditional assignment"
            );
            finder.result = AssignmentSearchResult::AssignedButIndeterminate;
            return;
        }
        if !finder.track_values {
            return;
        }

        let value = match update {
            Update::Set(value) => self.eval_pinned(finder, value, state),
            Update::Compound(op, value) => {
                let rhs = self.eval_pinned(finder, value, state);
                self.current_value(finder, state)
                    .zip(rhs)
                    .and_then(|(base, rhs)| apply_update(op, base, &rhs))
            }
            Update::Step(op) => self
                .current_value(finder, state)
                .and_then(|base| apply_update(op, base, &Value::Int(1))),
        };
        finder.result = match value {
            Some(value) => AssignmentSearchResult::Known(value),
            None => AssignmentSearchResult::AssignedButIndeterminate,
        };
    }

    /// Value of the variable at the current point of the walk
    fn current_value(
        &self,
        finder: &LastAssignmentFinder<'_, T::Node>,
        state: &mut EvalState,
    ) -> Option<Value> {
        match &finder.result {
            AssignmentSearchResult::Known(value) => Some(value.clone()),
            AssignmentSearchResult::AssignedButIndeterminate => None,
            AssignmentSearchResult::NotFound => finder
                .variable
                .initializer
                .and_then(|init| self.eval(init, state)),
        }
    }

    /// Evaluates a right-hand side with the variable fixed to its current
    /// value, so `x = x + 1` does not search again from the start
    fn eval_pinned(
        &self,
        finder: &LastAssignmentFinder<'_, T::Node>,
        node: T::Node,
        state: &mut EvalState,
    ) -> Option<Value> {
        let symbol = finder.variable.symbol;
        let current = self.current_value(finder, state);
        let previous = state.pinned.insert(symbol, current);
        let value = self.eval(node, state);
        match previous {
            Some(previous) => state.pinned.insert(symbol, previous),
            None => state.pinned.remove(&symbol),
        };
        value
    }

    /// A loop around the usage that assigns the variable may carry a value
    /// from a later iteration back to the usage
    fn assigned_in_enclosing_loop(
        &self,
        finder: &LastAssignmentFinder<'_, T::Node>,
        root: T::Node,
    ) -> bool {
        let mut current = self.tree.parent(finder.usage);
        while let Some(node) = current {
            if matches!(self.tree.kind(node), NodeKind::Loop(_))
                && !self.tree.is_within(finder.variable.declaration, node)
                && self.assigns_within(node, finder.variable)
            {
                return true;
            }
            if node == root {
                break;
            }
            current = self.tree.parent(node);
        }
        false
    }

    fn assigns_within(&self, root: T::Node, variable: &VariableDecl<T::Node>) -> bool {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if self.update_of(node, variable).is_some() {
                return true;
            }
            stack.extend(self.tree.children(node));
        }
        false
    }

    fn count_updates(&self, root: T::Node, variable: &VariableDecl<T::Node>) -> usize {
        let mut count = 0;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if self.update_of(node, variable).is_some() {
                count += 1;
            }
            stack.extend(self.tree.children(node));
        }
        count
    }
}

/// Applies a compound update, keeping the variable's declared width
fn apply_update(op: BinaryOp, base: Value, rhs: &Value) -> Option<Value> {
    let result = ops::binary(op, &base, rhs)?;
    Some(match base.element_type() {
        Some(ty) if ty.is_numeric() => ops::cast(result, &ty),
        _ => result,
    })
}
