//! Constant Evaluator
//!
//! Folds expression nodes into [`Value`]s. A single recursive dispatcher
//! covers every node kind; references go through the symbol resolver, the
//! leveled assignment search (see [`assignment`]) and the guard check (see
//! [`guard`]).
//!
//! "Not a constant" is always `None`. Nothing in here fails or panics on
//! unanalyzable input.

mod arrays;
mod assignment;
mod calls;
mod guard;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::EvaluatorConfig;
use crate::ops::{self, BinaryOp, PrefixOp};
use crate::resolve::{Declaration, FieldDecl, MethodDecl, SymbolId, SymbolResolver, VariableDecl};
use crate::tree::{ConditionalForm, NodeKind, SyntaxTree};
use crate::value::{Value, array_size};

pub use calls::is_recognized_call;

/// Outcome of the backward assignment search for a local variable
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentSearchResult {
    /// No assignment was observed; use the declaration's initializer
    NotFound,
    /// The last assignment that is guaranteed to run produced this value
    Known(Value),
    /// The variable was assigned, but not to a value that can be relied on
    AssignedButIndeterminate,
}

/// Per-call bookkeeping shared by one top-level evaluation
#[derive(Debug, Default)]
struct EvalState {
    /// Fields and methods whose values are being computed
    active: FxHashSet<SymbolId>,
    /// Values of locals fixed by an in-progress assignment search
    pinned: FxHashMap<SymbolId, Option<Value>>,
}

/// Evaluates expressions of one tree against one resolver
///
/// Configuration is fixed when the evaluator is built; afterwards every
/// method takes `&self` and the evaluator can be shared freely.
pub struct ConstantEvaluator<'t, T, R> {
    tree: &'t T,
    resolver: R,
    config: EvaluatorConfig,
}

impl<'t, T, R> ConstantEvaluator<'t, T, R>
where
    T: SyntaxTree,
    R: SymbolResolver<T::Node>,
{
    pub fn new(tree: &'t T, resolver: R) -> Self {
        Self::with_config(tree, resolver, EvaluatorConfig::default())
    }

    pub fn with_config(tree: &'t T, resolver: R, config: EvaluatorConfig) -> Self {
        Self {
            tree,
            resolver,
            config,
        }
    }

    /// Allows computing values where some terms are unknown.
    ///
    /// `"foo" + x + "bar"` is `None` without this and `"foobar"` with it.
    pub fn allow_unknowns(mut self) -> Self {
        self.config.allow_unknown = true;
        self
    }

    /// Trusts every field initializer, not only static final ones
    pub fn allow_field_initializers(mut self) -> Self {
        self.config.allow_field_initializers = true;
        self
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Returns the constant value `node` evaluates to, if any
    pub fn evaluate(&self, node: T::Node) -> Option<Value> {
        let mut state = EvalState::default();
        self.eval(node, &mut state)
    }

    /// Returns the constant string `node` evaluates to, if any
    pub fn evaluate_string(&self, node: T::Node) -> Option<String> {
        match self.evaluate(node)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Runs the leveled assignment search for `variable` up to `usage`
    pub fn find_last_value(
        &self,
        variable: &VariableDecl<T::Node>,
        usage: T::Node,
    ) -> AssignmentSearchResult {
        let mut state = EvalState::default();
        self.last_value(variable, usage, &mut state)
    }

    // === Dispatch ===

    fn eval(&self, node: T::Node, state: &mut EvalState) -> Option<Value> {
        let value = match self.tree.kind(node) {
            NodeKind::Literal(value) => Some(value.clone()),
            NodeKind::Null => None,
            NodeKind::StringTemplate(parts) => self.eval_template(parts, state),
            NodeKind::Prefix { op, operand } => self.eval_prefix(op, operand, state),
            NodeKind::Polyadic { op, operands } => self.eval_polyadic(op, operands, state),
            NodeKind::Conditional {
                condition,
                then_branch,
                else_branch,
                form,
            } => self.eval_conditional(condition, then_branch, else_branch, form, state),
            NodeKind::Parenthesized(inner) => self.eval(inner, state),
            NodeKind::Cast { operand, target } => {
                self.eval(operand, state).map(|value| ops::cast(value, target))
            }
            NodeKind::Reference { name, qualifier } => {
                self.eval_reference(node, name, qualifier, state)
            }
            NodeKind::Index { receiver, indices } => self.eval_index(receiver, indices, state),
            NodeKind::NewArray {
                element,
                dimensions,
                sizes,
            } => self.eval_new_array(element, dimensions, sizes, state),
            NodeKind::ArrayLiteral { element, elements } => {
                self.eval_initializer(element.cloned(), elements, state)
            }
            NodeKind::Call {
                receiver,
                name,
                args,
                element,
            } => self.eval_call(node, receiver, name, args, element, state),
            // Side effects, statements and declarations have no value
            NodeKind::Postfix { .. }
            | NodeKind::Assignment { .. }
            | NodeKind::Loop(_)
            | NodeKind::Declaration { .. }
            | NodeKind::DeclarationGroup(_)
            | NodeKind::Block(_)
            | NodeKind::Return(_)
            | NodeKind::Function { .. }
            | NodeKind::Other(_) => None,
        };
        // Unknown only survives as an array element
        value.filter(|v| !v.is_unknown())
    }

    fn eval_prefix(&self, op: PrefixOp, operand: T::Node, state: &mut EvalState) -> Option<Value> {
        if matches!(op, PrefixOp::Increment | PrefixOp::Decrement) {
            return None;
        }
        let value = self.eval(operand, state)?;
        ops::prefix(op, &value)
    }

    fn eval_polyadic(
        &self,
        op: BinaryOp,
        operands: &[T::Node],
        state: &mut EvalState,
    ) -> Option<Value> {
        let values: Vec<Option<Value>> = operands.iter().map(|&n| self.eval(n, state)).collect();
        if op.is_logical() {
            return logical(op, &values);
        }

        let mut values = values.into_iter();
        let mut acc = values.next()?;
        for value in values {
            acc = match (acc, value) {
                (Some(left), Some(right)) => Some(ops::binary(op, &left, &right)?),
                (Some(left), None) if self.substitutes(op, &left) => Some(left),
                (None, Some(right)) if self.substitutes(op, &right) => Some(right),
                (None, None) if self.config.allow_unknown => None,
                _ => return None,
            };
        }
        acc
    }

    /// Whether an unknown operand may be dropped in favour of `known`.
    ///
    /// Only string concatenation approximates this way.
    fn substitutes(&self, op: BinaryOp, known: &Value) -> bool {
        self.config.allow_unknown && op == BinaryOp::Add && matches!(known, Value::String(_))
    }

    fn eval_conditional(
        &self,
        condition: T::Node,
        then_branch: Option<T::Node>,
        else_branch: Option<T::Node>,
        form: ConditionalForm,
        state: &mut EvalState,
    ) -> Option<Value> {
        if form == ConditionalForm::Statement {
            return None;
        }
        let branch = match self.eval(condition, state)?.as_bool()? {
            true => then_branch?,
            false => else_branch?,
        };
        self.eval(self.branch_result(branch)?, state)
    }

    /// A braced branch yields its last expression: `if (c) { 1 } else { 2 }`
    fn branch_result(&self, mut branch: T::Node) -> Option<T::Node> {
        while let NodeKind::Block(items) = self.tree.kind(branch) {
            branch = *items.last()?;
        }
        Some(branch)
    }

    fn eval_template(&self, parts: &[T::Node], state: &mut EvalState) -> Option<Value> {
        let mut text = String::new();
        for &part in parts {
            match self.eval(part, state).and_then(|v| v.concat_text()) {
                Some(piece) => text.push_str(&piece),
                None if self.config.allow_unknown => {}
                None => return None,
            }
        }
        Some(Value::String(text))
    }

    fn eval_index(
        &self,
        receiver: T::Node,
        indices: &[T::Node],
        state: &mut EvalState,
    ) -> Option<Value> {
        let [index] = indices else {
            return None;
        };
        let index = self.eval(*index, state)?.as_integral()?;
        match self.eval(receiver, state)? {
            Value::Array(array) => array.get(index).cloned(),
            _ => None,
        }
    }

    // === References ===

    fn eval_reference(
        &self,
        node: T::Node,
        name: &str,
        qualifier: Option<T::Node>,
        state: &mut EvalState,
    ) -> Option<Value> {
        match self.resolver.resolve(node) {
            Some(Declaration::Variable(var)) => self.variable_value(node, &var, state),
            Some(Declaration::Field(field)) => self.field_value(node, &field, state),
            Some(Declaration::Method(method)) => self.method_value(&method, state),
            None => self.member_value(name, qualifier?, state),
        }
    }

    fn variable_value(
        &self,
        usage: T::Node,
        var: &VariableDecl<T::Node>,
        state: &mut EvalState,
    ) -> Option<Value> {
        let value = match state.pinned.get(&var.symbol) {
            Some(pinned) => pinned.clone(),
            None => match self.last_value(var, usage, state) {
                AssignmentSearchResult::AssignedButIndeterminate => return None,
                AssignmentSearchResult::Known(value) => Some(value),
                AssignmentSearchResult::NotFound => {
                    var.initializer.and_then(|init| self.eval(init, state))
                }
            },
        };
        if value.is_some() && self.surrounded_by_check(usage, var.symbol) {
            return None;
        }
        value
    }

    fn field_value(
        &self,
        usage: T::Node,
        field: &FieldDecl<T::Node>,
        state: &mut EvalState,
    ) -> Option<Value> {
        if let Some(constant) = &field.constant {
            return Some(constant.clone());
        }
        let trusted = field.is_static_final
            || field.is_read_only_property
            || self.config.allow_field_initializers;
        if !trusted {
            return None;
        }
        let value = self.eval_member(field.symbol, field.initializer?, state)?;
        if self.surrounded_by_check(usage, field.symbol) {
            return None;
        }
        Some(value)
    }

    fn method_value(&self, method: &MethodDecl<T::Node>, state: &mut EvalState) -> Option<Value> {
        self.eval_member(method.symbol, method.single_return?, state)
    }

    /// Evaluates a field initializer or method body, refusing to recurse
    /// into a member that is already being evaluated
    fn eval_member(&self, symbol: SymbolId, node: T::Node, state: &mut EvalState) -> Option<Value> {
        if !state.active.insert(symbol) {
            tracing::trace!(?symbol, "self-referential member");
            return None;
        }
        let value = self.eval(node, state);
        state.active.remove(&symbol);
        value
    }

    /// `values.length`, `values.size`, `text.length` on an unresolved member
    fn member_value(&self, name: &str, receiver: T::Node, state: &mut EvalState) -> Option<Value> {
        if name != "length" && name != "size" {
            return None;
        }
        let receiver = self.eval(receiver, state)?;
        if let Some(size) = array_size(&receiver) {
            return i32::try_from(size).ok().map(Value::Int);
        }
        match receiver {
            Value::String(s) if name == "length" => utf16_len(&s),
            _ => None,
        }
    }
}

/// `&&` is false once any operand is known false, `||` true once any is
/// known true; otherwise every operand must be a known boolean
fn logical(op: BinaryOp, values: &[Option<Value>]) -> Option<Value> {
    let short_circuit = op == BinaryOp::Or;
    let bools: Vec<Option<bool>> = values
        .iter()
        .map(|v| v.as_ref().and_then(Value::as_bool))
        .collect();
    if bools.contains(&Some(short_circuit)) {
        return Some(Value::Boolean(short_circuit));
    }
    if bools.iter().all(Option::is_some) && !bools.is_empty() {
        return Some(Value::Boolean(!short_circuit));
    }
    None
}

fn utf16_len(s: &str) -> Option<Value> {
    i32::try_from(s.encode_utf16().count()).ok().map(Value::Int)
}

/// Evaluates `node` with a default-configured evaluator
pub fn evaluate<T, R>(tree: &T, resolver: R, node: T::Node) -> Option<Value>
where
    T: SyntaxTree,
    R: SymbolResolver<T::Node>,
{
    ConstantEvaluator::new(tree, resolver).evaluate(node)
}

/// Evaluates `node` to a string, optionally tolerating unknown parts
pub fn evaluate_string<T, R>(
    tree: &T,
    resolver: R,
    node: T::Node,
    allow_unknown: bool,
) -> Option<String>
where
    T: SyntaxTree,
    R: SymbolResolver<T::Node>,
{
    let config = EvaluatorConfig {
        allow_unknown,
        ..EvaluatorConfig::default()
    };
    ConstantEvaluator::with_config(tree, resolver, config).evaluate_string(node)
}
