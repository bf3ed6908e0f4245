//! Expression tree abstraction
//!
//! The evaluator never owns or mutates the tree it folds. A frontend exposes
//! its nodes through [`SyntaxTree`], describing each node with a borrowed
//! [`NodeKind`] view. Statement-oriented trees (sibling statements) and
//! expression-oriented trees (branches as expressions) both map onto the
//! same view, so one leveled search serves both.

use std::fmt::Debug;
use std::hash::Hash;

use crate::ops::{BinaryOp, PostfixOp, PrefixOp};
use crate::value::{ElementType, Value};

/// How a conditional node appears in source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalForm {
    /// `if` statement; has no value of its own
    Statement,
    /// `if` used as an expression
    Expression,
    /// `c ? a : b`
    Ternary,
}

/// Structural role of a node in the leveled assignment search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Children may not execute, or may execute repeatedly
    Branch,
    /// Grouping only (blocks, parentheses, declaration groups)
    Transparent,
    /// Everything else
    Plain,
}

/// Borrowed view of a single node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind<'a, N> {
    /// A literal with a known value
    Literal(&'a Value),
    /// The `null` literal
    Null,
    /// String template; the parts are concatenated
    StringTemplate(&'a [N]),
    Prefix {
        op: PrefixOp,
        operand: N,
    },
    Postfix {
        op: PostfixOp,
        operand: N,
    },
    /// Binary expression, or a chain of the same operator: a + b + c
    Polyadic {
        op: BinaryOp,
        operands: &'a [N],
    },
    /// `target = value`, or `target op= value` when `op` is set
    Assignment {
        op: Option<BinaryOp>,
        target: N,
        value: N,
    },
    Conditional {
        condition: N,
        then_branch: Option<N>,
        else_branch: Option<N>,
        form: ConditionalForm,
    },
    /// Any looping construct; its parts are its children in execution order
    Loop(&'a [N]),
    Parenthesized(N),
    Cast {
        operand: N,
        target: &'a ElementType,
    },
    /// Simple or qualified name: `x`, `Config.MAX`, `values.length`
    Reference {
        name: &'a str,
        qualifier: Option<N>,
    },
    Index {
        receiver: N,
        indices: &'a [N],
    },
    /// Sized array allocation: `new int[n]`, `new int[n][]`
    NewArray {
        element: &'a ElementType,
        dimensions: u32,
        sizes: &'a [N],
    },
    /// Array initializer list: `new int[]{1, 2}`, `{1, 2}`
    ArrayLiteral {
        element: Option<&'a ElementType>,
        elements: &'a [N],
    },
    /// Function or method call; `element` is the static element type when
    /// the call is known to produce an array
    Call {
        receiver: Option<N>,
        name: &'a str,
        args: &'a [N],
        element: Option<&'a ElementType>,
    },
    /// Declaration of a single variable or field
    Declaration {
        name: &'a str,
        initializer: Option<N>,
    },
    /// Several declarations in one statement: `int a = 1, b = 2;`
    DeclarationGroup(&'a [N]),
    Block(&'a [N]),
    Return(Option<N>),
    /// Method, function, or lambda; parameters are declarations
    Function {
        name: &'a str,
        params: &'a [N],
        body: Option<N>,
    },
    /// Any other node; only its children matter
    Other(&'a [N]),
}

impl<N: Copy> NodeKind<'_, N> {
    /// Direct children in source order
    pub fn children(&self) -> Vec<N> {
        match *self {
            NodeKind::Literal(_) | NodeKind::Null => Vec::new(),
            NodeKind::StringTemplate(parts) => parts.to_vec(),
            NodeKind::Prefix { operand, .. } | NodeKind::Postfix { operand, .. } => vec![operand],
            NodeKind::Polyadic { operands, .. } => operands.to_vec(),
            NodeKind::Assignment { target, value, .. } => vec![target, value],
            NodeKind::Conditional {
                condition,
                then_branch,
                else_branch,
                ..
            } => std::iter::once(condition)
                .chain(then_branch)
                .chain(else_branch)
                .collect(),
            NodeKind::Loop(parts) => parts.to_vec(),
            NodeKind::Parenthesized(inner) => vec![inner],
            NodeKind::Cast { operand, .. } => vec![operand],
            NodeKind::Reference { qualifier, .. } => qualifier.into_iter().collect(),
            NodeKind::Index { receiver, indices } => {
                std::iter::once(receiver).chain(indices.iter().copied()).collect()
            }
            NodeKind::NewArray { sizes, .. } => sizes.to_vec(),
            NodeKind::ArrayLiteral { elements, .. } => elements.to_vec(),
            NodeKind::Call { receiver, args, .. } => {
                receiver.into_iter().chain(args.iter().copied()).collect()
            }
            NodeKind::Declaration { initializer, .. } => initializer.into_iter().collect(),
            NodeKind::DeclarationGroup(items) | NodeKind::Block(items) | NodeKind::Other(items) => {
                items.to_vec()
            }
            NodeKind::Return(value) => value.into_iter().collect(),
            NodeKind::Function { params, body, .. } => {
                params.iter().copied().chain(body).collect()
            }
        }
    }

    /// Role of the node in the leveled search.
    ///
    /// Conditionals, loops, functions and the right-hand operands of `&&`
    /// and `||` may not run (or may run repeatedly), so they open a level.
    pub fn shape(&self) -> Shape {
        match self {
            NodeKind::Conditional { .. } | NodeKind::Loop(_) | NodeKind::Function { .. } => {
                Shape::Branch
            }
            NodeKind::Polyadic { op, .. } if op.is_logical() => Shape::Branch,
            NodeKind::Block(_) | NodeKind::DeclarationGroup(_) | NodeKind::Parenthesized(_) => {
                Shape::Transparent
            }
            _ => Shape::Plain,
        }
    }
}

/// A read-only tree of expression and statement nodes
pub trait SyntaxTree {
    /// Cheap handle to a node
    type Node: Copy + Eq + Hash + Debug;

    /// Describes a node
    fn kind(&self, node: Self::Node) -> NodeKind<'_, Self::Node>;

    /// Enclosing node, if any
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Direct children in source order
    fn children(&self, node: Self::Node) -> Vec<Self::Node> {
        self.kind(node).children()
    }

    /// Role of the node in the leveled search
    fn shape(&self, node: Self::Node) -> Shape {
        self.kind(node).shape()
    }

    /// Returns true if `node` is `ancestor` or lies beneath it
    fn is_within(&self, node: Self::Node, ancestor: Self::Node) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }
}
