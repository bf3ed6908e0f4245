//! Arena-backed syntax tree
//!
//! Nodes are stored in one vector and addressed by [`NodeId`]. Each node
//! records its parent, so the evaluator can walk outward from a usage.

use rustc_hash::FxHashMap;

use crate::ops::{BinaryOp, PostfixOp, PrefixOp};
use crate::resolve::SymbolId;
use crate::tree::{ConditionalForm, NodeKind, SyntaxTree};
use crate::value::{ElementType, Value};

use super::binder::Symbol;
use super::span::Span;

/// Handle to a node of a [`SourceTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A declared type: element type plus array dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub element: ElementType,
    pub dimensions: u32,
}

impl TypeRef {
    pub fn scalar(element: ElementType) -> Self {
        Self {
            element,
            dimensions: 0,
        }
    }

    /// Element type of an initializer list for this array type
    pub fn initializer_element(&self) -> Option<ElementType> {
        match self.dimensions {
            0 => None,
            1 => Some(self.element.clone()),
            n => {
                let mut name = self.element.name().to_string();
                for _ in 1..n {
                    name.push_str("[]");
                }
                Some(ElementType::Class(name))
            }
        }
    }

    /// The type of one element of this array type
    pub fn component(&self) -> TypeRef {
        TypeRef {
            element: self.element.clone(),
            dimensions: self.dimensions.saturating_sub(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclRole {
    Field,
    Local,
    Parameter,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub is_static: bool,
    pub is_final: bool,
    pub is_const: bool,
}

/// Facts about a declaration the resolver needs
#[derive(Debug, Clone, PartialEq)]
pub struct DeclInfo {
    pub role: DeclRole,
    pub modifiers: Modifiers,
    pub ty: Option<TypeRef>,
    /// Declared with `val` or `var`
    pub is_property: bool,
}

/// Owned node data
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Literal(Value),
    Null,
    Template(Vec<NodeId>),
    Prefix {
        op: PrefixOp,
        operand: NodeId,
    },
    Postfix {
        op: PostfixOp,
        operand: NodeId,
    },
    Polyadic {
        op: BinaryOp,
        operands: Vec<NodeId>,
    },
    Assignment {
        op: Option<BinaryOp>,
        target: NodeId,
        value: NodeId,
    },
    Conditional {
        condition: NodeId,
        then_branch: Option<NodeId>,
        else_branch: Option<NodeId>,
        form: ConditionalForm,
    },
    Loop(Vec<NodeId>),
    Paren(NodeId),
    Cast {
        operand: NodeId,
        target: ElementType,
    },
    Name {
        name: String,
        qualifier: Option<NodeId>,
    },
    Index {
        receiver: NodeId,
        indices: Vec<NodeId>,
    },
    NewArray {
        element: ElementType,
        dimensions: u32,
        sizes: Vec<NodeId>,
    },
    ArrayInit {
        element: Option<ElementType>,
        elements: Vec<NodeId>,
    },
    Call {
        receiver: Option<NodeId>,
        name: String,
        args: Vec<NodeId>,
    },
    Declaration {
        name: String,
        initializer: Option<NodeId>,
        info: DeclInfo,
    },
    DeclarationGroup(Vec<NodeId>),
    Block(Vec<NodeId>),
    Return(Option<NodeId>),
    Function {
        name: String,
        params: Vec<NodeId>,
        body: Option<NodeId>,
    },
    Class {
        name: String,
        members: Vec<NodeId>,
    },
    /// `break` or `continue`
    Jump,
    /// A whole source file
    Unit(Vec<NodeId>),
}

impl Node {
    pub(crate) fn view(&self) -> NodeKind<'_, NodeId> {
        match self {
            Node::Literal(value) => NodeKind::Literal(value),
            Node::Null => NodeKind::Null,
            Node::Template(parts) => NodeKind::StringTemplate(parts),
            Node::Prefix { op, operand } => NodeKind::Prefix {
                op: *op,
                operand: *operand,
            },
            Node::Postfix { op, operand } => NodeKind::Postfix {
                op: *op,
                operand: *operand,
            },
            Node::Polyadic { op, operands } => NodeKind::Polyadic { op: *op, operands },
            Node::Assignment { op, target, value } => NodeKind::Assignment {
                op: *op,
                target: *target,
                value: *value,
            },
            Node::Conditional {
                condition,
                then_branch,
                else_branch,
                form,
            } => NodeKind::Conditional {
                condition: *condition,
                then_branch: *then_branch,
                else_branch: *else_branch,
                form: *form,
            },
            Node::Loop(parts) => NodeKind::Loop(parts),
            Node::Paren(inner) => NodeKind::Parenthesized(*inner),
            Node::Cast { operand, target } => NodeKind::Cast {
                operand: *operand,
                target,
            },
            Node::Name { name, qualifier } => NodeKind::Reference {
                name,
                qualifier: *qualifier,
            },
            Node::Index { receiver, indices } => NodeKind::Index {
                receiver: *receiver,
                indices,
            },
            Node::NewArray {
                element,
                dimensions,
                sizes,
            } => NodeKind::NewArray {
                element,
                dimensions: *dimensions,
                sizes,
            },
            Node::ArrayInit { element, elements } => NodeKind::ArrayLiteral {
                element: element.as_ref(),
                elements,
            },
            Node::Call {
                receiver,
                name,
                args,
            } => NodeKind::Call {
                receiver: *receiver,
                name,
                args,
                element: None,
            },
            Node::Declaration {
                name, initializer, ..
            } => NodeKind::Declaration {
                name,
                initializer: *initializer,
            },
            Node::DeclarationGroup(items) => NodeKind::DeclarationGroup(items),
            Node::Block(items) => NodeKind::Block(items),
            Node::Return(value) => NodeKind::Return(*value),
            Node::Function { name, params, body } => NodeKind::Function {
                name,
                params,
                body: *body,
            },
            Node::Class { members, .. } => NodeKind::Other(members),
            Node::Jump => NodeKind::Other(&[]),
            Node::Unit(items) => NodeKind::Other(items),
        }
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    node: Node,
    span: Span,
    parent: Option<NodeId>,
}

/// Appends nodes and links children to their parents
#[derive(Debug, Default)]
pub(crate) struct TreeBuilder {
    nodes: Vec<NodeData>,
}

impl TreeBuilder {
    pub(crate) fn push(&mut self, node: Node, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in node.view().children() {
            if let Some(data) = self.nodes.get_mut(child.index()) {
                data.parent = Some(id);
            }
        }
        self.nodes.push(NodeData {
            node,
            span,
            parent: None,
        });
        id
    }

    pub(crate) fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    pub(crate) fn finish(self, root: NodeId) -> SourceTree {
        SourceTree {
            nodes: self.nodes,
            root,
            bindings: FxHashMap::default(),
            symbols: Vec::new(),
        }
    }
}

/// A parsed and bound snippet
#[derive(Debug, Clone)]
pub struct SourceTree {
    nodes: Vec<NodeData>,
    root: NodeId,
    pub(super) bindings: FxHashMap<NodeId, SymbolId>,
    pub(super) symbols: Vec<Symbol>,
}

impl SourceTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()].node
    }

    /// Every node, in creation order (children before parents)
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Nodes in source order
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            let children = self.node(id).view().children();
            stack.extend(children.into_iter().rev());
        }
        order
    }

    /// First declaration named `name`, in source order
    pub fn declaration(&self, name: &str) -> Option<NodeId> {
        self.preorder().into_iter().find(
            |&id| matches!(self.node(id), Node::Declaration { name: n, .. } if n == name),
        )
    }

    /// Initializer of the first declaration named `name`
    pub fn initializer_of(&self, name: &str) -> Option<NodeId> {
        match self.node(self.declaration(name)?) {
            Node::Declaration { initializer, .. } => *initializer,
            _ => None,
        }
    }

    /// Calls named `name`, in source order
    pub fn calls_named(&self, name: &str) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|&id| matches!(self.node(id), Node::Call { name: n, .. } if n == name))
            .collect()
    }

    /// Arguments of a call node
    pub fn arguments(&self, call: NodeId) -> &[NodeId] {
        match self.node(call) {
            Node::Call { args, .. } => args,
            _ => &[],
        }
    }

    /// First argument of each call named `name`, in source order
    pub fn first_arguments(&self, name: &str) -> Vec<NodeId> {
        self.calls_named(name)
            .into_iter()
            .filter_map(|call| self.arguments(call).first().copied())
            .collect()
    }

    /// Name references spelled `name`, in source order
    pub fn references_named(&self, name: &str) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|&id| matches!(self.node(id), Node::Name { name: n, .. } if n == name))
            .collect()
    }

    /// Symbol a reference or call is bound to
    pub fn symbol_of(&self, id: NodeId) -> Option<SymbolId> {
        self.bindings.get(&id).copied()
    }
}

impl SyntaxTree for SourceTree {
    type Node = NodeId;

    fn kind(&self, node: NodeId) -> NodeKind<'_, NodeId> {
        self.node(node).view()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].parent
    }
}
