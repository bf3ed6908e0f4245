//! Name binding
//!
//! Binds every name and call of a [`SourceTree`] to the declaration it
//! denotes, and answers the evaluator's [`SymbolResolver`] queries from
//! those bindings. Members (fields and methods of a class, or of the file)
//! are visible before their declaration; locals only after it.

use rustc_hash::FxHashMap as HashMap;

use crate::ops;
use crate::value::Value;
use crate::resolve::{
    Declaration, FieldDecl, MethodDecl, SymbolId, SymbolResolver, VariableDecl,
};

use super::tree::{DeclInfo, Node, NodeId, SourceTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SymbolKind {
    Field,
    Variable,
    Method,
}

/// A declared symbol
#[derive(Debug, Clone)]
pub(crate) struct Symbol {
    pub name: String,
    pub declaration: NodeId,
    pub kind: SymbolKind,
}

/// Names visible in one scope; values and functions live apart
#[derive(Debug, Clone, Default)]
struct Scope {
    values: HashMap<String, SymbolId>,
    functions: HashMap<String, SymbolId>,
}

#[derive(Debug, Clone, Default)]
struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    fn enter_scope(&mut self, scope: Scope) {
        self.scopes.push(scope);
    }

    fn exit_scope(&mut self) {
        self.scopes.pop();
    }

    fn insert_value(&mut self, name: &str, symbol: SymbolId) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.values.insert(name.to_string(), symbol);
        }
    }

    fn insert_function(&mut self, name: &str, symbol: SymbolId) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.functions.insert(name.to_string(), symbol);
        }
    }

    fn lookup_value(&self, name: &str) -> Option<SymbolId> {
        self.scopes.iter().rev().find_map(|scope| scope.values.get(name).copied())
    }

    fn lookup_function(&self, name: &str) -> Option<SymbolId> {
        self.scopes.iter().rev().find_map(|scope| scope.functions.get(name).copied())
    }
}

struct Binder<'t> {
    tree: &'t SourceTree,
    table: SymbolTable,
    symbols: Vec<Symbol>,
    bindings: HashMap<NodeId, SymbolId>,
    /// Symbol of each declaration node
    declared: HashMap<NodeId, SymbolId>,
    /// Members of each class (and of the file), keyed by the owning node
    members: HashMap<NodeId, Scope>,
    /// Class node by name, for `Name.member`
    classes: HashMap<String, NodeId>,
    enclosing_classes: Vec<NodeId>,
}

/// Resolves every name in `tree` and stores the result in it
pub(crate) fn bind(mut tree: SourceTree) -> SourceTree {
    let (symbols, bindings) = {
        let mut binder = Binder::new(&tree);
        binder.collect_members();
        binder.walk(tree.root());
        (binder.symbols, binder.bindings)
    };
    tracing::trace!(symbols = symbols.len(), bindings = bindings.len(), "bound snippet");
    tree.symbols = symbols;
    tree.bindings = bindings;
    tree
}

impl<'t> Binder<'t> {
    fn new(tree: &'t SourceTree) -> Self {
        Self {
            tree,
            table: SymbolTable::default(),
            symbols: Vec::new(),
            bindings: HashMap::default(),
            declared: HashMap::default(),
            members: HashMap::default(),
            classes: HashMap::default(),
            enclosing_classes: Vec::new(),
        }
    }

    fn declare(&mut self, name: &str, declaration: NodeId, kind: SymbolKind) -> SymbolId {
        let symbol = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol {
            name: name.to_string(),
            declaration,
            kind,
        });
        self.declared.insert(declaration, symbol);
        symbol
    }

    // === Members ===

    /// Registers the members of the file and of every class up front
    fn collect_members(&mut self) {
        let tree = self.tree;
        for id in tree.preorder() {
            match tree.node(id) {
                Node::Unit(items) => {
                    let scope = self.member_scope(items);
                    self.members.insert(id, scope);
                }
                Node::Class { name, members } => {
                    let scope = self.member_scope(members);
                    self.classes.entry(name.clone()).or_insert(id);
                    self.members.insert(id, scope);
                }
                _ => {}
            }
        }
    }

    fn member_scope(&mut self, members: &[NodeId]) -> Scope {
        let tree = self.tree;
        let mut scope = Scope::default();
        for &member in members {
            match tree.node(member) {
                Node::Declaration { name, .. } => {
                    let symbol = self.field(name, member);
                    scope.values.insert(name.clone(), symbol);
                }
                Node::DeclarationGroup(fields) => {
                    for &field in fields {
                        if let Node::Declaration { name, .. } = tree.node(field) {
                            let symbol = self.field(name, field);
                            scope.values.insert(name.clone(), symbol);
                        }
                    }
                }
                Node::Function { name, .. } if !name.is_empty() => {
                    let symbol = self.method(name, member);
                    scope.functions.insert(name.clone(), symbol);
                }
                // Companion members are reachable through the outer class
                Node::Class { name, members } if name == "Companion" => {
                    let companion = self.member_scope(members);
                    scope.values.extend(companion.values);
                    scope.functions.extend(companion.functions);
                }
                _ => {}
            }
        }
        scope
    }

    fn field(&mut self, name: &str, node: NodeId) -> SymbolId {
        match self.declared.get(&node) {
            Some(&symbol) => symbol,
            None => self.declare(name, node, SymbolKind::Field),
        }
    }

    fn method(&mut self, name: &str, node: NodeId) -> SymbolId {
        match self.declared.get(&node) {
            Some(&symbol) => symbol,
            None => self.declare(name, node, SymbolKind::Method),
        }
    }

    // === Walk ===

    fn walk(&mut self, id: NodeId) {
        let tree = self.tree;
        match tree.node(id) {
            Node::Unit(items) => {
                let scope = self.members.get(&id).cloned().unwrap_or_default();
                self.table.enter_scope(scope);
                self.walk_all(items);
                self.table.exit_scope();
            }
            Node::Class { members, .. } => {
                let scope = self.members.get(&id).cloned().unwrap_or_default();
                self.table.enter_scope(scope);
                self.enclosing_classes.push(id);
                self.walk_all(members);
                self.enclosing_classes.pop();
                self.table.exit_scope();
            }
            Node::Function { name, params, body } => {
                if !name.is_empty() && !self.declared.contains_key(&id) {
                    let symbol = self.declare(name, id, SymbolKind::Method);
                    self.table.insert_function(name, symbol);
                }
                self.table.enter_scope(Scope::default());
                self.walk_all(params);
                if let Some(body) = body {
                    self.walk(*body);
                }
                self.table.exit_scope();
            }
            Node::Block(items) | Node::Loop(items) => {
                self.table.enter_scope(Scope::default());
                self.walk_all(items);
                self.table.exit_scope();
            }
            Node::Declaration {
                name, initializer, ..
            } => {
                if let Some(init) = initializer {
                    self.walk(*init);
                }
                if !self.declared.contains_key(&id) {
                    let symbol = self.declare(name, id, SymbolKind::Variable);
                    self.table.insert_value(name, symbol);
                }
            }
            Node::Name { name, qualifier } => {
                if let Some(qualifier) = qualifier {
                    self.walk(*qualifier);
                }
                let symbol = match qualifier {
                    None => self.table.lookup_value(name),
                    Some(q) => self.member_of(*q).and_then(|scope| scope.values.get(name).copied()),
                };
                if let Some(symbol) = symbol {
                    self.bindings.insert(id, symbol);
                }
            }
            Node::Call {
                receiver,
                name,
                args,
            } => {
                if let Some(receiver) = receiver {
                    self.walk(*receiver);
                }
                self.walk_all(args);
                let symbol = match receiver {
                    None => self.table.lookup_function(name),
                    Some(r) => self
                        .member_of(*r)
                        .and_then(|scope| scope.functions.get(name).copied()),
                };
                if let Some(symbol) = symbol {
                    self.bindings.insert(id, symbol);
                }
            }
            other => {
                for child in other.view().children() {
                    self.walk(child);
                }
            }
        }
    }

    fn walk_all(&mut self, ids: &[NodeId]) {
        for &id in ids {
            self.walk(id);
        }
    }

    /// Member scope a qualifier names: `this` or a class name
    fn member_of(&self, qualifier: NodeId) -> Option<&Scope> {
        let class = match self.tree.node(qualifier) {
            Node::Name {
                name,
                qualifier: None,
            } if name == "this" => *self.enclosing_classes.last()?,
            Node::Name {
                name,
                qualifier: None,
            } if !self.bindings.contains_key(&qualifier) => *self.classes.get(name)?,
            _ => return None,
        };
        self.members.get(&class)
    }
}

// === Resolution ===

impl SymbolResolver<NodeId> for SourceTree {
    fn resolve(&self, reference: NodeId) -> Option<Declaration<NodeId>> {
        let symbol = self.symbol_of(reference)?;
        let entry = self.symbols.get(symbol.0 as usize)?;
        match (entry.kind, self.node(entry.declaration)) {
            (SymbolKind::Field, Node::Declaration { initializer, info, .. }) => {
                Some(Declaration::Field(self.field_decl(symbol, *initializer, info)))
            }
            (SymbolKind::Variable, Node::Declaration { initializer, .. }) => {
                Some(Declaration::Variable(VariableDecl {
                    symbol,
                    declaration: entry.declaration,
                    initializer: *initializer,
                }))
            }
            (SymbolKind::Method, Node::Function { params, body, .. }) => {
                Some(Declaration::Method(MethodDecl {
                    symbol,
                    single_return: self.single_return(params, *body),
                }))
            }
            _ => None,
        }
    }
}

impl SourceTree {
    /// Declared name of a symbol
    pub fn symbol_name(&self, symbol: SymbolId) -> Option<&str> {
        self.symbols.get(symbol.0 as usize).map(|s| s.name.as_str())
    }

    fn field_decl(
        &self,
        symbol: SymbolId,
        initializer: Option<NodeId>,
        info: &DeclInfo,
    ) -> FieldDecl<NodeId> {
        let modifiers = info.modifiers;
        // `const val`, and final fields initialized with a literal
        let compile_time = modifiers.is_const || (modifiers.is_final && !info.is_property);
        let constant = initializer
            .filter(|_| compile_time)
            .and_then(|init| self.literal_value(init));

        FieldDecl {
            symbol,
            constant,
            initializer,
            is_static_final: modifiers.is_const || (modifiers.is_static && modifiers.is_final),
            is_read_only_property: info.is_property && modifiers.is_final,
        }
    }

    /// A literal, possibly under a cast
    fn literal_value(&self, node: NodeId) -> Option<Value> {
        match self.node(node) {
            Node::Literal(value) => Some(value.clone()),
            Node::Cast { operand, target } => match self.node(*operand) {
                Node::Literal(value) => Some(ops::cast(value.clone(), target)),
                _ => None,
            },
            _ => None,
        }
    }

    /// The returned expression of a parameterless method whose body is one
    /// `return`, or an expression body
    fn single_return(&self, params: &[NodeId], body: Option<NodeId>) -> Option<NodeId> {
        if !params.is_empty() {
            return None;
        }
        let body = body?;
        match self.node(body) {
            Node::Block(items) => match items.as_slice() {
                [only] => match self.node(*only) {
                    Node::Return(value) => *value,
                    _ => None,
                },
                _ => None,
            },
            _ => Some(body),
        }
    }
}
