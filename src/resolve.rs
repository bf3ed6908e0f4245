//! Symbol resolution contract
//!
//! The evaluator does not know how names bind. It asks a [`SymbolResolver`]
//! for the declaration a reference (or call) denotes and works only with the
//! facts collected here.

use crate::value::Value;

/// Identity of a declared symbol
///
/// Two references resolve to the same declaration exactly when their
/// symbols are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

/// A field, property, or other member-level variable
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl<N> {
    pub symbol: SymbolId,
    /// Compile-time constant value, when the declaration is one
    pub constant: Option<Value>,
    pub initializer: Option<N>,
    pub is_static_final: bool,
    /// A read-only property without custom accessors
    pub is_read_only_property: bool,
}

impl<N> FieldDecl<N> {
    pub fn has_initializer(&self) -> bool {
        self.initializer.is_some()
    }
}

/// A local variable or parameter
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl<N> {
    pub symbol: SymbolId,
    /// The declaring node; the assignment search starts here
    pub declaration: N,
    pub initializer: Option<N>,
}

/// A method or function
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl<N> {
    pub symbol: SymbolId,
    /// Returned expression, when the method takes no parameters and its
    /// body is a single `return` (or an expression body)
    pub single_return: Option<N>,
}

/// What a reference resolves to
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration<N> {
    Field(FieldDecl<N>),
    Variable(VariableDecl<N>),
    Method(MethodDecl<N>),
}

impl<N> Declaration<N> {
    pub fn symbol(&self) -> SymbolId {
        match self {
            Declaration::Field(field) => field.symbol,
            Declaration::Variable(var) => var.symbol,
            Declaration::Method(method) => method.symbol,
        }
    }
}

/// Maps reference and call nodes to their declarations
///
/// Implementations must be reentrant if one evaluator is shared across
/// threads; the evaluator adds no synchronization of its own.
pub trait SymbolResolver<N> {
    fn resolve(&self, reference: N) -> Option<Declaration<N>>;
}

impl<N, R: SymbolResolver<N> + ?Sized> SymbolResolver<N> for &R {
    fn resolve(&self, reference: N) -> Option<Declaration<N>> {
        (**self).resolve(reference)
    }
}

/// Resolver that binds nothing; every reference is unknown
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSymbols;

impl<N> SymbolResolver<N> for NoSymbols {
    fn resolve(&self, _reference: N) -> Option<Declaration<N>> {
        None
    }
}
