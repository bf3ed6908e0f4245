//! constfold - constant folding for source-level expression trees
//!
//! This crate computes the statically known value of an expression node, for
//! use by static analysis checks. It folds literals and operators with the
//! numeric rules of the analyzed language, follows local variables backwards
//! to their last reliable assignment, reads constant fields, and builds
//! bounded array values. Anything it cannot prove is `None`.
//!
//! The evaluator works on any tree implementing [`SyntaxTree`] together with
//! a [`SymbolResolver`]. The [`syntax`] module provides a small reference
//! frontend implementing both.

pub mod config;
pub mod eval;
pub mod ops;
pub mod resolve;
pub mod syntax;
pub mod tree;
pub mod value;

// Re-export commonly used types
pub use config::{ConfigError, EvaluatorConfig};
pub use eval::{AssignmentSearchResult, ConstantEvaluator, evaluate, evaluate_string};
pub use resolve::{Declaration, SymbolId, SymbolResolver};
pub use syntax::{SourceError, SourceTree, parse_expression, parse_source};
pub use tree::{NodeKind, SyntaxTree};
pub use value::{ElementType, Value, array_size};
