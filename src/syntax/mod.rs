//! Reference frontend
//!
//! Lexes, parses and binds a small Java/Kotlin-flavoured snippet language
//! into a [`SourceTree`], which implements both [`SyntaxTree`] and
//! [`SymbolResolver`]. It exists to drive the evaluator end to end.
//!
//! [`SyntaxTree`]: crate::tree::SyntaxTree
//! [`SymbolResolver`]: crate::resolve::SymbolResolver

pub mod binder;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod tree;

use thiserror::Error;

pub use lexer::{LexError, SpannedToken, Token, lex};
pub use parser::{ParseError, ParseErrorKind, Parser};
pub use span::{LineCol, Span};
pub use tree::{DeclInfo, DeclRole, Modifiers, NodeId, SourceTree, TypeRef};

/// Failure to turn source text into a tree
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl SourceError {
    pub fn span(&self) -> Span {
        match self {
            SourceError::Lex(err) => err.span,
            SourceError::Parse(err) => err.span,
        }
    }

    /// Format error with source code context (line:col instead of byte offsets)
    pub fn format_with_source(&self, source: &str) -> String {
        match self {
            SourceError::Lex(err) => {
                format!("{} at {}", err.message, err.span.format_position(source))
            }
            SourceError::Parse(err) => err.format_with_source(source),
        }
    }
}

/// Parses and binds a snippet of members and statements
pub fn parse_source(source: &str) -> Result<SourceTree, SourceError> {
    let tokens = lex(source)?;
    let tree = binder::bind(Parser::parse(tokens)?);
    tracing::debug!(nodes = tree.len(), "parsed snippet");
    Ok(tree)
}

/// Parses and binds a single expression; it becomes the tree root
pub fn parse_expression(source: &str) -> Result<SourceTree, SourceError> {
    let tokens = lex(source)?;
    Ok(binder::bind(Parser::parse_expression(tokens)?))
}
