//! Parser for the snippet language
//!
//! A recursive descent parser that builds an arena [`SourceTree`] from
//! tokens. Expressions use Pratt parsing; statements and members are plain
//! recursive descent.

mod error;
mod expr;
mod item;
mod stmt;

pub use error::{ParseError, ParseErrorKind, ParseResult};

use crate::syntax::lexer::{SpannedToken, Token};
use crate::syntax::span::Span;
use crate::syntax::tree::{Node, NodeId, SourceTree, TreeBuilder};

/// The snippet parser
pub struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    builder: TreeBuilder,
}

impl Parser {
    /// Create a new parser
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: TreeBuilder::default(),
        }
    }

    /// Parse a complete source file of members and statements
    pub fn parse(tokens: Vec<SpannedToken>) -> ParseResult<SourceTree> {
        let mut parser = Parser::new(tokens);
        let root = parser.parse_unit()?;
        Ok(parser.builder.finish(root))
    }

    /// Parse a single expression; the expression is the tree root
    pub fn parse_expression(tokens: Vec<SpannedToken>) -> ParseResult<SourceTree> {
        let mut parser = Parser::new(tokens);
        let root = parser.parse_expr()?;
        parser.eat(&Token::Semi);
        if let Some(tok) = parser.peek().cloned() {
            return Err(ParseError::unexpected_token(
                parser.current_span(),
                "end of expression",
                Some(tok),
            ));
        }
        Ok(parser.builder.finish(root))
    }

    // === Token navigation ===

    /// Peek at the current token
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Peek ahead at a future token (n=1 is next token, n=2 is token after that, etc.)
    fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|t| &t.token)
    }

    /// Advance to the next token
    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Check if the current token matches
    fn check(&self, expected: &Token) -> bool {
        self.peek() == Some(expected)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Consume the token if it matches
    fn eat(&mut self, expected: &Token) -> bool {
        let matched = self.check(expected);
        if matched {
            self.advance();
        }
        matched
    }

    /// Expect a specific token or return an error
    fn expect(&mut self, expected: &Token) -> ParseResult<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(ParseError::unexpected_token(
                self.current_span(),
                format!("{:?}", expected),
                self.peek().cloned(),
            ))
        }
    }

    /// Expect an identifier and return it
    fn expect_ident(&mut self) -> ParseResult<String> {
        let span = self.current_span();
        match self.peek().cloned() {
            Some(Token::Ident(name)) => {
                self.advance();
                Ok(name)
            }
            tok => Err(ParseError::unexpected_token(span, "identifier", tok)),
        }
    }

    /// Get the span of the current token
    fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|t| t.span)
            .unwrap_or_else(|| {
                // EOF span - use end of last token or 0
                self.tokens
                    .last()
                    .map(|t| Span::new(t.span.end, t.span.end))
                    .unwrap_or_default()
            })
    }

    /// Get the span of the previous token
    fn previous_span(&self) -> Span {
        match self.pos.checked_sub(1) {
            Some(prev) => self.tokens[prev].span,
            None => Span::default(),
        }
    }

    // === Tree building ===

    fn push(&mut self, node: Node, span: Span) -> NodeId {
        self.builder.push(node, span)
    }

    fn span_of(&self, id: NodeId) -> Span {
        self.builder.span(id)
    }

    /// Span from `start` to the end of the previous token
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.previous_span())
    }

    /// Parses `tokens` as an embedded expression with this parser's arena
    fn parse_embedded(&mut self, tokens: Vec<SpannedToken>) -> ParseResult<NodeId> {
        let outer_tokens = std::mem::replace(&mut self.tokens, tokens);
        let outer_pos = std::mem::replace(&mut self.pos, 0);
        let result = self.parse_expr().and_then(|expr| match self.peek().cloned() {
            None => Ok(expr),
            tok => Err(ParseError::unexpected_token(
                self.current_span(),
                "'}'",
                tok,
            )),
        });
        self.tokens = outer_tokens;
        self.pos = outer_pos;
        result
    }
}
