//! Member and top-level parsing for the snippet parser

use crate::syntax::lexer::Token;
use crate::syntax::span::Span;
use crate::syntax::tree::{DeclInfo, DeclRole, Modifiers, Node, NodeId};

use super::Parser;
use super::error::{ParseError, ParseResult};

impl Parser {
    /// Parse a source file: members and statements, in any order
    pub(super) fn parse_unit(&mut self) -> ParseResult<NodeId> {
        let start = self.current_span();
        let mut items = Vec::new();
        while !self.at_end() {
            let item = if self.looks_like_member() {
                self.parse_member()?
            } else {
                self.parse_statement()?
            };
            items.push(item);
        }
        let span = self.span_from(start);
        Ok(self.push(Node::Unit(items), span))
    }

    fn looks_like_member(&self) -> bool {
        match self.peek() {
            Some(
                Token::Class
                | Token::Object
                | Token::Static
                | Token::Final
                | Token::Const
                | Token::Public
                | Token::Private
                | Token::Protected
                | Token::Val
                | Token::Var
                | Token::Fun
                | Token::Void,
            ) => true,
            Some(Token::Ident(name)) if name == "companion" => {
                matches!(self.peek_ahead(1), Some(Token::Object))
            }
            _ => self.looks_like_declaration(),
        }
    }

    /// Parse a class member
    fn parse_member(&mut self) -> ParseResult<NodeId> {
        let start = self.current_span();
        if matches!(self.peek(), Some(Token::Ident(name)) if name == "companion") {
            self.advance();
        }
        let modifiers = self.parse_modifiers();

        match self.peek() {
            Some(Token::Class) | Some(Token::Object) => self.parse_class(start),
            Some(Token::Fun) => self.parse_function(start),
            Some(Token::Val) | Some(Token::Var) => {
                self.parse_property(DeclRole::Field, modifiers, start)
            }
            Some(Token::LBrace) => self.parse_block(),
            Some(Token::Void) => {
                self.advance();
                let name = self.expect_ident()?;
                self.parse_method_rest(name, start)
            }
            // Constructor
            Some(Token::Ident(_)) if matches!(self.peek_ahead(1), Some(Token::LParen)) => {
                let name = self.expect_ident()?;
                self.parse_method_rest(name, start)
            }
            _ => {
                let ty = self.parse_type()?;
                if matches!(self.peek(), Some(Token::Ident(_)))
                    && matches!(self.peek_ahead(1), Some(Token::LParen))
                {
                    let name = self.expect_ident()?;
                    return self.parse_method_rest(name, start);
                }
                self.parse_declarators(ty, DeclRole::Field, modifiers, start)
            }
        }
    }

    fn parse_modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::default();
        loop {
            match self.peek() {
                Some(Token::Static) => modifiers.is_static = true,
                Some(Token::Final) => modifiers.is_final = true,
                Some(Token::Const) => modifiers.is_const = true,
                Some(Token::Public | Token::Private | Token::Protected) => {}
                _ => return modifiers,
            }
            self.advance();
        }
    }

    /// `class Name ... { members }` and `object Name { members }`
    fn parse_class(&mut self, start: Span) -> ParseResult<NodeId> {
        self.advance();
        let name = match self.peek().cloned() {
            Some(Token::Ident(name)) => {
                self.advance();
                name
            }
            // companion object { ... }
            Some(Token::LBrace) => "Companion".to_string(),
            tok => return Err(ParseError::unexpected_token(self.current_span(), "class name", tok)),
        };

        // Supertypes and constructor parameters are not modelled
        while !self.at_end()
            && !self.check(&Token::LBrace)
            && !self.check(&Token::RBrace)
            && !self.check(&Token::Semi)
        {
            self.advance();
        }

        let mut members = Vec::new();
        if self.eat(&Token::LBrace) {
            while !self.check(&Token::RBrace) && !self.at_end() {
                if self.eat(&Token::Semi) {
                    continue;
                }
                members.push(self.parse_member()?);
            }
            self.expect(&Token::RBrace)?;
        } else {
            self.eat(&Token::Semi);
        }

        let span = self.span_from(start);
        Ok(self.push(Node::Class { name, members }, span))
    }

    /// `fun name(params) [: Type] { body }` or `fun name(params) = expr`
    pub(super) fn parse_function(&mut self, start: Span) -> ParseResult<NodeId> {
        self.expect(&Token::Fun)?;
        let name = self.expect_ident()?;
        let params = self.parse_params()?;
        if self.eat(&Token::Colon) {
            self.parse_type()?;
        }
        let body = if self.check(&Token::LBrace) {
            Some(self.parse_block()?)
        } else if self.eat(&Token::Eq) {
            let body = self.parse_expr()?;
            self.eat(&Token::Semi);
            Some(body)
        } else {
            self.eat(&Token::Semi);
            None
        };
        let span = self.span_from(start);
        Ok(self.push(Node::Function { name, params, body }, span))
    }

    /// Java method after its name: `(params) { body }` or `(params);`
    fn parse_method_rest(&mut self, name: String, start: Span) -> ParseResult<NodeId> {
        let params = self.parse_params()?;
        let body = if self.check(&Token::LBrace) {
            Some(self.parse_block()?)
        } else {
            self.expect(&Token::Semi)?;
            None
        };
        let span = self.span_from(start);
        Ok(self.push(Node::Function { name, params, body }, span))
    }

    /// `(Type a, final Type b)` or `(a: Type, b: Type)`
    fn parse_params(&mut self) -> ParseResult<Vec<NodeId>> {
        self.expect(&Token::LParen)?;
        let mut params = Vec::new();
        while !self.check(&Token::RParen) {
            let start = self.current_span();
            let modifiers = self.parse_modifiers();
            let (name, ty) = match (self.peek().cloned(), self.peek_ahead(1)) {
                (Some(Token::Ident(name)), Some(Token::Colon)) => {
                    self.advance();
                    self.advance();
                    (name, self.parse_type()?)
                }
                _ => {
                    let ty = self.parse_type()?;
                    (self.expect_ident()?, ty)
                }
            };
            let info = DeclInfo {
                role: DeclRole::Parameter,
                modifiers,
                ty: Some(ty),
                is_property: false,
            };
            let span = self.span_from(start);
            params.push(self.push(
                Node::Declaration {
                    name,
                    initializer: None,
                    info,
                },
                span,
            ));
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RParen)?;
        Ok(params)
    }
}
