//! Statement parsing for the snippet parser

use crate::syntax::lexer::Token;
use crate::syntax::span::Span;
use crate::syntax::tree::{DeclInfo, DeclRole, Modifiers, Node, NodeId, TypeRef};
use crate::tree::ConditionalForm;

use super::Parser;
use super::error::ParseResult;
use super::expr::primitive_type;

impl Parser {
    /// Parse a block: { stmt* }
    pub(super) fn parse_block(&mut self) -> ParseResult<NodeId> {
        let start = self.current_span();
        self.expect(&Token::LBrace)?;
        let mut statements = Vec::new();
        while !self.check(&Token::RBrace) && !self.at_end() {
            statements.push(self.parse_statement()?);
        }
        self.expect(&Token::RBrace)?;
        let span = self.span_from(start);
        Ok(self.push(Node::Block(statements), span))
    }

    /// Parse a statement
    pub(super) fn parse_statement(&mut self) -> ParseResult<NodeId> {
        let start = self.current_span();
        match self.peek() {
            Some(Token::LBrace) => self.parse_block(),
            Some(Token::If) => self.parse_if(),
            Some(Token::While) => self.parse_while(),
            Some(Token::Do) => self.parse_do_while(),
            Some(Token::For) => self.parse_for(),
            Some(Token::Return) => self.parse_return(),
            Some(Token::Break) | Some(Token::Continue) => {
                self.advance();
                self.eat(&Token::Semi);
                Ok(self.push(Node::Jump, start))
            }
            Some(Token::Semi) => {
                self.advance();
                Ok(self.push(Node::Block(Vec::new()), start))
            }
            Some(Token::Val) | Some(Token::Var) => {
                let decl = self.parse_property(DeclRole::Local, Modifiers::default(), start)?;
                let span = self.span_of(decl);
                Ok(self.push(Node::DeclarationGroup(vec![decl]), span))
            }
            Some(Token::Final) => {
                self.advance();
                let modifiers = Modifiers {
                    is_final: true,
                    ..Modifiers::default()
                };
                let ty = self.parse_type()?;
                self.parse_declarators(ty, DeclRole::Local, modifiers, start)
            }
            Some(Token::Fun) => self.parse_function(start),
            _ if self.looks_like_declaration() => {
                let ty = self.parse_type()?;
                self.parse_declarators(ty, DeclRole::Local, Modifiers::default(), start)
            }
            _ => {
                let expr = self.parse_expr()?;
                self.eat(&Token::Semi);
                Ok(expr)
            }
        }
    }

    /// `if (c) stmt [else stmt]`
    fn parse_if(&mut self) -> ParseResult<NodeId> {
        let start = self.current_span();
        self.expect(&Token::If)?;
        self.expect(&Token::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(&Token::RParen)?;
        let then_branch = self.parse_statement()?;
        let else_branch = if self.eat(&Token::Else) {
            Some(self.parse_statement()?)
        } else {
            None
        };
        let span = self.span_from(start);
        Ok(self.push(
            Node::Conditional {
                condition,
                then_branch: Some(then_branch),
                else_branch,
                form: ConditionalForm::Statement,
            },
            span,
        ))
    }

    /// `while (c) body`
    fn parse_while(&mut self) -> ParseResult<NodeId> {
        let start = self.current_span();
        self.expect(&Token::While)?;
        self.expect(&Token::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(&Token::RParen)?;
        let body = self.parse_statement()?;
        let span = self.span_from(start);
        Ok(self.push(Node::Loop(vec![condition, body]), span))
    }

    /// `do body while (c);`
    fn parse_do_while(&mut self) -> ParseResult<NodeId> {
        let start = self.current_span();
        self.expect(&Token::Do)?;
        let body = self.parse_statement()?;
        self.expect(&Token::While)?;
        self.expect(&Token::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(&Token::RParen)?;
        self.eat(&Token::Semi);
        let span = self.span_from(start);
        Ok(self.push(Node::Loop(vec![body, condition]), span))
    }

    /// `for (init; cond; update) body`, `for (T x : xs) body` and
    /// `for (x in xs) body`.
    ///
    /// The classic form becomes a block holding the initializer and then
    /// the loop, so declarations in the initializer stay outside the loop.
    fn parse_for(&mut self) -> ParseResult<NodeId> {
        let start = self.current_span();
        self.expect(&Token::For)?;
        self.expect(&Token::LParen)?;

        if let Some(element) = self.parse_for_each_header()? {
            let iterable = self.parse_expr()?;
            self.expect(&Token::RParen)?;
            let body = self.parse_statement()?;
            let span = self.span_from(start);
            return Ok(self.push(Node::Loop(vec![iterable, element, body]), span));
        }

        let mut outer = Vec::new();
        if !self.check(&Token::Semi) {
            let init_start = self.current_span();
            if self.looks_like_declaration() || self.check(&Token::Final) {
                let mut modifiers = Modifiers::default();
                modifiers.is_final = self.eat(&Token::Final);
                let ty = self.parse_type()?;
                outer.push(self.parse_declarator_list(ty, DeclRole::Local, modifiers, init_start)?);
            } else {
                loop {
                    outer.push(self.parse_expr()?);
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
            }
        }
        self.expect(&Token::Semi)?;

        let mut parts = Vec::new();
        if !self.check(&Token::Semi) {
            parts.push(self.parse_expr()?);
        }
        self.expect(&Token::Semi)?;

        let mut updates = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                updates.push(self.parse_expr()?);
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(&Token::RParen)?;

        parts.push(self.parse_statement()?);
        parts.extend(updates);
        let span = self.span_from(start);
        let looped = self.push(Node::Loop(parts), span);
        outer.push(looped);
        Ok(self.push(Node::Block(outer), span))
    }

    /// Consumes `x in` or `T x :` and returns the loop variable, or leaves
    /// the position untouched for a classic `for`
    fn parse_for_each_header(&mut self) -> ParseResult<Option<NodeId>> {
        let start = self.current_span();
        let kotlin = match (self.peek(), self.peek_ahead(1)) {
            (Some(Token::Ident(_)), Some(Token::In)) => true,
            (Some(Token::Val | Token::Var), Some(Token::Ident(_))) => {
                matches!(self.peek_ahead(2), Some(Token::In))
            }
            _ => false,
        };
        if kotlin {
            self.eat(&Token::Val);
            self.eat(&Token::Var);
            let name = self.expect_ident()?;
            self.expect(&Token::In)?;
            let info = DeclInfo {
                role: DeclRole::Local,
                modifiers: Modifiers::default(),
                ty: None,
                is_property: false,
            };
            let element = self.push(
                Node::Declaration {
                    name,
                    initializer: None,
                    info,
                },
                start,
            );
            return Ok(Some(element));
        }

        if !(self.looks_like_declaration() || self.check(&Token::Final)) {
            return Ok(None);
        }
        let saved = self.pos;
        let is_final = self.eat(&Token::Final);
        let ty = self.parse_type()?;
        let name = match self.peek().cloned() {
            Some(Token::Ident(name)) if matches!(self.peek_ahead(1), Some(Token::Colon)) => name,
            _ => {
                self.pos = saved;
                return Ok(None);
            }
        };
        self.advance();
        self.advance();
        let info = DeclInfo {
            role: DeclRole::Local,
            modifiers: Modifiers {
                is_final,
                ..Modifiers::default()
            },
            ty: Some(ty),
            is_property: false,
        };
        let span = self.span_from(start);
        let element = self.push(
            Node::Declaration {
                name,
                initializer: None,
                info,
            },
            span,
        );
        Ok(Some(element))
    }

    /// `return [expr];`
    fn parse_return(&mut self) -> ParseResult<NodeId> {
        let start = self.current_span();
        self.expect(&Token::Return)?;
        let value = if self.check(&Token::Semi) || self.check(&Token::RBrace) || self.at_end() {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.eat(&Token::Semi);
        let span = self.span_from(start);
        Ok(self.push(Node::Return(value), span))
    }

    // === Declarations ===

    /// Returns true if the tokens ahead read as `Type name`
    pub(super) fn looks_like_declaration(&self) -> bool {
        let mut i = match self.peek() {
            Some(tok) if primitive_type(tok).is_some() => 1,
            Some(Token::Ident(_)) => {
                let mut i = 1;
                while matches!(self.peek_ahead(i), Some(Token::Dot))
                    && matches!(self.peek_ahead(i + 1), Some(Token::Ident(_)))
                {
                    i += 2;
                }
                if matches!(self.peek_ahead(i), Some(Token::Lt)) {
                    match self.skip_type_args(i) {
                        Some(end) => end,
                        None => return false,
                    }
                } else {
                    i
                }
            }
            _ => return false,
        };
        while matches!(self.peek_ahead(i), Some(Token::LBracket))
            && matches!(self.peek_ahead(i + 1), Some(Token::RBracket))
        {
            i += 2;
        }
        matches!(self.peek_ahead(i), Some(Token::Ident(_)))
    }

    /// Offset just past the generic arguments opening at `open`
    fn skip_type_args(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = open;
        loop {
            match self.peek_ahead(i)? {
                Token::Lt => depth += 1,
                Token::Gt => depth = depth.checked_sub(1)?,
                Token::Shr => depth = depth.checked_sub(2)?,
                Token::UShr => depth = depth.checked_sub(3)?,
                Token::Ident(_)
                | Token::Comma
                | Token::Dot
                | Token::Question
                | Token::LBracket
                | Token::RBracket => {}
                tok if primitive_type(tok).is_some() => {}
                _ => return None,
            }
            i += 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }

    /// `a = 1, b[] = {2}, c;` after the type, wrapped in a group
    pub(super) fn parse_declarators(
        &mut self,
        ty: TypeRef,
        role: DeclRole,
        modifiers: Modifiers,
        start: Span,
    ) -> ParseResult<NodeId> {
        let group = self.parse_declarator_list(ty, role, modifiers, start)?;
        self.eat(&Token::Semi);
        Ok(group)
    }

    fn parse_declarator_list(
        &mut self,
        ty: TypeRef,
        role: DeclRole,
        modifiers: Modifiers,
        start: Span,
    ) -> ParseResult<NodeId> {
        let mut declarations = Vec::new();
        loop {
            let decl_start = self.current_span();
            let name = self.expect_ident()?;
            let mut declared = ty.clone();
            while self.check(&Token::LBracket)
                && matches!(self.peek_ahead(1), Some(Token::RBracket))
            {
                self.advance();
                self.advance();
                declared.dimensions += 1;
            }
            let initializer = if self.eat(&Token::Eq) {
                Some(if self.check(&Token::LBrace) {
                    self.parse_initializer(Some(&declared))?
                } else {
                    let init = self.parse_expr()?;
                    self.convert_initializer(init, Some(&declared))
                })
            } else {
                None
            };
            let info = DeclInfo {
                role,
                modifiers,
                ty: Some(declared),
                is_property: false,
            };
            let span = self.span_from(decl_start);
            declarations.push(self.push(
                Node::Declaration {
                    name,
                    initializer,
                    info,
                },
                span,
            ));
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        let span = self.span_from(start);
        Ok(self.push(Node::DeclarationGroup(declarations), span))
    }

    /// Wraps the initializer of a numeric declaration in an implicit cast,
    /// so `byte b = 1` holds a byte
    fn convert_initializer(&mut self, init: NodeId, ty: Option<&TypeRef>) -> NodeId {
        match ty {
            Some(ty) if ty.dimensions == 0 && ty.element.is_numeric() => {
                let span = self.span_of(init);
                let target = ty.element.clone();
                self.push(Node::Cast { operand: init, target }, span)
            }
            _ => init,
        }
    }

    /// `val name [: Type] [= expr]` and `var ...`
    pub(super) fn parse_property(
        &mut self,
        role: DeclRole,
        mut modifiers: Modifiers,
        start: Span,
    ) -> ParseResult<NodeId> {
        if self.eat(&Token::Val) {
            modifiers.is_final = true;
        } else {
            self.expect(&Token::Var)?;
        }
        let name = self.expect_ident()?;
        let ty = if self.eat(&Token::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let initializer = if self.eat(&Token::Eq) {
            let init = self.parse_expr()?;
            Some(self.convert_initializer(init, ty.as_ref()))
        } else {
            None
        };
        self.eat(&Token::Semi);
        let info = DeclInfo {
            role,
            modifiers,
            ty,
            is_property: role == DeclRole::Field,
        };
        let span = self.span_from(start);
        Ok(self.push(
            Node::Declaration {
                name,
                initializer,
                info,
            },
            span,
        ))
    }
}
