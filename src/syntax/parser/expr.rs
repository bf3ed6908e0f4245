//! Expression parsing for the snippet parser

use crate::ops::{BinaryOp, PostfixOp, PrefixOp};
use crate::syntax::lexer::{SpannedToken, Token, lex};
use crate::syntax::span::Span;
use crate::syntax::tree::{Node, NodeId, TypeRef};
use crate::tree::ConditionalForm;
use crate::value::{ElementType, Value};

use super::Parser;
use super::error::{ParseError, ParseResult};

impl Parser {
    /// Parse an expression, including assignments
    pub(super) fn parse_expr(&mut self) -> ParseResult<NodeId> {
        let target = self.parse_ternary()?;

        let Some(op) = self.peek().and_then(assignment_op) else {
            return Ok(target);
        };
        self.advance();

        // Assignment is right-associative: a = b = c
        let value = self.parse_expr()?;
        let span = self.span_of(target).merge(self.span_of(value));
        Ok(self.push(Node::Assignment { op, target, value }, span))
    }

    /// `c ? a : b`
    fn parse_ternary(&mut self) -> ParseResult<NodeId> {
        let condition = self.parse_expr_bp(0)?;
        if !self.eat(&Token::Question) {
            return Ok(condition);
        }
        let then_branch = self.parse_expr()?;
        self.expect(&Token::Colon)?;
        let else_branch = self.parse_ternary()?;
        let span = self.span_of(condition).merge(self.span_of(else_branch));
        Ok(self.push(
            Node::Conditional {
                condition,
                then_branch: Some(then_branch),
                else_branch: Some(else_branch),
                form: ConditionalForm::Ternary,
            },
            span,
        ))
    }

    /// Parse expression with Pratt parsing (binding power).
    ///
    /// Consecutive uses of the same operator at one precedence level are
    /// collected into a single polyadic node.
    fn parse_expr_bp(&mut self, min_bp: u8) -> ParseResult<NodeId> {
        let lhs = self.parse_unary()?;
        let mut chain: Option<(BinaryOp, Vec<NodeId>)> = None;

        loop {
            let op = match self.peek() {
                Some(tok) => tok.clone(),
                None => break,
            };

            // Try to get infix operator binding power
            let (l_bp, r_bp) = match infix_binding_power(&op) {
                Some(bp) => bp,
                None => break,
            };

            if l_bp < min_bp {
                break;
            }

            // Consume the operator
            self.advance();
            let Some(bin_op) = token_to_binary_op(&op) else {
                break;
            };

            // Parse right-hand side
            let rhs = self.parse_expr_bp(r_bp)?;

            chain = match chain.take() {
                Some((prev, mut operands)) if prev == bin_op => {
                    operands.push(rhs);
                    Some((prev, operands))
                }
                Some((prev, operands)) => {
                    let left = self.polyadic(prev, operands);
                    Some((bin_op, vec![left, rhs]))
                }
                None => Some((bin_op, vec![lhs, rhs])),
            };
        }

        Ok(match chain {
            Some((op, operands)) => self.polyadic(op, operands),
            None => lhs,
        })
    }

    fn polyadic(&mut self, op: BinaryOp, operands: Vec<NodeId>) -> NodeId {
        let span = match (operands.first(), operands.last()) {
            (Some(&first), Some(&last)) => self.span_of(first).merge(self.span_of(last)),
            _ => self.previous_span(),
        };
        self.push(Node::Polyadic { op, operands }, span)
    }

    /// Parse prefix expressions (unary ops, casts) followed by postfix ones
    fn parse_unary(&mut self) -> ParseResult<NodeId> {
        let start = self.current_span();

        let op = match self.peek() {
            Some(Token::Minus) => PrefixOp::Minus,
            Some(Token::Plus) => PrefixOp::Plus,
            Some(Token::Bang) => PrefixOp::Not,
            Some(Token::Tilde) => PrefixOp::BitNot,
            Some(Token::PlusPlus) => PrefixOp::Increment,
            Some(Token::MinusMinus) => PrefixOp::Decrement,
            Some(Token::LParen) if self.at_cast() => return self.parse_cast(),
            _ => {
                let primary = self.parse_primary()?;
                return self.parse_postfix(primary);
            }
        };
        self.advance();

        // -2147483648 is the only place that int literal is legal
        let operand = match self.peek() {
            Some(&Token::Integer(n)) if op == PrefixOp::Minus && n == 1 << 31 => {
                let span = self.current_span();
                self.advance();
                let literal = self.push(Node::Literal(Value::Int(i32::MIN)), span);
                self.parse_postfix(literal)?
            }
            _ => self.parse_unary()?,
        };
        let span = start.merge(self.span_of(operand));
        Ok(self.push(Node::Prefix { op, operand }, span))
    }

    /// `(int) x`, `(String) x`
    fn at_cast(&self) -> bool {
        let closes = matches!(self.peek_ahead(2), Some(Token::RParen));
        let operand_follows = matches!(
            self.peek_ahead(3),
            Some(
                Token::Ident(_)
                    | Token::Integer(_)
                    | Token::RadixInteger(_)
                    | Token::LongInteger(_)
                    | Token::FloatLiteral(_)
                    | Token::DoubleLiteral(_)
                    | Token::CharLiteral(_)
                    | Token::String(_)
                    | Token::LParen
                    | Token::Minus
                    | Token::Plus
                    | Token::Tilde
                    | Token::Bang
                    | Token::This
                    | Token::New
            )
        );
        match self.peek_ahead(1) {
            Some(tok) if primitive_type(tok).is_some() => closes,
            Some(Token::Ident(name)) => name == "String" && closes && operand_follows,
            _ => false,
        }
    }

    fn parse_cast(&mut self) -> ParseResult<NodeId> {
        let start = self.current_span();
        self.expect(&Token::LParen)?;
        let target = self.parse_type()?;
        self.expect(&Token::RParen)?;
        let operand = self.parse_unary()?;
        let span = start.merge(self.span_of(operand));
        Ok(self.push(
            Node::Cast {
                operand,
                target: target.element,
            },
            span,
        ))
    }

    /// Parse postfix operations: member access, calls, indexing, ++ and --
    fn parse_postfix(&mut self, mut expr: NodeId) -> ParseResult<NodeId> {
        loop {
            let start = self.span_of(expr);
            if self.eat(&Token::Dot) {
                let name = self.expect_ident()?;
                expr = if self.check(&Token::LParen) {
                    let args = self.parse_args(&name)?;
                    let span = self.span_from(start);
                    self.push(
                        Node::Call {
                            receiver: Some(expr),
                            name,
                            args,
                        },
                        span,
                    )
                } else {
                    let span = self.span_from(start);
                    self.push(
                        Node::Name {
                            name,
                            qualifier: Some(expr),
                        },
                        span,
                    )
                };
            } else if self.eat(&Token::LBracket) {
                let index = self.parse_expr()?;
                self.expect(&Token::RBracket)?;
                let span = self.span_from(start);
                expr = self.push(
                    Node::Index {
                        receiver: expr,
                        indices: vec![index],
                    },
                    span,
                );
            } else if self.check(&Token::PlusPlus) || self.check(&Token::MinusMinus) {
                let op = if self.check(&Token::PlusPlus) {
                    PostfixOp::Increment
                } else {
                    PostfixOp::Decrement
                };
                self.advance();
                let span = self.span_from(start);
                expr = self.push(Node::Postfix { op, operand: expr }, span);
            } else {
                break;
            }
        }
        Ok(expr)
    }

    /// Parse literals, names, calls, parenthesized and `new` expressions
    fn parse_primary(&mut self) -> ParseResult<NodeId> {
        let start = self.current_span();

        let literal = match self.peek().cloned() {
            Some(Token::Integer(n)) => match i32::try_from(n) {
                Ok(n) => Value::Int(n),
                Err(_) => Value::Long(n),
            },
            // Hex and binary int literals may set the sign bit
            Some(Token::RadixInteger(n)) => match u32::try_from(n) {
                Ok(n) => Value::Int(n as i32),
                Err(_) => Value::Long(n as i64),
            },
            Some(Token::LongInteger(n)) => Value::Long(n),
            Some(Token::FloatLiteral(x)) => Value::Float(x),
            Some(Token::DoubleLiteral(x)) => Value::Double(x),
            Some(Token::CharLiteral(c)) => Value::Char(c),
            Some(Token::True) => Value::Boolean(true),
            Some(Token::False) => Value::Boolean(false),

            Some(Token::Null) => {
                self.advance();
                return Ok(self.push(Node::Null, start));
            }
            Some(Token::String(text)) | Some(Token::RawString(text)) => {
                self.advance();
                return self.parse_string(text, start);
            }

            // Parenthesized expression
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                let span = self.span_from(start);
                return Ok(self.push(Node::Paren(inner), span));
            }

            Some(Token::New) => return self.parse_new(),
            Some(Token::If) => return self.parse_if_expr(),

            // Bare initializer list
            Some(Token::LBrace) => return self.parse_initializer(None),

            Some(Token::This) => {
                self.advance();
                return Ok(self.push(
                    Node::Name {
                        name: "this".to_string(),
                        qualifier: None,
                    },
                    start,
                ));
            }
            Some(Token::Ident(name)) => {
                self.advance();
                return self.parse_ident_expr(name, start);
            }

            Some(tok) => return Err(ParseError::unexpected_token(start, "expression", Some(tok))),
            None => return Err(ParseError::unexpected_eof(start, "expression")),
        };

        self.advance();
        Ok(self.push(Node::Literal(literal), start))
    }

    /// A name or a call of a name
    fn parse_ident_expr(&mut self, name: String, start: Span) -> ParseResult<NodeId> {
        if !self.check(&Token::LParen) {
            return Ok(self.push(
                Node::Name {
                    name,
                    qualifier: None,
                },
                start,
            ));
        }
        let args = self.parse_args(&name)?;
        let span = self.span_from(start);
        Ok(self.push(
            Node::Call {
                receiver: None,
                name,
                args,
            },
            span,
        ))
    }

    /// Parse call arguments, plus a trailing initializer lambda for
    /// array constructors: `Array(3) { 0 }`
    fn parse_args(&mut self, callee: &str) -> ParseResult<Vec<NodeId>> {
        self.expect(&Token::LParen)?;
        let mut args = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(&Token::RParen)?;

        if callee.ends_with("Array") && self.check(&Token::LBrace) {
            let start = self.current_span();
            let body = self.parse_block()?;
            let span = self.span_from(start);
            args.push(self.push(
                Node::Function {
                    name: String::new(),
                    params: Vec::new(),
                    body: Some(body),
                },
                span,
            ));
        }
        Ok(args)
    }

    /// `if (c) a else b` in expression position
    fn parse_if_expr(&mut self) -> ParseResult<NodeId> {
        let start = self.current_span();
        self.expect(&Token::If)?;
        self.expect(&Token::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(&Token::RParen)?;
        let then_branch = self.parse_branch_expr()?;
        self.expect(&Token::Else)?;
        let else_branch = self.parse_branch_expr()?;
        let span = self.span_from(start);
        Ok(self.push(
            Node::Conditional {
                condition,
                then_branch: Some(then_branch),
                else_branch: Some(else_branch),
                form: ConditionalForm::Expression,
            },
            span,
        ))
    }

    /// A branch of an `if` expression; braces hold a block, not a list
    fn parse_branch_expr(&mut self) -> ParseResult<NodeId> {
        if self.check(&Token::LBrace) {
            self.parse_block()
        } else {
            self.parse_expr()
        }
    }

    /// `new int[n]`, `new int[n][]`, `new int[]{1, 2}`, `new Foo(args)`
    fn parse_new(&mut self) -> ParseResult<NodeId> {
        let start = self.current_span();
        self.expect(&Token::New)?;
        let ty = self.parse_type_name()?;

        if self.check(&Token::LParen) {
            let name = ty.element.name().to_string();
            let args = self.parse_args(&name)?;
            let span = self.span_from(start);
            return Ok(self.push(
                Node::Call {
                    receiver: None,
                    name,
                    args,
                },
                span,
            ));
        }

        // Dimensions with an initializer: new int[][]{...}
        if self.check(&Token::LBracket) && matches!(self.peek_ahead(1), Some(Token::RBracket)) {
            let mut dimensions = 0;
            while self.eat(&Token::LBracket) {
                self.expect(&Token::RBracket)?;
                dimensions += 1;
            }
            let array = TypeRef {
                element: ty.element,
                dimensions,
            };
            return self.parse_initializer(Some(&array));
        }

        let mut sizes = Vec::new();
        let mut dimensions = 0;
        while self.eat(&Token::LBracket) {
            if !self.check(&Token::RBracket) {
                sizes.push(self.parse_expr()?);
            }
            self.expect(&Token::RBracket)?;
            dimensions += 1;
        }
        if sizes.is_empty() {
            return Err(ParseError::custom(start, "array creation without a size"));
        }
        let span = self.span_from(start);
        Ok(self.push(
            Node::NewArray {
                element: ty.element,
                dimensions,
                sizes,
            },
            span,
        ))
    }

    /// `{a, b, c}`; nested lists take the component type
    pub(super) fn parse_initializer(&mut self, ty: Option<&TypeRef>) -> ParseResult<NodeId> {
        let start = self.current_span();
        self.expect(&Token::LBrace)?;
        let component = ty.map(TypeRef::component);
        let mut elements = Vec::new();
        while !self.check(&Token::RBrace) {
            let element = if self.check(&Token::LBrace) {
                self.parse_initializer(component.as_ref())?
            } else {
                self.parse_expr()?
            };
            elements.push(element);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RBrace)?;
        let span = self.span_from(start);
        Ok(self.push(
            Node::ArrayInit {
                element: ty.and_then(TypeRef::initializer_element),
                elements,
            },
            span,
        ))
    }

    /// Splits `"a ${b} c"` into a template; plain strings stay literals
    fn parse_string(&mut self, text: String, span: Span) -> ParseResult<NodeId> {
        if !text.contains("${") {
            return Ok(self.push(Node::Literal(Value::String(text)), span));
        }

        let mut parts = Vec::new();
        let mut rest = text.as_str();
        while let Some(open) = rest.find("${") {
            if open > 0 {
                parts.push(self.push(Node::Literal(Value::String(rest[..open].to_string())), span));
            }
            let body = &rest[open + 2..];
            let close = body
                .find('}')
                .ok_or_else(|| ParseError::custom(span, "unterminated template expression"))?;
            let tokens = lex(&body[..close])
                .map_err(|err| ParseError::custom(span, err.message))?
                .into_iter()
                .map(|t| SpannedToken { token: t.token, span })
                .collect();
            parts.push(self.parse_embedded(tokens)?);
            rest = &body[close + 1..];
        }
        if !rest.is_empty() {
            parts.push(self.push(Node::Literal(Value::String(rest.to_string())), span));
        }
        Ok(self.push(Node::Template(parts), span))
    }

    // === Types ===

    /// Parse a type: `int`, `String[]`, `java.lang.String`, `Array<Int>?`
    pub(super) fn parse_type(&mut self) -> ParseResult<TypeRef> {
        let mut ty = self.parse_type_name()?;
        while self.check(&Token::LBracket) && matches!(self.peek_ahead(1), Some(Token::RBracket)) {
            self.advance();
            self.advance();
            ty.dimensions += 1;
        }
        Ok(ty)
    }

    /// A type without trailing `[]`
    fn parse_type_name(&mut self) -> ParseResult<TypeRef> {
        let start = self.current_span();
        if let Some(element) = self.peek().and_then(primitive_type) {
            self.advance();
            return Ok(TypeRef::scalar(element));
        }

        let mut name = match self.peek().cloned() {
            Some(Token::Ident(name)) => name,
            Some(tok) => return Err(ParseError::unexpected_token(start, "type", Some(tok))),
            None => return Err(ParseError::unexpected_eof(start, "type")),
        };
        self.advance();
        while self.check(&Token::Dot) && matches!(self.peek_ahead(1), Some(Token::Ident(_))) {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_ident()?);
        }

        let mut args = Vec::new();
        if self.eat(&Token::Lt) {
            args = self.parse_type_args(start)?;
        }
        self.eat(&Token::Question);

        Ok(named_type(&name, args))
    }

    /// Generic arguments after `<`, up to and including the closing `>`
    fn parse_type_args(&mut self, start: Span) -> ParseResult<Vec<TypeRef>> {
        let mut args = Vec::new();
        loop {
            args.push(self.parse_type()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        match self.peek() {
            Some(Token::Gt) => self.advance(),
            // `Array<Array<Int>>`: the lexer reads `>>` as one token
            Some(Token::Shr) => self.split_closing(Token::Gt),
            Some(Token::UShr) => self.split_closing(Token::Shr),
            _ => return Err(ParseError::invalid_type(start, "unclosed type arguments")),
        }
        Ok(args)
    }

    /// Replaces the current closing token with the one left over after
    /// consuming a single `>`
    fn split_closing(&mut self, rest: Token) {
        if let Some(current) = self.tokens.get_mut(self.pos) {
            current.token = rest;
            current.span.start += 1;
        }
    }
}

/// Maps a type keyword to its element type
pub(super) fn primitive_type(token: &Token) -> Option<ElementType> {
    Some(match token {
        Token::Boolean => ElementType::Boolean,
        Token::Byte => ElementType::Byte,
        Token::Short => ElementType::Short,
        Token::Char => ElementType::Char,
        Token::Int => ElementType::Int,
        Token::Long => ElementType::Long,
        Token::Float => ElementType::Float,
        Token::Double => ElementType::Double,
        _ => return None,
    })
}

/// Resolves a written type name, including Kotlin spellings
fn named_type(name: &str, args: Vec<TypeRef>) -> TypeRef {
    let simple = name.strip_prefix("kotlin.").unwrap_or(name);
    let scalar = match simple {
        "String" | "java.lang.String" => ElementType::String,
        "Object" | "java.lang.Object" | "Any" => ElementType::Object,
        "Boolean" => ElementType::Boolean,
        "Byte" => ElementType::Byte,
        "Short" => ElementType::Short,
        "Char" => ElementType::Char,
        "Int" => ElementType::Int,
        "Long" => ElementType::Long,
        "Float" => ElementType::Float,
        "Double" => ElementType::Double,
        "Array" => {
            return match args.into_iter().next() {
                Some(inner) => TypeRef {
                    element: inner.element,
                    dimensions: inner.dimensions + 1,
                },
                None => TypeRef {
                    element: ElementType::Object,
                    dimensions: 1,
                },
            };
        }
        _ => match simple.strip_suffix("Array").map(|prim| named_type(prim, Vec::new())) {
            Some(prim) if prim.element.is_primitive() && prim.dimensions == 0 => {
                return TypeRef {
                    element: prim.element,
                    dimensions: 1,
                };
            }
            _ => ElementType::Class(name.to_string()),
        },
    };
    TypeRef::scalar(scalar)
}

/// Maps an assignment token to its compound operator (`None` for `=`)
fn assignment_op(token: &Token) -> Option<Option<BinaryOp>> {
    Some(match token {
        Token::Eq => None,
        Token::PlusEq => Some(BinaryOp::Add),
        Token::MinusEq => Some(BinaryOp::Sub),
        Token::StarEq => Some(BinaryOp::Mul),
        Token::SlashEq => Some(BinaryOp::Div),
        Token::PercentEq => Some(BinaryOp::Rem),
        Token::AmpEq => Some(BinaryOp::BitAnd),
        Token::PipeEq => Some(BinaryOp::BitOr),
        Token::CaretEq => Some(BinaryOp::BitXor),
        Token::ShlEq => Some(BinaryOp::Shl),
        Token::ShrEq => Some(BinaryOp::Shr),
        Token::UShrEq => Some(BinaryOp::UShr),
        _ => return None,
    })
}

/// Get the binding power for infix operators
fn infix_binding_power(token: &Token) -> Option<(u8, u8)> {
    Some(match token {
        // Logical OR (lowest precedence)
        Token::OrOr => (1, 2),
        // Logical AND
        Token::AndAnd => (3, 4),
        // Bitwise OR
        Token::Pipe => (5, 6),
        // Bitwise XOR
        Token::Caret => (7, 8),
        // Bitwise AND
        Token::Amp => (9, 10),
        // Equality
        Token::EqEq | Token::Ne => (11, 12),
        // Comparison
        Token::Lt | Token::Gt | Token::Le | Token::Ge => (13, 14),
        // Bit shifts
        Token::Shl | Token::Shr | Token::UShr => (15, 16),
        // Addition/subtraction
        Token::Plus | Token::Minus => (17, 18),
        // Multiplication/division/remainder
        Token::Star | Token::Slash | Token::Percent => (19, 20),
        _ => return None,
    })
}

/// Convert token to binary operator
fn token_to_binary_op(token: &Token) -> Option<BinaryOp> {
    Some(match token {
        Token::Plus => BinaryOp::Add,
        Token::Minus => BinaryOp::Sub,
        Token::Star => BinaryOp::Mul,
        Token::Slash => BinaryOp::Div,
        Token::Percent => BinaryOp::Rem,
        Token::Amp => BinaryOp::BitAnd,
        Token::Pipe => BinaryOp::BitOr,
        Token::Caret => BinaryOp::BitXor,
        Token::Shl => BinaryOp::Shl,
        Token::Shr => BinaryOp::Shr,
        Token::UShr => BinaryOp::UShr,
        Token::EqEq => BinaryOp::Eq,
        Token::Ne => BinaryOp::Ne,
        Token::Lt => BinaryOp::Lt,
        Token::Gt => BinaryOp::Gt,
        Token::Le => BinaryOp::Le,
        Token::Ge => BinaryOp::Ge,
        Token::AndAnd => BinaryOp::And,
        Token::OrOr => BinaryOp::Or,
        _ => return None,
    })
}
