//! Parse error types for the snippet parser

use std::fmt;

use thiserror::Error;

use crate::syntax::lexer::Token;
use crate::syntax::span::Span;

/// A parse error
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {}..{}", span.start, span.end)]
pub struct ParseError {
    pub span: Span,
    pub kind: ParseErrorKind,
}

/// The kind of parse error
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Unexpected token
    UnexpectedToken {
        expected: String,
        found: Option<Token>,
    },
    /// Unexpected end of input
    UnexpectedEof { expected: String },
    /// Invalid type
    InvalidType(String),
    /// Custom error message
    Custom(String),
}

impl ParseError {
    pub fn unexpected_token(span: Span, expected: impl Into<String>, found: Option<Token>) -> Self {
        let expected = expected.into();
        let kind = match found {
            Some(found) => ParseErrorKind::UnexpectedToken {
                expected,
                found: Some(found),
            },
            None => ParseErrorKind::UnexpectedEof { expected },
        };
        Self { span, kind }
    }

    pub fn unexpected_eof(span: Span, expected: impl Into<String>) -> Self {
        Self {
            span,
            kind: ParseErrorKind::UnexpectedEof {
                expected: expected.into(),
            },
        }
    }

    pub fn invalid_type(span: Span, name: impl Into<String>) -> Self {
        Self {
            span,
            kind: ParseErrorKind::InvalidType(name.into()),
        }
    }

    pub fn custom(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            kind: ParseErrorKind::Custom(message.into()),
        }
    }

    /// Format error with source code context (line:col instead of byte offsets)
    pub fn format_with_source(&self, source: &str) -> String {
        match &self.kind {
            ParseErrorKind::UnexpectedEof { .. } => self.kind.to_string(),
            kind => format!("{} at {}", kind, self.span.format_position(source)),
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnexpectedToken { expected, found } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of file".to_string(),
                };
                write!(f, "expected {}, found {}", expected, found_str)
            }
            ParseErrorKind::UnexpectedEof { expected } => {
                write!(f, "unexpected end of file, expected {}", expected)
            }
            ParseErrorKind::InvalidType(s) => write!(f, "invalid type: {}", s),
            ParseErrorKind::Custom(msg) => f.write_str(msg),
        }
    }
}

/// Format a token for display in error messages
fn format_token(token: &Token) -> String {
    match token {
        Token::Ident(name) => format!("identifier '{}'", name),
        Token::Integer(n) => format!("integer {}", n),
        Token::RadixInteger(n) => format!("integer {:#x}", n),
        Token::LongInteger(n) => format!("long {}L", n),
        Token::FloatLiteral(x) => format!("float {}f", x),
        Token::DoubleLiteral(x) => format!("double {}", x),
        Token::CharLiteral(_) => "character literal".to_string(),
        Token::String(s) | Token::RawString(s) => format!("string \"{}\"", s),
        Token::Comment => "comment".to_string(),
        other => match keyword(other) {
            Some(word) => format!("keyword '{}'", word),
            None => format!("'{}'", punctuation(other)),
        },
    }
}

fn keyword(token: &Token) -> Option<&'static str> {
    Some(match token {
        Token::If => "if",
        Token::Else => "else",
        Token::While => "while",
        Token::Do => "do",
        Token::For => "for",
        Token::In => "in",
        Token::Return => "return",
        Token::Break => "break",
        Token::Continue => "continue",
        Token::New => "new",
        Token::Class => "class",
        Token::Object => "object",
        Token::Static => "static",
        Token::Final => "final",
        Token::Const => "const",
        Token::Val => "val",
        Token::Var => "var",
        Token::Fun => "fun",
        Token::Public => "public",
        Token::Private => "private",
        Token::Protected => "protected",
        Token::This => "this",
        Token::Void => "void",
        Token::True => "true",
        Token::False => "false",
        Token::Null => "null",
        Token::Boolean => "boolean",
        Token::Byte => "byte",
        Token::Short => "short",
        Token::Char => "char",
        Token::Int => "int",
        Token::Long => "long",
        Token::Float => "float",
        Token::Double => "double",
        _ => return None,
    })
}

fn punctuation(token: &Token) -> &'static str {
    match token {
        Token::Plus => "+",
        Token::Minus => "-",
        Token::Star => "*",
        Token::Slash => "/",
        Token::Percent => "%",
        Token::PlusPlus => "++",
        Token::MinusMinus => "--",
        Token::Amp => "&",
        Token::Pipe => "|",
        Token::Caret => "^",
        Token::Tilde => "~",
        Token::Shl => "<<",
        Token::Shr => ">>",
        Token::UShr => ">>>",
        Token::EqEq => "==",
        Token::Ne => "!=",
        Token::Lt => "<",
        Token::Gt => ">",
        Token::Le => "<=",
        Token::Ge => ">=",
        Token::AndAnd => "&&",
        Token::OrOr => "||",
        Token::Bang => "!",
        Token::Eq => "=",
        Token::PlusEq => "+=",
        Token::MinusEq => "-=",
        Token::StarEq => "*=",
        Token::SlashEq => "/=",
        Token::PercentEq => "%=",
        Token::AmpEq => "&=",
        Token::PipeEq => "|=",
        Token::CaretEq => "^=",
        Token::ShlEq => "<<=",
        Token::ShrEq => ">>=",
        Token::UShrEq => ">>>=",
        Token::LBrace => "{",
        Token::RBrace => "}",
        Token::LParen => "(",
        Token::RParen => ")",
        Token::LBracket => "[",
        Token::RBracket => "]",
        Token::Semi => ";",
        Token::Comma => ",",
        Token::Dot => ".",
        Token::Question => "?",
        Token::Colon => ":",
        _ => "?",
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
