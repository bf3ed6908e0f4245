//! Lexer for the snippet language
//!
//! Uses logos for efficient tokenization. The token set covers the Java and
//! Kotlin subset the parser understands.

use logos::Logos;
use thiserror::Error;

use super::span::Span;

/// Tokens of the snippet language
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // === Keywords ===
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("return")]
    Return,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("new")]
    New,
    #[token("class")]
    Class,
    #[token("object")]
    Object,
    #[token("static")]
    Static,
    #[token("final")]
    Final,
    #[token("const")]
    Const,
    #[token("val")]
    Val,
    #[token("var")]
    Var,
    #[token("fun")]
    Fun,
    #[token("public")]
    Public,
    #[token("private")]
    Private,
    #[token("protected")]
    Protected,
    #[token("this")]
    This,
    #[token("void")]
    Void,

    // === Constant keywords ===
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // === Primitive types ===
    #[token("boolean")]
    Boolean,
    #[token("byte")]
    Byte,
    #[token("short")]
    Short,
    #[token("char")]
    Char,
    #[token("int")]
    Int,
    #[token("long")]
    Long,
    #[token("float")]
    Float,
    #[token("double")]
    Double,

    // === Arithmetic operators ===
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    // === Bitwise operators ===
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token(">>>")]
    UShr,

    // === Comparison operators ===
    #[token("==")]
    EqEq,
    #[token("!=")]
    Ne,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,

    // === Logical operators ===
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Bang,

    // === Assignment operators ===
    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,
    #[token(">>>=")]
    UShrEq,

    // === Delimiters ===
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    // === Literals ===
    #[regex(r"[0-9][0-9_]*", |lex| parse_decimal(lex.slice()))]
    Integer(i64),

    /// Hex or binary literal; these may use all 32 bits of an int
    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*", |lex| parse_radix(&lex.slice()[2..], 16))]
    #[regex(r"0[bB][01][01_]*", |lex| parse_radix(&lex.slice()[2..], 2))]
    RadixInteger(u64),

    #[regex(r"[0-9][0-9_]*[lL]", |lex| parse_decimal(trim_suffix(lex.slice())))]
    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*[lL]", |lex| {
        parse_radix(&trim_suffix(lex.slice())[2..], 16).map(|n| n as i64)
    })]
    #[regex(r"0[bB][01][01_]*[lL]", |lex| {
        parse_radix(&trim_suffix(lex.slice())[2..], 2).map(|n| n as i64)
    })]
    LongInteger(i64),

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fF]", |lex| parse_float(lex.slice()))]
    #[regex(r"[0-9][0-9_]*([eE][+-]?[0-9]+)?[fF]", |lex| parse_float(lex.slice()))]
    FloatLiteral(f32),

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[dD]?", |lex| parse_double(lex.slice()))]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+[dD]?", |lex| parse_double(lex.slice()))]
    #[regex(r"[0-9][0-9_]*[dD]", |lex| parse_double(lex.slice()))]
    DoubleLiteral(f64),

    #[regex(r"'([^'\\]|\\.|\\u[0-9a-fA-F][0-9a-fA-F][0-9a-fA-F][0-9a-fA-F])'", |lex| {
        let s = lex.slice();
        parse_char(&s[1..s.len() - 1])
    })]
    CharLiteral(u16),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        let content = &s[1..s.len()-1];
        Some(unescape_string(content))
    })]
    String(String),

    /// Kotlin raw string: `"""..."""`, no escapes
    #[regex(r#""""([^"]|"[^"]|""[^"])*""""#, |lex| {
        let s = lex.slice();
        Some(s[3..s.len() - 3].to_string())
    })]
    RawString(String),

    // === Identifier ===
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    // === Comments (skipped) ===
    #[regex(r"//[^\n]*?", logos::skip)]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", logos::skip)]
    Comment,
}

fn trim_suffix(s: &str) -> &str {
    &s[..s.len() - 1]
}

fn parse_decimal(s: &str) -> Option<i64> {
    s.replace('_', "").parse::<i64>().ok()
}

fn parse_radix(digits: &str, radix: u32) -> Option<u64> {
    u64::from_str_radix(&digits.replace('_', ""), radix).ok()
}

fn parse_float(s: &str) -> Option<f32> {
    trim_suffix(s).replace('_', "").parse::<f32>().ok()
}

fn parse_double(s: &str) -> Option<f64> {
    s.trim_end_matches(['d', 'D']).replace('_', "").parse::<f64>().ok()
}

fn parse_char(content: &str) -> Option<u16> {
    let text = unescape_string(content);
    let mut units = text.encode_utf16();
    let unit = units.next()?;
    units.next().is_none().then_some(unit)
}

/// Process escape sequences in a string or char literal
fn unescape_string(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('b') => result.push('\u{8}'),
                Some('f') => result.push('\u{c}'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some('\'') => result.push('\''),
                Some('$') => result.push('$'),
                Some('0') => result.push('\0'),
                Some('u') => {
                    let hex: String = chars.by_ref().take(4).collect();
                    match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                        Some(c) => result.push(c),
                        None => {
                            result.push_str("\\u");
                            result.push_str(&hex);
                        }
                    }
                }
                Some(c) => {
                    // Unknown escape sequence - preserve it as-is
                    result.push('\\');
                    result.push(c);
                }
                None => result.push('\\'),
            }
        } else {
            result.push(ch);
        }
    }
    result
}

/// A token with its span in the source
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Lex source code into tokens
pub fn lex(source: &str) -> Result<Vec<SpannedToken>, LexError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => {
                tokens.push(SpannedToken {
                    token,
                    span: lexer.span().into(),
                });
            }
            Err(()) => {
                return Err(LexError {
                    span: lexer.span().into(),
                    message: format!("unexpected character: {:?}", lexer.slice()),
                });
            }
        }
    }

    Ok(tokens)
}

/// An error that occurred during lexing
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at {}..{}", span.start, span.end)]
pub struct LexError {
    pub span: Span,
    pub message: String,
}
