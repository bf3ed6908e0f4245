//! Operator semantics over constant values
//!
//! Numeric operands follow binary numeric promotion: every integral kind
//! narrower than 64 bits (char included) is computed as a 32-bit int, and
//! the operation runs at the widest width among its operands.

pub mod binary;
pub mod cast;
pub mod unary;

use std::fmt;

use crate::value::Value;

pub use binary::binary;
pub use cast::cast;
pub use unary::prefix;

/// Binary and polyadic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Logical
    And,
    Or,
}

impl BinaryOp {
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixOp {
    /// Logical NOT: !x
    Not,
    /// Unary plus: +x
    Plus,
    /// Arithmetic negation: -x
    Minus,
    /// Bitwise NOT: ~x
    BitNot,
    /// Pre-increment: ++x
    Increment,
    /// Pre-decrement: --x
    Decrement,
}

/// Postfix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostfixOp {
    Increment,
    Decrement,
}

/// A numeric operand after unary promotion
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Numeric {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Numeric {
    pub(crate) fn of(value: &Value) -> Option<Self> {
        let numeric = match *value {
            Value::Byte(n) => Numeric::Int(i32::from(n)),
            Value::Short(n) => Numeric::Int(i32::from(n)),
            Value::Char(c) => Numeric::Int(i32::from(c)),
            Value::Int(n) => Numeric::Int(n),
            Value::Long(n) => Numeric::Long(n),
            Value::Float(x) => Numeric::Float(x),
            Value::Double(x) => Numeric::Double(x),
            _ => return None,
        };
        Some(numeric)
    }

    pub(crate) fn width(self) -> Width {
        match self {
            Numeric::Int(_) => Width::Int,
            Numeric::Long(_) => Width::Long,
            Numeric::Float(_) => Width::Float,
            Numeric::Double(_) => Width::Double,
        }
    }

    pub(crate) fn to_i32(self) -> i32 {
        match self {
            Numeric::Int(n) => n,
            Numeric::Long(n) => n as i32,
            Numeric::Float(x) => x as i32,
            Numeric::Double(x) => x as i32,
        }
    }

    pub(crate) fn to_i64(self) -> i64 {
        match self {
            Numeric::Int(n) => i64::from(n),
            Numeric::Long(n) => n,
            Numeric::Float(x) => x as i64,
            Numeric::Double(x) => x as i64,
        }
    }

    pub(crate) fn to_f32(self) -> f32 {
        match self {
            Numeric::Int(n) => n as f32,
            Numeric::Long(n) => n as f32,
            Numeric::Float(x) => x,
            Numeric::Double(x) => x as f32,
        }
    }

    pub(crate) fn to_f64(self) -> f64 {
        match self {
            Numeric::Int(n) => f64::from(n),
            Numeric::Long(n) => n as f64,
            Numeric::Float(x) => f64::from(x),
            Numeric::Double(x) => x,
        }
    }
}

/// Width at which a numeric operation is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Int,
    Long,
    Float,
    Double,
}

impl Width {
    /// Classifies a pair of operands as integral or floating, narrow or wide
    pub(crate) fn promote(left: Numeric, right: Numeric) -> Width {
        let (l, r) = (left.width(), right.width());
        let floating = !l.is_integral() || !r.is_integral();
        match (floating, l, r) {
            (true, Width::Double, _) | (true, _, Width::Double) => Width::Double,
            (true, _, _) => Width::Float,
            (false, Width::Long, _) | (false, _, Width::Long) => Width::Long,
            (false, _, _) => Width::Int,
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(self, Width::Int | Width::Long)
    }
}
