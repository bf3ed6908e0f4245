//! Prefix operator semantics

use super::{Numeric, PrefixOp};
use crate::value::Value;

/// Applies a prefix operator to a known operand.
///
/// Negation and bitwise complement promote narrow integral kinds to int;
/// unary plus returns the operand untouched. Increment and decrement have
/// side effects and never fold.
pub fn prefix(op: PrefixOp, operand: &Value) -> Option<Value> {
    match op {
        PrefixOp::Not => operand.as_bool().map(|b| Value::Boolean(!b)),
        PrefixOp::Plus => Some(operand.clone()),
        PrefixOp::Minus => match Numeric::of(operand)? {
            Numeric::Int(n) => Some(Value::Int(n.wrapping_neg())),
            Numeric::Long(n) => Some(Value::Long(n.wrapping_neg())),
            Numeric::Float(x) => Some(Value::Float(-x)),
            Numeric::Double(x) => Some(Value::Double(-x)),
        },
        PrefixOp::BitNot => match Numeric::of(operand)? {
            Numeric::Int(n) => Some(Value::Int(!n)),
            Numeric::Long(n) => Some(Value::Long(!n)),
            Numeric::Float(_) | Numeric::Double(_) => None,
        },
        PrefixOp::Increment | PrefixOp::Decrement => None,
    }
}
