//! Binary operator semantics
//!
//! Integer arithmetic wraps at the promoted width, floating arithmetic is
//! plain IEEE-754. The only operation that refuses to produce a value is
//! integer division or remainder by zero.

use super::{BinaryOp, Numeric, Width};
use crate::value::Value;

/// Applies `op` to two known operands.
///
/// Returns `None` when the operation is undefined for the operand kinds.
pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> Option<Value> {
    match (left, right) {
        (Value::String(_), _) | (_, Value::String(_)) => concat(op, left, right),
        (Value::Boolean(l), Value::Boolean(r)) => boolean(op, *l, *r),
        _ => numeric(op, Numeric::of(left)?, Numeric::of(right)?),
    }
}

/// `+` with a string operand stringifies the other side
fn concat(op: BinaryOp, left: &Value, right: &Value) -> Option<Value> {
    if op != BinaryOp::Add {
        return None;
    }
    let mut text = left.concat_text()?;
    text.push_str(&right.concat_text()?);
    Some(Value::String(text))
}

fn boolean(op: BinaryOp, l: bool, r: bool) -> Option<Value> {
    let result = match op {
        BinaryOp::And => l && r,
        BinaryOp::Or => l || r,
        BinaryOp::BitAnd => l & r,
        BinaryOp::BitOr => l | r,
        BinaryOp::BitXor => l ^ r,
        BinaryOp::Eq => l == r,
        BinaryOp::Ne => l != r,
        _ => return None,
    };
    Some(Value::Boolean(result))
}

fn numeric(op: BinaryOp, left: Numeric, right: Numeric) -> Option<Value> {
    let width = Width::promote(left, right);

    if op.is_comparison() {
        return Some(Value::Boolean(compare(op, width, left, right)));
    }

    match width {
        Width::Int => int_op(op, left.to_i32(), right.to_i32()).map(Value::Int),
        Width::Long => long_op(op, left.to_i64(), right.to_i64()).map(Value::Long),
        Width::Float => float_op(op, left.to_f32(), right.to_f32()).map(Value::Float),
        Width::Double => double_op(op, left.to_f64(), right.to_f64()).map(Value::Double),
    }
}

fn compare(op: BinaryOp, width: Width, left: Numeric, right: Numeric) -> bool {
    if width.is_integral() {
        ordered(op, left.to_i64(), right.to_i64())
    } else {
        ordered(op, left.to_f64(), right.to_f64())
    }
}

fn ordered<T: PartialOrd>(op: BinaryOp, l: T, r: T) -> bool {
    match op {
        BinaryOp::Eq => l == r,
        BinaryOp::Ne => l != r,
        BinaryOp::Lt => l < r,
        BinaryOp::Le => l <= r,
        BinaryOp::Gt => l > r,
        BinaryOp::Ge => l >= r,
        _ => false,
    }
}

fn int_op(op: BinaryOp, l: i32, r: i32) -> Option<i32> {
    let result = match op {
        BinaryOp::Add => l.wrapping_add(r),
        BinaryOp::Sub => l.wrapping_sub(r),
        BinaryOp::Mul => l.wrapping_mul(r),
        BinaryOp::Div | BinaryOp::Rem if r == 0 => {
            tracing::trace!(%op, dividend = l, "integer division by constant zero");
            return None;
        }
        BinaryOp::Div => l.wrapping_div(r),
        BinaryOp::Rem => l.wrapping_rem(r),
        BinaryOp::BitAnd => l & r,
        BinaryOp::BitOr => l | r,
        BinaryOp::BitXor => l ^ r,
        // Shift distances are taken modulo 32
        BinaryOp::Shl => l.wrapping_shl(r as u32),
        BinaryOp::Shr => l.wrapping_shr(r as u32),
        BinaryOp::UShr => (l as u32).wrapping_shr(r as u32) as i32,
        _ => return None,
    };
    Some(result)
}

fn long_op(op: BinaryOp, l: i64, r: i64) -> Option<i64> {
    let result = match op {
        BinaryOp::Add => l.wrapping_add(r),
        BinaryOp::Sub => l.wrapping_sub(r),
        BinaryOp::Mul => l.wrapping_mul(r),
        BinaryOp::Div | BinaryOp::Rem if r == 0 => {
            tracing::trace!(%op, dividend = l, "long division by constant zero");
            return None;
        }
        BinaryOp::Div => l.wrapping_div(r),
        BinaryOp::Rem => l.wrapping_rem(r),
        BinaryOp::BitAnd => l & r,
        BinaryOp::BitOr => l | r,
        BinaryOp::BitXor => l ^ r,
        // Shift distances are taken modulo 64
        BinaryOp::Shl => l.wrapping_shl(r as u32),
        BinaryOp::Shr => l.wrapping_shr(r as u32),
        BinaryOp::UShr => (l as u64).wrapping_shr(r as u32) as i64,
        _ => return None,
    };
    Some(result)
}

fn float_op(op: BinaryOp, l: f32, r: f32) -> Option<f32> {
    let result = match op {
        BinaryOp::Add => l + r,
        BinaryOp::Sub => l - r,
        BinaryOp::Mul => l * r,
        BinaryOp::Div => l / r,
        BinaryOp::Rem => l % r,
        _ => return None,
    };
    Some(result)
}

fn double_op(op: BinaryOp, l: f64, r: f64) -> Option<f64> {
    let result = match op {
        BinaryOp::Add => l + r,
        BinaryOp::Sub => l - r,
        BinaryOp::Mul => l * r,
        BinaryOp::Div => l / r,
        BinaryOp::Rem => l % r,
        _ => return None,
    };
    Some(result)
}
