//! Numeric casts
//!
//! Narrowing follows the host language: floating values convert to int or
//! long with saturation (NaN becomes zero), and byte, short and char are
//! reached by first converting to int and then truncating.

use super::Numeric;
use crate::value::{ElementType, Value};

/// Casts a known value to `target`.
///
/// Casts to non-numeric targets, and casts of non-numeric operands, leave
/// the value unchanged.
pub fn cast(value: Value, target: &ElementType) -> Value {
    if !target.is_numeric() {
        return value;
    }
    convert(&value, target).unwrap_or(value)
}

/// Converts a numeric value to a numeric element type
pub(crate) fn convert(value: &Value, target: &ElementType) -> Option<Value> {
    let n = Numeric::of(value)?;
    let converted = match target {
        ElementType::Byte => Value::Byte(n.to_i32() as i8),
        ElementType::Short => Value::Short(n.to_i32() as i16),
        ElementType::Char => Value::Char(n.to_i32() as u16),
        ElementType::Int => Value::Int(n.to_i32()),
        ElementType::Long => Value::Long(n.to_i64()),
        ElementType::Float => Value::Float(n.to_f32()),
        ElementType::Double => Value::Double(n.to_f64()),
        _ => return None,
    };
    Some(converted)
}
