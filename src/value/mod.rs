//! Constant values
//!
//! The closed set of values the evaluator can prove for an expression,
//! plus bounded array materialization (see [`array`]).

pub mod array;
mod format;

use std::fmt;

pub use array::{
    ArrayDescriptor, ArrayValue, LARGEST_LITERAL_ARRAY, MAX_INITIALIZER_ELEMENTS, array_size,
    fresh_array, reify_array,
};
pub use format::{double_to_string, float_to_string};

/// Element type of an array, or the target type of a cast
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    String,
    Object,
    /// Any other reference type, by class name
    Class(String),
}

impl ElementType {
    /// Returns true for the eight primitive types
    pub fn is_primitive(&self) -> bool {
        !matches!(
            self,
            ElementType::String | ElementType::Object | ElementType::Class(_)
        )
    }

    /// Returns true for the numeric primitives (char included)
    pub fn is_numeric(&self) -> bool {
        self.is_primitive() && *self != ElementType::Boolean
    }

    /// The default element value of a freshly allocated array of this type.
    ///
    /// Reference types default to [`Value::Unknown`], standing in for `null`.
    pub fn zero(&self) -> Value {
        match self {
            ElementType::Boolean => Value::Boolean(false),
            ElementType::Byte => Value::Byte(0),
            ElementType::Short => Value::Short(0),
            ElementType::Char => Value::Char(0),
            ElementType::Int => Value::Int(0),
            ElementType::Long => Value::Long(0),
            ElementType::Float => Value::Float(0.0),
            ElementType::Double => Value::Double(0.0),
            ElementType::String | ElementType::Object | ElementType::Class(_) => Value::Unknown,
        }
    }

    /// Source-level name of the type
    pub fn name(&self) -> &str {
        match self {
            ElementType::Boolean => "boolean",
            ElementType::Byte => "byte",
            ElementType::Short => "short",
            ElementType::Char => "char",
            ElementType::Int => "int",
            ElementType::Long => "long",
            ElementType::Float => "float",
            ElementType::Double => "double",
            ElementType::String => "java.lang.String",
            ElementType::Object => "java.lang.Object",
            ElementType::Class(name) => name,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A statically known value
///
/// `Unknown` only ever appears as an array element (an unset reference slot
/// or an element that could not be evaluated). The evaluator reports a
/// top-level unknown result as `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Unknown,
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// UTF-16 code unit
    Char(u16),
    String(String),
    Array(ArrayValue),
    Descriptor(ArrayDescriptor),
}

impl Value {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value of any integral kind (char included), widened to 64 bits
    pub fn as_integral(&self) -> Option<i64> {
        match self {
            Value::Byte(n) => Some(i64::from(*n)),
            Value::Short(n) => Some(i64::from(*n)),
            Value::Char(c) => Some(i64::from(*c)),
            Value::Int(n) => Some(i64::from(*n)),
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns true for every numeric kind, char included
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::Byte(_)
                | Value::Short(_)
                | Value::Char(_)
                | Value::Int(_)
                | Value::Long(_)
                | Value::Float(_)
                | Value::Double(_)
        )
    }

    /// Runtime type of the value, used to infer undeclared array element types
    pub fn element_type(&self) -> Option<ElementType> {
        let ty = match self {
            Value::Unknown => return None,
            Value::Boolean(_) => ElementType::Boolean,
            Value::Byte(_) => ElementType::Byte,
            Value::Short(_) => ElementType::Short,
            Value::Char(_) => ElementType::Char,
            Value::Int(_) => ElementType::Int,
            Value::Long(_) => ElementType::Long,
            Value::Float(_) => ElementType::Float,
            Value::Double(_) => ElementType::Double,
            Value::String(_) => ElementType::String,
            Value::Array(array) => ElementType::Class(format!("{}[]", array.element_type())),
            Value::Descriptor(desc) => {
                let mut name = desc.element_type().name().to_string();
                for _ in 0..desc.dimensions() {
                    name.push_str("[]");
                }
                ElementType::Class(name)
            }
        };
        Some(ty)
    }

    /// Text used when the value is an operand of string concatenation.
    ///
    /// Only scalars take part; arrays and unknowns do not.
    pub fn concat_text(&self) -> Option<String> {
        match self {
            Value::Unknown | Value::Array(_) | Value::Descriptor(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Short kind name for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Unknown => "unknown",
            Value::Boolean(_) => "boolean",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Char(_) => "char",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Descriptor(_) => "array descriptor",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unknown => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Byte(n) => write!(f, "{}", n),
            Value::Short(n) => write!(f, "{}", n),
            Value::Int(n) => write!(f, "{}", n),
            Value::Long(n) => write!(f, "{}", n),
            Value::Float(x) => f.write_str(&float_to_string(*x)),
            Value::Double(x) => f.write_str(&double_to_string(*x)),
            Value::Char(c) => f.write_str(&String::from_utf16_lossy(&[*c])),
            Value::String(s) => f.write_str(s),
            Value::Array(array) => write!(f, "{}", array),
            Value::Descriptor(desc) => write!(f, "{}", desc),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Double(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}
