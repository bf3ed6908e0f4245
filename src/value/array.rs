//! Bounded array materialization
//!
//! Arrays are only built element by element when they are small. Anything
//! larger, or with more than one dimension, is summarized by an
//! [`ArrayDescriptor`] that carries the shape but no element data.

use std::fmt;

use super::{ElementType, Value};
use crate::ops::cast;

/// Largest array length that is materialized element by element
pub const LARGEST_LITERAL_ARRAY: usize = 12;

/// Most initializer elements evaluated before the rest are given up on
pub const MAX_INITIALIZER_ELEMENTS: usize = 40;

/// A materialized, fixed-length, homogeneous array
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    element: ElementType,
    elements: Vec<Value>,
}

impl ArrayValue {
    pub fn element_type(&self) -> &ElementType {
        &self.element
    }

    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Bounds-checked element read
    pub fn get(&self, index: i64) -> Option<&Value> {
        usize::try_from(index).ok().and_then(|i| self.elements.get(i))
    }
}

impl fmt::Display for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", element)?;
        }
        f.write_str("]")
    }
}

/// Opaque summary of an array too large or too deep to materialize
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayDescriptor {
    element: ElementType,
    size: usize,
    dimensions: u32,
}

impl ArrayDescriptor {
    pub fn new(element: ElementType, size: usize, dimensions: u32) -> Self {
        Self {
            element,
            size,
            dimensions,
        }
    }

    pub fn element_type(&self) -> &ElementType {
        &self.element
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn dimensions(&self) -> u32 {
        self.dimensions
    }
}

impl fmt::Display for ArrayDescriptor {
    /// Renders as `int[1000]`, or `int[3][]` for two dimensions
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.element, self.size)?;
        for _ in 1..self.dimensions {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

/// Allocates a zero-filled array, or a descriptor when it is too big or too deep.
///
/// Arrays of arbitrary classes are always summarized; only primitives,
/// strings and plain objects are materialized.
pub fn fresh_array(element: ElementType, size: usize, dimensions: u32) -> Value {
    let materialize = !matches!(element, ElementType::Class(_));
    if materialize && dimensions <= 1 && size <= LARGEST_LITERAL_ARRAY {
        let elements = vec![element.zero(); size];
        Value::Array(ArrayValue { element, elements })
    } else {
        tracing::trace!(%element, size, dimensions, "array summarized by descriptor");
        Value::Descriptor(ArrayDescriptor::new(element, size, dimensions.max(1)))
    }
}

/// Builds an array from already evaluated elements.
///
/// With no declared element type, the type is inferred from the known
/// elements; mixed runtime types give `None`. Numeric elements are
/// converted to a declared numeric element type; elements that do not fit
/// the declared type at all become the type's zero value.
pub fn reify_array(element: Option<ElementType>, values: Vec<Value>) -> Option<Value> {
    let element = match element {
        Some(element) => element,
        None => infer_element_type(&values)?,
    };

    let elements = values
        .into_iter()
        .map(|value| coerce_element(&element, value))
        .collect();

    Some(Value::Array(ArrayValue { element, elements }))
}

/// Number of elements of an array or descriptor
pub fn array_size(value: &Value) -> Option<usize> {
    match value {
        Value::Array(array) => Some(array.len()),
        Value::Descriptor(desc) => Some(desc.size()),
        _ => None,
    }
}

fn infer_element_type(values: &[Value]) -> Option<ElementType> {
    let mut known = values.iter().filter_map(Value::element_type);
    let first = known.next()?;
    if known.all(|ty| ty == first) {
        Some(first)
    } else {
        tracing::trace!(%first, "array elements have no common type");
        None
    }
}

fn coerce_element(element: &ElementType, value: Value) -> Value {
    match element {
        ElementType::Object | ElementType::Class(_) => value,
        ElementType::String => match value {
            Value::String(_) => value,
            _ => Value::Unknown,
        },
        ElementType::Boolean => match value {
            Value::Boolean(_) => value,
            _ => element.zero(),
        },
        numeric => cast::convert(&value, numeric).unwrap_or_else(|| numeric.zero()),
    }
}
