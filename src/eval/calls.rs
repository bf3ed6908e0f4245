//! Recognized calls
//!
//! Only a closed set of pure library calls is folded. Each recognized name
//! maps to a [`CallRule`]; anything else falls back to the single-return
//! method heuristic or stays unknown.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::resolve::{Declaration, SymbolResolver};
use crate::tree::{NodeKind, SyntaxTree};
use crate::value::{ElementType, Value, fresh_array};

use super::{ConstantEvaluator, EvalState, utf16_len};

/// How a recognized call is evaluated
#[derive(Debug, Clone, PartialEq)]
pub(super) enum CallRule {
    /// `arrayOf(a, b)`; element type from the call's static type
    ArrayOf,
    /// `intArrayOf(1, 2)` and friends
    TypedArrayOf(ElementType),
    /// `IntArray(n)` and friends
    SizedArray(ElementType),
    /// `Array(n) { ... }`, `arrayOfNulls(n)`
    SizedObjectArray,
    /// `text.trimIndent()`
    TrimIndent,
    /// `text.trimMargin()`, `text.trimMargin(prefix)`
    TrimMargin,
    /// `String.format(...)`, `text.format(...)`
    Format,
    /// `text.length()`
    Length,
}

impl CallRule {
    pub(super) fn builds_array(&self) -> bool {
        matches!(
            self,
            CallRule::ArrayOf
                | CallRule::TypedArrayOf(_)
                | CallRule::SizedArray(_)
                | CallRule::SizedObjectArray
        )
    }
}

const PRIMITIVE_ARRAYS: [(&str, &str, ElementType); 8] = [
    ("ByteArray", "byteArrayOf", ElementType::Byte),
    ("CharArray", "charArrayOf", ElementType::Char),
    ("ShortArray", "shortArrayOf", ElementType::Short),
    ("IntArray", "intArrayOf", ElementType::Int),
    ("LongArray", "longArrayOf", ElementType::Long),
    ("FloatArray", "floatArrayOf", ElementType::Float),
    ("DoubleArray", "doubleArrayOf", ElementType::Double),
    ("BooleanArray", "booleanArrayOf", ElementType::Boolean),
];

fn registry() -> &'static FxHashMap<&'static str, CallRule> {
    static REGISTRY: OnceLock<FxHashMap<&'static str, CallRule>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut rules = FxHashMap::default();
        for (sized, vararg, element) in PRIMITIVE_ARRAYS {
            rules.insert(sized, CallRule::SizedArray(element.clone()));
            rules.insert(vararg, CallRule::TypedArrayOf(element));
        }
        rules.insert("arrayOf", CallRule::ArrayOf);
        rules.insert("Array", CallRule::SizedObjectArray);
        rules.insert("arrayOfNulls", CallRule::SizedObjectArray);
        rules.insert("trimIndent", CallRule::TrimIndent);
        rules.insert("trimMargin", CallRule::TrimMargin);
        rules.insert("format", CallRule::Format);
        rules.insert("length", CallRule::Length);
        rules
    })
}

pub(super) fn call_rule(name: &str) -> Option<&'static CallRule> {
    registry().get(name)
}

/// Returns true if calls named `name` may be folded without resolving them
pub fn is_recognized_call(name: &str) -> bool {
    call_rule(name).is_some()
}

impl<'t, T, R> ConstantEvaluator<'t, T, R>
where
    T: SyntaxTree,
    R: SymbolResolver<T::Node>,
{
    pub(super) fn eval_call(
        &self,
        node: T::Node,
        receiver: Option<T::Node>,
        name: &str,
        args: &[T::Node],
        element: Option<&ElementType>,
        state: &mut EvalState,
    ) -> Option<Value> {
        let receiver = receiver.filter(|&r| !self.is_kotlin_package(r));

        if let Some(rule) = call_rule(name) {
            return self.apply_rule(rule, receiver, args, element, state);
        }

        match self.resolver.resolve(node) {
            Some(Declaration::Method(method)) if args.is_empty() => {
                self.method_value(&method, state)
            }
            _ => None,
        }
    }

    /// `kotlin.IntArray(3)` is the same call as `IntArray(3)`
    fn is_kotlin_package(&self, receiver: T::Node) -> bool {
        matches!(
            self.tree.kind(receiver),
            NodeKind::Reference {
                name: "kotlin",
                qualifier: None
            }
        )
    }

    fn apply_rule(
        &self,
        rule: &CallRule,
        receiver: Option<T::Node>,
        args: &[T::Node],
        element: Option<&ElementType>,
        state: &mut EvalState,
    ) -> Option<Value> {
        match rule {
            CallRule::ArrayOf if receiver.is_none() => {
                self.eval_initializer(element.cloned(), args, state)
            }
            CallRule::TypedArrayOf(ty) if receiver.is_none() => {
                self.eval_initializer(Some(ty.clone()), args, state)
            }
            CallRule::SizedArray(ty) if receiver.is_none() => {
                let size = self.eval_size(*args.first()?, state)?;
                Some(fresh_array(ty.clone(), size, 1))
            }
            CallRule::SizedObjectArray if receiver.is_none() => {
                let size = self.eval_size(*args.first()?, state)?;
                let ty = element.cloned().unwrap_or(ElementType::Object);
                Some(fresh_array(ty, size, 1))
            }
            CallRule::TrimIndent if args.is_empty() => {
                let text = self.eval_text(receiver?, state)?;
                Some(Value::String(trim_indent(&text)))
            }
            CallRule::TrimMargin if args.len() <= 1 => {
                let text = self.eval_text(receiver?, state)?;
                let prefix = match args.first() {
                    Some(&arg) => self.eval_text(arg, state).unwrap_or_else(|| "|".to_string()),
                    None => "|".to_string(),
                };
                trim_margin(&text, &prefix).map(Value::String)
            }
            CallRule::Format if self.config.allow_unknown => {
                self.format_string(receiver, args, state)
            }
            CallRule::Length if args.is_empty() => {
                let text = self.eval_text(receiver?, state)?;
                utf16_len(&text)
            }
            _ => None,
        }
    }

    /// Approximates a formatting call by its format string
    fn format_string(
        &self,
        receiver: Option<T::Node>,
        args: &[T::Node],
        state: &mut EvalState,
    ) -> Option<Value> {
        // "%d items".format(n)
        if let Some(receiver) = receiver
            && let Some(text) = self.eval_text(receiver, state)
        {
            return Some(Value::String(text));
        }
        // String.format(fmt, ...) or String.format(locale, fmt, ...)
        if args.len() < 2 {
            return None;
        }
        args.iter()
            .take(2)
            .find_map(|&arg| self.eval_text(arg, state))
            .map(Value::String)
    }

    fn eval_text(&self, node: T::Node, state: &mut EvalState) -> Option<String> {
        match self.eval(node, state)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

// === String helpers ===

fn lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(['\r', '\n']) {
        lines.push(&rest[..pos]);
        let skip = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[pos + skip..];
    }
    lines.push(rest);
    lines
}

fn is_blank(line: &str) -> bool {
    line.chars().all(char::is_whitespace)
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Drops blank first and last lines, maps every other line with `cut`
/// (keeping it unchanged when `cut` declines) and joins with `\n`
fn reindent(text: &str, cut: impl Fn(&str) -> Option<String>) -> String {
    let lines = lines(text);
    let last = lines.len() - 1;
    lines
        .iter()
        .enumerate()
        .filter(|&(i, line)| !((i == 0 || i == last) && is_blank(line)))
        .map(|(_, line)| cut(line).unwrap_or_else(|| line.to_string()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Removes the common minimal indent of all non-blank lines
pub(crate) fn trim_indent(text: &str) -> String {
    let min_indent = lines(text)
        .into_iter()
        .filter(|line| !is_blank(line))
        .map(indent_width)
        .min()
        .unwrap_or(0);
    reindent(text, |line| Some(line.chars().skip(min_indent).collect()))
}

/// Strips leading whitespace followed by `prefix` from every line.
///
/// A blank prefix is rejected.
pub(crate) fn trim_margin(text: &str, prefix: &str) -> Option<String> {
    if is_blank(prefix) {
        return None;
    }
    Some(reindent(text, |line| {
        let start = line.find(|c: char| !c.is_whitespace())?;
        line[start..]
            .strip_prefix(prefix)
            .map(str::to_string)
    }))
}
