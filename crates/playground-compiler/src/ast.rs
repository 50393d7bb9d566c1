//! Parsed syntax trees and span re-basing.
//!
//! swc reports byte positions relative to a global source map, so the first
//! file parsed by a module instance starts at a non-zero offset. Before the
//! tree is shown, every span is shifted so that the root starts at zero.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A `{start, end}` byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: i64,
    pub end: i64,
}

impl Span {
    /// Length of the range in bytes.
    #[must_use]
    pub const fn len(&self) -> i64 {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Reads a span from an object with numeric `start` and `end` fields.
fn span_of(object: &Map<String, Value>) -> Option<Span> {
    Some(Span {
        start: object.get("start")?.as_i64()?,
        end: object.get("end")?.as_i64()?,
    })
}

/// Whether `value` looks like a span: an object carrying `start` and `end`.
fn is_span_like(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.contains_key("start") && object.contains_key("end"))
}

/// Subtracts `offset` from every span in `value`.
///
/// Only fields literally named `span` whose value looks like a span are
/// shifted; a shifted span is not descended into. Arrays and all other
/// object fields are walked recursively. Non-integer bounds are left as is.
pub fn rebase_spans(value: &mut Value, offset: i64) {
    match value {
        Value::Array(items) => {
            for item in items {
                rebase_spans(item, offset);
            }
        }
        Value::Object(object) => {
            for (key, field) in object.iter_mut() {
                if key == "span" && is_span_like(field) {
                    shift_span(field, offset);
                } else {
                    rebase_spans(field, offset);
                }
            }
        }
        _ => {}
    }
}

fn shift_span(span: &mut Value, offset: i64) {
    let Some(object) = span.as_object_mut() else {
        return;
    };
    for bound in ["start", "end"] {
        if let Some(position) = object.get(bound).and_then(Value::as_i64) {
            object.insert(bound.to_string(), Value::from(position - offset));
        }
    }
}

/// The raw syntax tree returned by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedAst {
    pub tree: Value,
}

impl ParsedAst {
    #[must_use]
    pub fn new(tree: Value) -> Self {
        Self { tree }
    }

    /// The root node's span, if present.
    #[must_use]
    pub fn root_span(&self) -> Option<Span> {
        self.tree
            .get("span")
            .and_then(Value::as_object)
            .and_then(span_of)
    }

    /// Shifts all spans so that the root starts at zero.
    ///
    /// A tree without a root span is left untouched.
    pub fn rebase(&mut self) {
        if let Some(root) = self.root_span() {
            rebase_spans(&mut self.tree, root.start);
        }
    }

    /// Copy of the tree with spans re-based.
    #[must_use]
    pub fn rebased(&self) -> Self {
        let mut copy = self.clone();
        copy.rebase();
        copy
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.tree
    }
}
