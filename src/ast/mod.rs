//! The PHP syntax tree.
//!
//! The grammar is data, so the tree is too: a [`Node`] is a tag (`name`) plus
//! ordered named fields. The node kinds and their fields are listed in
//! [`kinds`]; the PHP grammar and the tree-shaping processors are the only
//! producers.

use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::syntax::{Bounds, OffsetSpan};

pub mod kinds;
pub mod value;

pub use value::{Fields, Value};

/// A tagged AST record.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: &'static str,
    pub fields: Fields,
    pub bounds: Option<Bounds>,
    pub offset: Option<OffsetSpan>,
}

impl Node {
    /// Takes a node out of a [`Value::Node`], copying it only if the memo
    /// table or another value still holds it.
    pub fn unshare(node: Arc<Node>) -> Node {
        Arc::try_unwrap(node).unwrap_or_else(|shared| (*shared).clone())
    }

    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Fields::new(),
            bounds: None,
            offset: None,
        }
    }

    pub fn with_fields(name: &'static str, fields: Fields) -> Self {
        Self {
            name,
            fields,
            bounds: None,
            offset: None,
        }
    }

    /// Builder-style field insert.
    pub fn with(mut self, key: &'static str, value: impl Into<Value>) -> Self {
        self.fields.insert(key, value.into());
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: &'static str, value: impl Into<Value>) {
        self.fields.insert(key, value.into());
    }

    pub fn take(&mut self, key: &str) -> Value {
        self.fields.take(key)
    }

    pub fn node(&self, key: &str) -> Option<&Node> {
        self.get(key).and_then(Value::as_node)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_text)
    }

    pub fn list(&self, key: &str) -> Option<&[Value]> {
        self.get(key).and_then(Value::as_list)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn is_instrumented(&self) -> bool {
        self.bounds.is_some() || self.offset.is_some()
    }

    /// Absolute byte range recorded by whichever instrumentation is present.
    pub fn byte_range(&self) -> Option<(usize, usize)> {
        if let Some(bounds) = &self.bounds {
            return Some((bounds.start.offset, bounds.end.offset));
        }
        self.offset.map(|offset| (offset.offset, offset.end()))
    }

    /// Removes `bounds`/`offset` from this node and every descendant.
    pub fn strip_positions(&mut self) {
        self.bounds = None;
        self.offset = None;
        for (_, value) in self.fields.iter_mut() {
            strip_value(value);
        }
    }
}

fn strip_value(value: &mut Value) {
    match value {
        Value::Node(node) => Arc::make_mut(node).strip_positions(),
        Value::List(items) => items.iter_mut().for_each(strip_value),
        Value::Record(fields) => {
            for (_, inner) in fields.iter_mut() {
                strip_value(inner);
            }
        }
        _ => {}
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = usize::from(self.bounds.is_some()) + usize::from(self.offset.is_some());
        let mut map = serializer.serialize_map(Some(1 + self.fields.len() + extra))?;
        map.serialize_entry("name", self.name)?;
        for (key, value) in self.fields.iter() {
            map.serialize_entry(key, value)?;
        }
        if let Some(bounds) = &self.bounds {
            map.serialize_entry("bounds", bounds)?;
        }
        if let Some(offset) = &self.offset {
            map.serialize_entry("offset", offset)?;
        }
        map.end()
    }
}
