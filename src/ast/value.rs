//! Capture values produced by the grammar engine.
//!
//! Every pattern yields a [`Value`]. Rules turn anonymous [`Value::Record`]s into
//! tagged [`Node`]s, processors reshape them, and the final tree is made of
//! nodes, lists, text and nulls only.

use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::Node;

/// An ordered set of named captures.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fields(Vec<(&'static str, Value)>);

impl Fields {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.iter_mut().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Inserts or replaces `key`, keeping the original position on replace.
    pub fn insert(&mut self, key: &'static str, value: Value) {
        match self.get_mut(key) {
            Some(slot) => *slot = value,
            None => self.0.push((key, value)),
        }
    }

    /// Removes `key` and returns its value, or `Value::Null` when absent.
    pub fn take(&mut self, key: &str) -> Value {
        match self.0.iter().position(|(k, _)| *k == key) {
            Some(index) => self.0.remove(index).1,
            None => Value::Null,
        }
    }

    pub fn extend(&mut self, other: Fields) {
        for (key, value) in other.0 {
            self.insert(key, value);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&'static str, &mut Value)> {
        self.0.iter_mut().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Fields {
    type Item = (&'static str, Value);
    type IntoIter = std::vec::IntoIter<(&'static str, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(&'static str, Value)> for Fields {
    fn from_iter<I: IntoIterator<Item = (&'static str, Value)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

/// A captured value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Text(String),
    List(Vec<Value>),
    /// Named captures of an anonymous sequence; becomes a [`Node`] at rule level.
    Record(Fields),
    /// Subtrees are shared: cloning a value never copies the nodes under it.
    Node(Arc<Node>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null or an empty list: the "did not match" shapes `if_no_match` looks for.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::List(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Mutable access, copying the node first if it is shared.
    pub fn as_node_mut(&mut self) -> Option<&mut Node> {
        match self {
            Value::Node(node) => Some(Arc::make_mut(node)),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn into_node(self) -> Option<Node> {
        match self {
            Value::Node(node) => Some(Node::unshare(node)),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The items of a list; a single non-list value becomes a one-element list
    /// and null becomes empty.
    pub fn into_list(self) -> Vec<Value> {
        match self {
            Value::List(items) => items,
            Value::Null => Vec::new(),
            other => vec![other],
        }
    }

    /// Node tag, if this is a node.
    pub fn kind(&self) -> Option<&'static str> {
        self.as_node().map(|node| node.name)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(Arc::new(node))
    }
}

impl From<Arc<Node>> for Value {
    fn from(node: Arc<Node>) -> Self {
        Value::Node(node)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Bool(flag)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(flag) => serializer.serialize_bool(*flag),
            Value::Text(text) => serializer.serialize_str(text),
            Value::List(items) => items.serialize(serializer),
            Value::Record(fields) => fields.serialize(serializer),
            Value::Node(node) => node.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Value {
        let leaf = Node::new("Integer").with("number", "1");
        Node::new("ReturnStatement").with("expression", leaf).into()
    }

    #[test]
    fn cloning_shares_subtrees() {
        let value = tree();
        let copy = value.clone();
        match (&value, &copy) {
            (Value::Node(left), Value::Node(right)) => assert!(Arc::ptr_eq(left, right)),
            _ => panic!("expected nodes"),
        }
    }

    #[test]
    fn mutation_copies_only_shared_nodes() {
        let original = tree();
        let mut edited = original.clone();
        edited.as_node_mut().unwrap().set("expression", Value::Null);

        assert!(original.as_node().unwrap().node("expression").is_some());
        assert!(edited.as_node().unwrap().get("expression").is_some_and(Value::is_null));

        // `edited` made its own copy, so `original` is the last holder.
        let Value::Node(shared) = original else {
            panic!("expected a node");
        };
        assert_eq!(Arc::strong_count(&shared), 1);
        assert_eq!(Node::unshare(shared).name, "ReturnStatement");
    }
}
