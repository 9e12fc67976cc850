//! The value model scanned by a `Session`.
//!
//! Payloads arrive from request bodies, query strings and form fields, so the
//! walker needs a closed description of "anything JSON-like" rather than ad hoc
//! type tests. `Payload` is that description: a recursive sum type whose
//! `Mapping` variant keeps insertion order and remembers whether the object
//! was built with a null prototype, and whose `Opaque` variant stands in for
//! host objects that are not plain mappings and must never be traversed.
//!
//! License: MIT OR APACHE 2.0

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Number, Value};
use std::fmt;

/// The prototype flavour of a mapping.
///
/// Both flavours count as plain objects; the distinction is kept so that
/// null-prototype inputs are representable and covered by the key guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Prototype {
    /// An object created with literal syntax.
    #[default]
    Object,
    /// An object created without any prototype.
    Null,
}

/// An insertion-ordered string-keyed map of payload values.
///
/// Backed by an `IndexMap`, so lookups and inserts stay constant-time however
/// wide the incoming object is.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: IndexMap<String, Payload>,
    prototype: Prototype,
}

impl Mapping {
    /// Creates an empty mapping with the ordinary object prototype.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty mapping with no prototype.
    pub fn with_null_prototype() -> Self {
        Self {
            entries: IndexMap::new(),
            prototype: Prototype::Null,
        }
    }

    /// The prototype flavour this mapping was built with.
    pub fn prototype(&self) -> Prototype {
        self.prototype
    }

    /// Inserts `value` under `key`, replacing (in place) any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Payload) -> Option<Payload> {
        self.entries.insert(key.into(), value)
    }

    /// Looks up the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Payload> {
        self.entries.get(key)
    }

    /// Own-key existence check, independent of the value stored.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Payload)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an empty mapping with the same prototype flavour.
    pub(crate) fn empty_like(&self) -> Self {
        Self {
            entries: IndexMap::with_capacity(self.entries.len()),
            prototype: self.prototype,
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Payload)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, Payload)>>(iter: I) -> Self {
        Mapping {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            prototype: Prototype::Object,
        }
    }
}

/// Any value that can be handed to a scan.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum Payload {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Payload>),
    Mapping(Mapping),
    /// A non-plain host instance (a date, a class instance, ...), identified by
    /// its type name. Never traversed; passes through scans unchanged.
    Opaque(String),
}

impl Payload {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Payload::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Payload]> {
        match self {
            Payload::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Payload::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Payload::Null)
    }

    /// Follows `path` from this value, returning the addressed child if any.
    pub fn pointer(&self, path: &[PathSegment]) -> Option<&Payload> {
        path.iter().try_fold(self, |current, segment| match (current, segment) {
            (Payload::Sequence(items), PathSegment::Index(i)) => items.get(*i),
            (Payload::Mapping(m), PathSegment::Key(k)) => m.get(k),
            _ => None,
        })
    }

    /// Short name of the variant, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Null => "null",
            Payload::Bool(_) => "bool",
            Payload::Number(_) => "number",
            Payload::String(_) => "string",
            Payload::Sequence(_) => "sequence",
            Payload::Mapping(_) => "mapping",
            Payload::Opaque(_) => "opaque",
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Payload::Null,
            Value::Bool(b) => Payload::Bool(b),
            Value::Number(n) => Payload::Number(n),
            Value::String(s) => Payload::String(s),
            Value::Array(items) => Payload::Sequence(items.into_iter().map(Payload::from).collect()),
            Value::Object(map) => Payload::Mapping(
                map.into_iter().map(|(k, v)| (k, Payload::from(v))).collect(),
            ),
        }
    }
}

impl From<&Payload> for Value {
    fn from(payload: &Payload) -> Self {
        match payload {
            Payload::Null | Payload::Opaque(_) => Value::Null,
            Payload::Bool(b) => Value::Bool(*b),
            Payload::Number(n) => Value::Number(n.clone()),
            Payload::String(s) => Value::String(s.clone()),
            Payload::Sequence(items) => Value::Array(items.iter().map(Value::from).collect()),
            Payload::Mapping(m) => Value::Object(
                m.iter().map(|(k, v)| (k.to_string(), Value::from(v))).collect(),
            ),
        }
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::String(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::String(s)
    }
}

impl From<bool> for Payload {
    fn from(b: bool) -> Self {
        Payload::Bool(b)
    }
}

impl From<i64> for Payload {
    fn from(n: i64) -> Self {
        Payload::Number(n.into())
    }
}

impl From<Vec<Payload>> for Payload {
    fn from(items: Vec<Payload>) -> Self {
        Payload::Sequence(items)
    }
}

impl From<Mapping> for Payload {
    fn from(m: Mapping) -> Self {
        Payload::Mapping(m)
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Payload::Null | Payload::Opaque(_) => serializer.serialize_unit(),
            Payload::Bool(b) => serializer.serialize_bool(*b),
            Payload::Number(n) => n.serialize(serializer),
            Payload::String(s) => serializer.serialize_str(s),
            Payload::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Payload::Mapping(m) => {
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

/// One step of an issue path: an object key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        PathSegment::Index(i)
    }
}

impl From<&str> for PathSegment {
    fn from(k: &str) -> Self {
        PathSegment::Key(k.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(k: String) -> Self {
        PathSegment::Key(k)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "[{}]", i),
            PathSegment::Key(k) => write!(f, ".{}", k),
        }
    }
}
