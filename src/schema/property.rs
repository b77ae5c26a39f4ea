/// Header property values: scalars, lists, and action records.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A single header value after coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl Scalar {
    /// Returns false for the values that mean "not specified": `""`, `0`, `false`.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Str(s) => !s.is_empty(),
            Self::Int(n) => *n != 0,
            Self::Bool(b) => *b,
        }
    }

    /// Render the scalar as plain text (`42`, `true`, or the string itself).
    pub fn to_text(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Int(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

/// A staged side effect declared under `actions:` in a scene header.
///
/// Entries keep their declaration order. The first entry is always `type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    entries: Vec<(String, Scalar)>,
}

impl ActionRecord {
    pub fn new(kind: &str) -> Self {
        Self {
            entries: vec![("type".to_string(), Scalar::from(kind))],
        }
    }

    /// The value of the `type` key.
    pub fn kind(&self) -> &Scalar {
        &self.entries[0].1
    }

    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Set a field, overwriting an existing key in place.
    pub fn set(&mut self, key: &str, value: Scalar) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for ActionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Any value a header property can hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Scalar(Scalar),
    List(Vec<String>),
    Actions(Vec<ActionRecord>),
}

impl PropertyValue {
    /// Empty strings, zero, false, and empty lists count as absent.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Scalar(s) => s.is_present(),
            Self::List(items) => !items.is_empty(),
            Self::Actions(records) => !records.is_empty(),
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_actions(&self) -> Option<&[ActionRecord]> {
        match self {
            Self::Actions(records) => Some(records),
            _ => None,
        }
    }
}

impl From<Scalar> for PropertyValue {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

/// Header properties in declaration order.
///
/// Inserting a key that already exists replaces its value but keeps the
/// key's original position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyTable {
    entries: Vec<(String, PropertyValue)>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: PropertyValue) {
        match self.get_mut(key) {
            Some(slot) => *slot = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut PropertyValue> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for PropertyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
