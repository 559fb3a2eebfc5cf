use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub type Map = IndexMap<String, Value>;

/// A dynamically typed state tree.
///
/// Lists and maps live behind an `Arc`, so cloning a `Value` never copies a
/// composite. Two composites share an allocation until one side is rebuilt,
/// which is what makes [`identical`](crate::identical) cheap and meaningful.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Arc<str>),
    List(Arc<Vec<Value>>),
    Map(Arc<Map>),
}

impl Value {
    /// An empty map.
    pub fn map() -> Self {
        Value::Map(Arc::new(Map::new()))
    }

    /// An empty list.
    pub fn list() -> Self {
        Value::List(Arc::new(Vec::new()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this value is a key/value structure.
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Map(_) | Value::List(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Number of top-level entries of a composite, `0` for scalars.
    pub fn len(&self) -> usize {
        match self {
            Value::List(items) => items.len(),
            Value::Map(map) => map.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a key of a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Look up a position in a list.
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.as_list().and_then(|items| items.get(index))
    }

    /// Follow a chain of map keys.
    pub fn path(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().try_fold(self, |value, key| value.get(key))
    }

    /// Return a copy of this map with `key` set to `value`.
    ///
    /// Untouched children keep their allocations. A non-map receiver is
    /// treated as an empty map.
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Value {
        let mut map = self.as_map().cloned().unwrap_or_default();
        map.insert(key.into(), value.into());
        Value::Map(Arc::new(map))
    }

    /// Return a copy of this map without `key`.
    pub fn without(&self, key: &str) -> Value {
        let mut map = self.as_map().cloned().unwrap_or_default();
        map.shift_remove(key);
        Value::Map(Arc::new(map))
    }

    /// Return a copy of this list with `value` appended.
    ///
    /// A non-list receiver is treated as an empty list.
    pub fn pushed(&self, value: impl Into<Value>) -> Value {
        let mut items = self.as_list().map(<[Value]>::to_vec).unwrap_or_default();
        items.push(value.into());
        Value::List(Arc::new(items))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json: serde_json::Value = self.clone().into();
        write!(f, "{json}")
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(Arc::new(items))
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(Arc::new(map))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(Arc::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::from(s),
            Json::Array(items) => Value::List(Arc::new(items.into_iter().map(Value::from).collect())),
            Json::Object(map) => map.into_iter().collect(),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        use serde_json::Value as Json;
        match value {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(b),
            Value::Int(n) => Json::from(n),
            // Non-finite floats have no JSON form.
            Value::Float(n) => serde_json::Number::from_f64(n)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::String(s) => Json::String(s.to_string()),
            Value::List(items) => Json::Array(items.iter().cloned().map(Json::from).collect()),
            Value::Map(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Json::from(v.clone())))
                    .collect(),
            ),
        }
    }
}
