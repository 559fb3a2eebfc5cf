use crate::value::Value;
use indexmap::IndexMap;
use serde::Serialize;

/// Read-only view from reducer name to its current state.
///
/// Holds exactly the active reducers. Cached state of retired reducers is not
/// visible here until a reducer with that name registers again.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GlobalState {
    reducers: IndexMap<String, Value>,
}

impl GlobalState {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.reducers.get(name)
    }

    /// Follow `name` then a chain of map keys into its state.
    pub fn path(&self, keys: &[&str]) -> Option<&Value> {
        let (name, rest) = keys.split_first()?;
        self.get(name)?.path(rest)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.reducers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.reducers.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.reducers.iter().map(|(name, state)| (name.as_str(), state))
    }

    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }

    /// The whole view as a single map value.
    pub fn to_value(&self) -> Value {
        Value::from(self.reducers.clone())
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, state: Value) {
        self.reducers.insert(name.into(), state);
    }

    pub(crate) fn remove(&mut self, name: &str) {
        self.reducers.shift_remove(name);
    }

    pub(crate) fn clear(&mut self) {
        self.reducers.clear();
    }
}
