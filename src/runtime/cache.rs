use crate::value::Value;
use std::collections::HashMap;

/// Last known state of reducers that are no longer registered.
///
/// Entries stay until overwritten or until [`clear`](Self::clear); there is
/// no eviction.
#[derive(Debug, Default)]
pub struct CacheStore {
    states: HashMap<String, Value>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.states.get(name)
    }

    pub fn put(&mut self, name: impl Into<String>, state: Value) {
        self.states.insert(name.into(), state);
    }

    pub fn has(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_overwrite() {
        let mut cache = CacheStore::new();
        assert!(!cache.has("parent"));

        cache.put("parent", Value::from("Hello"));
        assert_eq!(cache.get("parent"), Some(&Value::from("Hello")));

        cache.put("parent", Value::from("Bye"));
        assert_eq!(cache.get("parent"), Some(&Value::from("Bye")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let mut cache = CacheStore::new();
        cache.put("a", Value::from(1));
        cache.put("b", Value::from(2));
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get("a").is_none());
    }
}
