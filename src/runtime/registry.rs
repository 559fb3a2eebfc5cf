use super::key::SubscriptionKey;
use crate::store::{Reducer, Selector};
use crate::value::Value;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Callback invoked with the new value when an entry changes.
pub type Notify = Arc<dyn Fn(&Value) + Send + Sync>;

pub(crate) struct ReducerEntry {
    pub name: String,
    pub reducer: Reducer,
    pub state: Value,
    pub notify: Option<Notify>,
    pub cache: bool,
}

pub(crate) struct SelectorEntry {
    pub selector: Selector,
    pub last: Value,
    pub notify: Notify,
}

pub(crate) enum Entry {
    Reducer(ReducerEntry),
    Selector(SelectorEntry),
}

/// Active reducer and selector entries in registration order.
///
/// Order is part of the contract: dispatch visits entries first-registered
/// first. Removing an entry keeps the relative order of the rest, and a
/// re-registered entry goes to the back.
#[derive(Default)]
pub(crate) struct EntryRegistry {
    entries: IndexMap<SubscriptionKey, Entry>,
    names: HashMap<String, SubscriptionKey>,
}

impl EntryRegistry {
    pub fn insert_reducer(&mut self, key: SubscriptionKey, entry: ReducerEntry) {
        self.names.insert(entry.name.clone(), key);
        self.entries.insert(key, Entry::Reducer(entry));
    }

    pub fn insert_selector(&mut self, key: SubscriptionKey, entry: SelectorEntry) {
        self.entries.insert(key, Entry::Selector(entry));
    }

    /// Key of the active reducer registered under `name`.
    pub fn reducer_key(&self, name: &str) -> Option<SubscriptionKey> {
        self.names.get(name).copied()
    }

    pub fn reducer(&self, name: &str) -> Option<&ReducerEntry> {
        match self.entries.get(self.names.get(name)?)? {
            Entry::Reducer(entry) => Some(entry),
            Entry::Selector(_) => None,
        }
    }

    pub fn get(&self, key: SubscriptionKey) -> Option<&Entry> {
        self.entries.get(&key)
    }

    pub fn get_mut(&mut self, key: SubscriptionKey) -> Option<&mut Entry> {
        self.entries.get_mut(&key)
    }

    pub fn remove(&mut self, key: SubscriptionKey) -> Option<Entry> {
        let entry = self.entries.shift_remove(&key)?;
        if let Entry::Reducer(reducer) = &entry {
            self.names.remove(&reducer.name);
        }
        Some(entry)
    }

    /// Snapshot of the current visiting order.
    pub fn keys(&self) -> Vec<SubscriptionKey> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::KeyGenerator;

    fn reducer_entry(name: &str) -> ReducerEntry {
        ReducerEntry {
            name: name.to_string(),
            reducer: Reducer::new(|state, _| state.clone()),
            state: Value::from(name),
            notify: None,
            cache: true,
        }
    }

    fn selector_entry() -> SelectorEntry {
        SelectorEntry {
            selector: Selector::new(|_| Value::Null),
            last: Value::Null,
            notify: Arc::new(|_: &Value| {}),
        }
    }

    #[test]
    fn keeps_registration_order() {
        let mut keys = KeyGenerator::new();
        let mut registry = EntryRegistry::default();
        let a = keys.next_key();
        let s = keys.next_key();
        let b = keys.next_key();
        registry.insert_reducer(a, reducer_entry("a"));
        registry.insert_selector(s, selector_entry());
        registry.insert_reducer(b, reducer_entry("b"));

        assert_eq!(registry.keys(), vec![a, s, b]);
        assert_eq!(registry.reducer_key("b"), Some(b));
        assert_eq!(registry.reducer("a").map(|e| e.name.as_str()), Some("a"));
    }

    #[test]
    fn removal_keeps_order_and_readd_goes_last() {
        let mut keys = KeyGenerator::new();
        let mut registry = EntryRegistry::default();
        let a = keys.next_key();
        let b = keys.next_key();
        let c = keys.next_key();
        registry.insert_reducer(a, reducer_entry("a"));
        registry.insert_reducer(b, reducer_entry("b"));
        registry.insert_reducer(c, reducer_entry("c"));

        assert!(registry.remove(a).is_some());
        assert!(registry.reducer_key("a").is_none());
        assert_eq!(registry.keys(), vec![b, c]);

        let a2 = keys.next_key();
        registry.insert_reducer(a2, reducer_entry("a"));
        assert_eq!(registry.keys(), vec![b, c, a2]);
        assert!(registry.remove(a).is_none());
        assert_eq!(registry.len(), 3);
    }
}
