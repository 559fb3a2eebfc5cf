use super::{GlobalState, Reducer, ReducerHandle, RegisterOptions, Selector, SelectorHandle, StoreConfig};
use crate::action::Action;
use crate::error::{Result, StoreError};
use crate::runtime::{
    CacheStore, Entry, EntryRegistry, KeyGenerator, Notify, ReducerEntry, SelectorEntry, SubscriptionKey,
};
use crate::value::{shallow_equal, Value};
use log::{debug, trace};
use parking_lot::{Mutex, ReentrantMutex};
use std::sync::{Arc, OnceLock};

/// Registration arguments the store did not keep.
///
/// Dropped by the caller once the lock is released, since a reducer or
/// notify callback may own handles whose `Drop` locks the store.
type Unused = (Reducer, RegisterOptions);

/// Shared mutable state of one store.
pub(crate) struct StoreInner {
    config: StoreConfig,
    // Bumped by `reset` so handles from before the reset cannot touch
    // entries that reuse their keys.
    epoch: u64,
    keys: KeyGenerator,
    entries: EntryRegistry,
    state: GlobalState,
    cache: CacheStore,
}

impl StoreInner {
    fn new(config: StoreConfig) -> Self {
        Self {
            config,
            epoch: 0,
            keys: KeyGenerator::new(),
            entries: EntryRegistry::default(),
            state: GlobalState::default(),
            cache: CacheStore::new(),
        }
    }

    pub(crate) fn state(&self) -> &GlobalState {
        &self.state
    }

    pub(crate) fn entry(&self, epoch: u64, key: SubscriptionKey) -> Option<&Entry> {
        if epoch != self.epoch {
            return None;
        }
        self.entries.get(key)
    }

    fn register_reducer(
        &mut self,
        name: String,
        reducer: Reducer,
        initial: Value,
        options: RegisterOptions,
    ) -> (Result<SubscriptionKey>, Option<Unused>) {
        if name.trim().is_empty() {
            return (Err(StoreError::MissingArgument("name")), Some((reducer, options)));
        }
        if initial.is_null() {
            return (Err(StoreError::MissingArgument("initial_state")), Some((reducer, options)));
        }

        if let Some(key) = self.entries.reducer_key(&name) {
            let same = self
                .entries
                .reducer(&name)
                .is_some_and(|entry| entry.reducer.same_as(&reducer));
            if !same {
                return (Err(StoreError::DuplicateName(name)), Some((reducer, options)));
            }
            debug!("[{}] reducer '{}' already registered as {}", self.config.label, name, key);
            return (Ok(key), Some((reducer, options)));
        }

        let resumed = if options.cache { self.cache.get(&name).cloned() } else { None };
        let state = match resumed {
            Some(cached) => {
                debug!("[{}] reducer '{}' resumes from cache", self.config.label, name);
                cached
            }
            None => match &options.init {
                Some(init) => init(initial),
                None => initial,
            },
        };

        let key = self.keys.next_key();
        self.state.insert(name.clone(), state.clone());
        debug!("[{}] registered reducer '{}' as {}", self.config.label, name, key);
        self.entries.insert_reducer(
            key,
            ReducerEntry {
                name,
                reducer,
                state,
                notify: options.notify,
                cache: options.cache,
            },
        );
        (Ok(key), None)
    }

    fn register_selector(&mut self, selector: Selector, notify: Notify) -> SubscriptionKey {
        let key = self.keys.next_key();
        let last = selector.select(&self.state);
        debug!("[{}] registered selector {}", self.config.label, key);
        self.entries.insert_selector(key, SelectorEntry { selector, last, notify });
        key
    }

    /// Remove an entry, writing reducer state to the cache when asked to.
    ///
    /// The removed entry is handed back so the caller can drop it after
    /// releasing the lock; its callbacks may own handles of their own.
    pub(crate) fn unregister(&mut self, epoch: u64, key: SubscriptionKey) -> Option<Entry> {
        if epoch != self.epoch {
            return None;
        }
        let entry = self.entries.remove(key)?;
        if let Entry::Reducer(reducer) = &entry {
            if reducer.cache && !self.cache.has(&reducer.name) {
                debug!("[{}] caching state of reducer '{}'", self.config.label, reducer.name);
                self.cache.put(reducer.name.clone(), reducer.state.clone());
            }
            self.state.remove(&reducer.name);
        }
        debug!("[{}] unregistered {}", self.config.label, key);
        Some(entry)
    }

    /// Run one entry against `action`.
    ///
    /// Returns the callback to notify and the value to pass when the entry's
    /// visible value changed. Entries removed mid-dispatch are skipped.
    fn apply(&mut self, key: SubscriptionKey, action: &Action) -> Option<(Notify, Value)> {
        match self.entries.get_mut(key)? {
            Entry::Reducer(entry) => {
                let next = entry.reducer.apply(&entry.state, action);
                if shallow_equal(&entry.state, &next) {
                    return None;
                }
                entry.state = next.clone();
                self.state.insert(entry.name.clone(), next.clone());
                trace!("[{}] reducer '{}' changed", self.config.label, entry.name);
                entry.notify.clone().map(|notify| (notify, next))
            }
            Entry::Selector(entry) => {
                let next = entry.selector.select(&self.state);
                if !entry.selector.changed(&entry.last, &next) {
                    return None;
                }
                entry.last = next.clone();
                trace!("[{}] selector {} changed", self.config.label, key);
                Some((entry.notify.clone(), next))
            }
        }
    }

    fn reset(&mut self) -> EntryRegistry {
        debug!("[{}] reset", self.config.label);
        self.epoch += 1;
        self.keys.reset();
        self.state.clear();
        self.cache.clear();
        std::mem::take(&mut self.entries)
    }
}

/// A registry of named reducers and selectors sharing one dispatch channel.
///
/// Cloning a `Store` yields another handle to the same store.
///
/// Reducers, selectors and initializers run while the store is locked and
/// must not call back into it. Notify callbacks run unlocked and may
/// dispatch, register or unregister; a nested dispatch completes before the
/// outer one moves on to its next entry.
///
/// Whole dispatches are serialized across threads: a dispatch from another
/// thread waits until the running one, nested dispatches included, has
/// returned. A notify callback must therefore not block on another thread
/// that dispatches into the same store.
///
/// # Examples
///
/// ```
/// use flexstore::{Action, Reducer, Store, Value};
///
/// let store = Store::new();
/// let reducer = Reducer::new(|state, action| match action.action_type() {
///     "RENAME" => state.with("value", action.payload().cloned().unwrap_or_default()),
///     _ => state.clone(),
/// });
/// let _parent = store
///     .register_reducer("parent", reducer, Value::map().with("value", "Hello"), store.options())
///     .unwrap();
///
/// store.dispatch(Action::with_payload("RENAME", "Bye")).unwrap();
/// assert_eq!(store.state().path(&["parent", "value"]), Some(&Value::from("Bye")));
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Arc<Mutex<StoreInner>>,
    // Held for a whole dispatch; reentrant so notify callbacks can dispatch.
    dispatching: Arc<ReentrantMutex<()>>,
}

impl Store {
    /// Create an empty store with default settings.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner::new(config))),
            dispatching: Arc::new(ReentrantMutex::new(())),
        }
    }

    /// The process-wide store, created on first use.
    pub fn global() -> Store {
        static GLOBAL: OnceLock<Store> = OnceLock::new();
        GLOBAL
            .get_or_init(|| Store::with_config(StoreConfig::new("global")))
            .clone()
    }

    pub fn config(&self) -> StoreConfig {
        self.inner.lock().config.clone()
    }

    /// Registration options seeded from this store's config.
    pub fn options(&self) -> RegisterOptions {
        RegisterOptions::new().cache(self.inner.lock().config.cache_by_default)
    }

    /// Register `reducer` under `name`.
    ///
    /// The entry starts from the cached state for `name` when `options`
    /// enables caching and a cached state exists, otherwise from `initial`.
    /// Registering the same reducer again while its entry is active returns a
    /// handle to that entry; registering a different one fails with
    /// [`StoreError::DuplicateName`].
    ///
    /// The handle shared by such a repeat registration is not counted:
    /// dropping or unregistering either handle removes the entry for both,
    /// and the repeat registrant's `notify` is never attached. Keep the
    /// returned handle alive for as long as the entry is needed; binding it
    /// to `_` unregisters immediately.
    pub fn register_reducer(
        &self,
        name: impl Into<String>,
        reducer: Reducer,
        initial: impl Into<Value>,
        options: RegisterOptions,
    ) -> Result<ReducerHandle> {
        let name = name.into();
        let (registered, unused) = {
            let mut inner = self.inner.lock();
            let (registered, unused) = inner.register_reducer(name.clone(), reducer, initial.into(), options);
            (registered.map(|key| (key, inner.epoch)), unused)
        };
        drop(unused);
        let (key, epoch) = registered?;
        Ok(ReducerHandle::new(key, name, epoch, Arc::downgrade(&self.inner)))
    }

    /// Subscribe `notify` to changes of `selector` over the global state.
    ///
    /// The selector runs once immediately to record its initial result.
    pub fn register_selector<F>(&self, selector: Selector, notify: F) -> SelectorHandle
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let (key, epoch) = {
            let mut inner = self.inner.lock();
            let key = inner.register_selector(selector, Arc::new(notify));
            (key, inner.epoch)
        };
        SelectorHandle::new(key, epoch, Arc::downgrade(&self.inner))
    }

    /// Apply `action` to every active entry in registration order.
    ///
    /// Each reducer or selector whose value changed has its notify callback
    /// invoked with the new value before the next entry is visited. Entries
    /// registered while the dispatch runs are not visited by it, and a
    /// [`reset`](Self::reset) from a notify callback ends it.
    pub fn dispatch(&self, action: Action) -> Result<()> {
        action.validate()?;
        let _serial = self.dispatching.lock();
        let (epoch, keys) = {
            let inner = self.inner.lock();
            trace!(
                "[{}] dispatch '{}' to {} entries",
                inner.config.label,
                action.action_type(),
                inner.entries.len()
            );
            (inner.epoch, inner.entries.keys())
        };
        for key in keys {
            let change = {
                let mut inner = self.inner.lock();
                if inner.epoch != epoch {
                    trace!("[{}] store reset mid-dispatch, stopping", inner.config.label);
                    break;
                }
                inner.apply(key, &action)
            };
            if let Some((notify, value)) = change {
                notify(&value);
            }
        }
        Ok(())
    }

    /// Dispatch a loosely shaped `{ "type": ..., "payload": ... }` action.
    pub fn dispatch_json(&self, action: serde_json::Value) -> Result<()> {
        self.dispatch(Action::try_from(action)?)
    }

    /// Snapshot of every active reducer's state.
    pub fn state(&self) -> GlobalState {
        self.inner.lock().state.clone()
    }

    pub fn has_reducer(&self, name: &str) -> bool {
        self.inner.lock().entries.reducer_key(name).is_some()
    }

    /// State kept for `name` since its reducer was last unregistered.
    pub fn cached(&self, name: &str) -> Option<Value> {
        self.inner.lock().cache.get(name).cloned()
    }

    /// Number of active reducer and selector entries.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry, the cache and the key counter.
    ///
    /// Handles created before the reset become inert.
    pub fn reset(&self) {
        let retired = self.inner.lock().reset();
        drop(retired);
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::identical;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn set_value() -> Reducer {
        Reducer::new(|state, action| match action.action_type() {
            "SET" => state.with("value", action.payload().cloned().unwrap_or_default()),
            _ => state.clone(),
        })
    }

    fn initial() -> Value {
        Value::from(json!({ "value": "Hello" }))
    }

    #[test]
    fn register_publishes_initial_state() {
        let store = Store::new();
        let handle = store
            .register_reducer("parent", set_value(), initial(), store.options())
            .unwrap();

        assert_eq!(store.state().get("parent"), Some(&initial()));
        assert_eq!(handle.snapshot(), store.state());
        assert_eq!(handle.state(), Some(initial()));
        assert!(store.has_reducer("parent"));
    }

    #[test]
    fn missing_arguments_create_nothing() {
        let store = Store::new();
        assert_eq!(
            store.register_reducer("", set_value(), initial(), store.options()).err(),
            Some(StoreError::MissingArgument("name"))
        );
        assert_eq!(
            store.register_reducer("parent", set_value(), Value::Null, store.options()).err(),
            Some(StoreError::MissingArgument("initial_state"))
        );
        assert!(store.is_empty());
        assert!(store.state().is_empty());
    }

    #[test]
    fn same_reducer_registers_once() {
        let store = Store::new();
        let reducer = set_value();
        let first = store
            .register_reducer("parent", reducer.clone(), initial(), store.options())
            .unwrap();
        let second = store
            .register_reducer("parent", reducer, Value::from(json!({ "value": "Other" })), store.options())
            .unwrap();

        assert_eq!(first.key(), second.key());
        assert_eq!(store.len(), 1);
        assert_eq!(store.state().get("parent"), Some(&initial()));
    }

    #[test]
    fn rejected_registration_releases_handles_it_owned() {
        let store = Store::new();
        let reducer = set_value();
        let first = store
            .register_reducer("parent", reducer.clone(), initial(), store.options())
            .unwrap();

        // Each unused notify owns a handle whose drop locks the store.
        let watcher = store.register_selector(Selector::path(["parent"]), |_| {});
        let repeat = store
            .register_reducer(
                "parent",
                reducer,
                initial(),
                store.options().notify(move |_| {
                    let _ = watcher.key();
                }),
            )
            .unwrap();
        assert_eq!(repeat.key(), first.key());
        assert_eq!(store.len(), 1);

        let watcher = store.register_selector(Selector::path(["parent"]), |_| {});
        let duplicate = store.register_reducer(
            "parent",
            set_value(),
            initial(),
            store.options().notify(move |_| {
                let _ = watcher.key();
            }),
        );
        assert_eq!(duplicate.err(), Some(StoreError::DuplicateName("parent".into())));
        assert_eq!(store.len(), 1);

        let watcher = store.register_selector(Selector::path(["parent"]), |_| {});
        let missing = store.register_reducer(
            "",
            Reducer::new(move |state, _| {
                let _ = watcher.key();
                state.clone()
            }),
            initial(),
            store.options(),
        );
        assert_eq!(missing.err(), Some(StoreError::MissingArgument("name")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unchanged_reducer_output_is_silent() {
        let store = Store::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let _handle = store
            .register_reducer(
                "parent",
                set_value(),
                initial(),
                store.options().notify(move |_| {
                    calls_clone.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        store.dispatch(Action::with_payload("SET", "Hello")).unwrap();
        store.dispatch(Action::new("OTHER")).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        store.dispatch(Action::with_payload("SET", "Bye")).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn selector_records_initial_result() {
        let store = Store::new();
        let _parent = store
            .register_reducer("parent", set_value(), initial(), store.options())
            .unwrap();
        let selector = store.register_selector(Selector::path(["parent", "value"]), |_| {});

        assert_eq!(selector.snapshot(), Value::from("Hello"));
    }

    #[test]
    fn selector_without_change_keeps_same_result() {
        let store = Store::new();
        let _parent = store
            .register_reducer("parent", set_value(), initial(), store.options())
            .unwrap();
        let selector = store.register_selector(
            Selector::new(|state| state.get("parent").cloned().unwrap_or_default()),
            |_| {},
        );
        let before = selector.snapshot();

        store.dispatch(Action::new("NOOP")).unwrap();
        assert!(identical(&before, &selector.snapshot()));
    }

    #[test]
    fn initializer_applies_only_to_fresh_state() {
        let store = Store::new();
        let options = || store.options().init(|state| state.with("ready", true));

        let handle = store
            .register_reducer("parent", set_value(), initial(), options())
            .unwrap();
        assert_eq!(handle.state().and_then(|s| s.get("ready").cloned()), Some(Value::from(true)));

        store.dispatch(Action::with_payload("SET", "Bye")).unwrap();
        handle.unregister();
        let cached = store.cached("parent").unwrap();

        let handle = store
            .register_reducer("parent", set_value(), initial(), options())
            .unwrap();
        assert_eq!(handle.state(), Some(cached));
    }

    #[test]
    fn config_controls_default_caching() {
        let store = Store::with_config(StoreConfig::new("test").cache_by_default(false));
        assert_eq!(store.config().label, "test");

        let handle = store
            .register_reducer("parent", set_value(), initial(), store.options())
            .unwrap();
        handle.unregister();
        assert!(store.cached("parent").is_none());
    }

    #[test]
    fn reset_clears_everything_and_orphans_handles() {
        let store = Store::new();
        let old = store
            .register_reducer("parent", set_value(), initial(), store.options())
            .unwrap();
        store.dispatch(Action::with_payload("SET", "Bye")).unwrap();

        store.reset();
        assert!(store.is_empty());
        assert!(store.state().is_empty());

        // Reuses key #0 after the counter restarts.
        let fresh = store
            .register_reducer("child", set_value(), initial(), store.options())
            .unwrap();
        assert_eq!(fresh.key(), old.key());

        old.unregister();
        assert!(store.has_reducer("child"));
        assert!(store.cached("parent").is_none());
    }

    #[test]
    fn global_store_is_shared() {
        let a = Store::global();
        let b = Store::global();
        assert!(Arc::ptr_eq(&a.inner, &b.inner));
        assert_eq!(a.config().label, "global");
    }
}
