use super::store::StoreInner;
use super::GlobalState;
use crate::runtime::{Entry, SubscriptionKey};
use crate::value::Value;
use parking_lot::Mutex;
use std::sync::Weak;

type StoreRef = Weak<Mutex<StoreInner>>;

/// Remove the entry and drop it once the lock is released.
fn release(store: &StoreRef, epoch: u64, key: SubscriptionKey) {
    if let Some(inner) = store.upgrade() {
        let removed = inner.lock().unregister(epoch, key);
        drop(removed);
    }
}

/// RAII registration of a reducer.
///
/// Unregisters when dropped or when [`unregister`](Self::unregister) is
/// called, whichever comes first. Handles returned by a repeat registration
/// of the same reducer all point at one entry, and the first of them to be
/// released removes it.
pub struct ReducerHandle {
    key: SubscriptionKey,
    name: String,
    epoch: u64,
    store: StoreRef,
    active: bool,
}

impl ReducerHandle {
    pub(crate) fn new(key: SubscriptionKey, name: String, epoch: u64, store: StoreRef) -> Self {
        Self {
            key,
            name,
            epoch,
            store,
            active: true,
        }
    }

    pub fn key(&self) -> SubscriptionKey {
        self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The global state, or an empty view once the store is gone.
    pub fn snapshot(&self) -> GlobalState {
        let Some(inner) = self.store.upgrade() else {
            return GlobalState::default();
        };
        let snapshot = inner.lock().state().clone();
        snapshot
    }

    /// This reducer's current state while its entry is active.
    pub fn state(&self) -> Option<Value> {
        let inner = self.store.upgrade()?;
        let inner = inner.lock();
        let state = match inner.entry(self.epoch, self.key)? {
            Entry::Reducer(entry) => Some(entry.state.clone()),
            Entry::Selector(_) => None,
        };
        state
    }

    /// Whether the entry behind this handle is still registered.
    pub fn is_active(&self) -> bool {
        self.state().is_some()
    }

    pub fn unregister(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if std::mem::take(&mut self.active) {
            release(&self.store, self.epoch, self.key);
        }
    }
}

impl Drop for ReducerHandle {
    fn drop(&mut self) {
        self.release();
    }
}

/// RAII registration of a selector.
pub struct SelectorHandle {
    key: SubscriptionKey,
    epoch: u64,
    store: StoreRef,
    active: bool,
}

impl SelectorHandle {
    pub(crate) fn new(key: SubscriptionKey, epoch: u64, store: StoreRef) -> Self {
        Self {
            key,
            epoch,
            store,
            active: true,
        }
    }

    pub fn key(&self) -> SubscriptionKey {
        self.key
    }

    /// The selector's last computed result, `Null` once unregistered.
    pub fn snapshot(&self) -> Value {
        let Some(inner) = self.store.upgrade() else {
            return Value::Null;
        };
        let inner = inner.lock();
        let last = match inner.entry(self.epoch, self.key) {
            Some(Entry::Selector(entry)) => entry.last.clone(),
            _ => Value::Null,
        };
        last
    }

    pub fn is_active(&self) -> bool {
        let Some(inner) = self.store.upgrade() else {
            return false;
        };
        let active = inner.lock().entry(self.epoch, self.key).is_some();
        active
    }

    pub fn unregister(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if std::mem::take(&mut self.active) {
            release(&self.store, self.epoch, self.key);
        }
    }
}

impl Drop for SelectorHandle {
    fn drop(&mut self) {
        self.release();
    }
}
