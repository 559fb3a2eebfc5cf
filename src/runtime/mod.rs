//! Bookkeeping behind the store: subscription keys, the ordered entry
//! registry, and the cache of retired reducer state.

mod cache;
mod key;
mod registry;

pub use cache::CacheStore;
pub use key::{KeyGenerator, SubscriptionKey};
pub use registry::Notify;
pub(crate) use registry::{Entry, EntryRegistry, ReducerEntry, SelectorEntry};
