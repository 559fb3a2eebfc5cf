//! # Flexstore
//!
//! A process-wide reactive state store for decoupled consumers.
//!
//! Consumers register independently named reducers and derived-value
//! selectors against a [`Store`]. A single [`Store::dispatch`] call applies an
//! [`Action`] to every active entry and notifies only the owners whose value
//! actually changed.
//!
//! ## Reducers
//!
//! - Each name holds at most one active reducer; its state is published in
//!   the [`GlobalState`] view under that name
//! - A reducer's owner is notified when the next state is not
//!   [`shallow_equal`] to the previous one
//! - With caching enabled, the last state survives unregistration and is
//!   resumed on the next registration of the same name
//!
//! ## Selectors
//!
//! - Derive a [`Value`] from the whole [`GlobalState`]
//! - Notify only when the derived value changes under their comparator
//!   ([`identical`] unless replaced)
//!
//! ## Ordering
//!
//! Dispatch visits entries in registration order. Owners that register
//! outer-before-inner are therefore notified outer-before-inner.

pub mod action;
pub mod error;
pub mod runtime;
pub mod store;
pub mod value;

// Re-export main types for convenience
pub use action::{Action, ActionTypes};
pub use error::{Result, StoreError};
pub use runtime::SubscriptionKey;
pub use store::{
    EqualityFn, GlobalState, Reducer, ReducerHandle, RegisterOptions, Selector, SelectorHandle, Store,
    StoreConfig,
};
pub use value::{identical, shallow_equal, Value};
