//! The store: registration, dispatch, and the handles tying entries to
//! their owners.

mod config;
mod handle;
mod options;
mod reducer;
mod selector;
mod state;
mod store;

pub use config::StoreConfig;
pub use handle::{ReducerHandle, SelectorHandle};
pub use options::{Initializer, RegisterOptions};
pub use reducer::Reducer;
pub use selector::{EqualityFn, Selector};
pub use state::GlobalState;
pub use store::Store;
