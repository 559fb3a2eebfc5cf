//! Dynamic state values and the equality rules used to gate notifications.
//!
//! Reducers produce [`Value`]s and selectors derive them. Whether a change is
//! visible is decided by [`shallow_equal`] (reducers) or a per-selector
//! comparator defaulting to [`identical`].

mod equality;
mod value;

pub use equality::{identical, shallow_equal};
pub use value::{Map, Value};
