//! Actions and action type bookkeeping.

mod action;
mod types;

pub use action::Action;
pub use types::ActionTypes;
