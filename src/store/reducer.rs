use crate::action::Action;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

type ReducerFn = dyn Fn(&Value, &Action) -> Value + Send + Sync;

/// A pure state transition `(state, action) -> state`.
///
/// Identity is the shared allocation: clones of one `Reducer` are the same
/// reducer, two `Reducer::new` calls never are, even over the same function.
#[derive(Clone)]
pub struct Reducer(Arc<ReducerFn>);

impl Reducer {
    pub fn new<F>(reduce: F) -> Self
    where
        F: Fn(&Value, &Action) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(reduce))
    }

    pub fn same_as(&self, other: &Reducer) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn apply(&self, state: &Value, action: &Action) -> Value {
        (self.0)(state, action)
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reducer")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_follows_clones() {
        let reducer = Reducer::new(|state, _| state.clone());
        let clone = reducer.clone();
        let other = Reducer::new(|state, _| state.clone());

        assert!(reducer.same_as(&clone));
        assert!(!reducer.same_as(&other));
    }

    #[test]
    fn apply_runs_transition() {
        let reducer = Reducer::new(|state, action| match action.action_type() {
            "SET" => state.with("value", action.payload().cloned().unwrap_or_default()),
            _ => state.clone(),
        });
        let next = reducer.apply(&Value::map(), &Action::with_payload("SET", 3));
        assert_eq!(next.get("value"), Some(&Value::from(3)));
    }
}
