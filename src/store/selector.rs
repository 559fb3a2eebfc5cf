use super::GlobalState;
use crate::value::{identical, shallow_equal, Value};
use std::fmt;
use std::sync::Arc;

type SelectFn = dyn Fn(&GlobalState) -> Value + Send + Sync;
type CompareFn = dyn Fn(&Value, &Value) -> bool + Send + Sync;

/// Comparator deciding whether a selector's result changed.
#[derive(Clone)]
pub struct EqualityFn(Arc<CompareFn>);

impl EqualityFn {
    pub fn new<F>(eq: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(eq))
    }

    /// Reference equality, the default.
    pub fn identical() -> Self {
        Self::new(identical)
    }

    pub fn shallow() -> Self {
        Self::new(shallow_equal)
    }

    /// Full structural equality.
    pub fn deep() -> Self {
        Self::new(|a, b| a == b)
    }

    pub fn equal(&self, a: &Value, b: &Value) -> bool {
        (self.0)(a, b)
    }
}

impl Default for EqualityFn {
    fn default() -> Self {
        Self::identical()
    }
}

/// A derivation over the global state, paired with its comparator.
#[derive(Clone)]
pub struct Selector {
    select: Arc<SelectFn>,
    equality: EqualityFn,
}

impl Selector {
    pub fn new<F>(select: F) -> Self
    where
        F: Fn(&GlobalState) -> Value + Send + Sync + 'static,
    {
        Self {
            select: Arc::new(select),
            equality: EqualityFn::default(),
        }
    }

    /// Select the value at `reducer.key.key...`, `Null` when absent.
    pub fn path<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        Self::new(move |state| {
            let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
            state.path(&keys).cloned().unwrap_or_default()
        })
    }

    /// Replace the comparator.
    pub fn with_equality(mut self, equality: EqualityFn) -> Self {
        self.equality = equality;
        self
    }

    pub fn select(&self, state: &GlobalState) -> Value {
        (self.select)(state)
    }

    pub fn changed(&self, previous: &Value, next: &Value) -> bool {
        !self.equality.equal(previous, next)
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state() -> GlobalState {
        let mut state = GlobalState::default();
        state.insert("parent", Value::from(json!({ "value": "Hello Parent!" })));
        state
    }

    #[test]
    fn path_selects_nested_value() {
        let selector = Selector::path(["parent", "value"]);
        assert_eq!(selector.select(&state()), Value::from("Hello Parent!"));
        assert_eq!(Selector::path(["child", "value"]).select(&state()), Value::Null);
    }

    #[test]
    fn default_comparator_is_identity() {
        let selector = Selector::new(|_| Value::Null);
        let a = Value::from(json!({ "x": 1 }));
        let b = Value::from(json!({ "x": 1 }));
        assert!(selector.changed(&a, &b));
        assert!(!selector.changed(&a, &a.clone()));
    }

    #[test]
    fn custom_comparator_replaces_default() {
        let selector = Selector::new(|_| Value::Null).with_equality(EqualityFn::deep());
        let a = Value::from(json!({ "x": { "y": 1 } }));
        let b = Value::from(json!({ "x": { "y": 1 } }));
        assert!(!selector.changed(&a, &b));
        assert!(EqualityFn::shallow().equal(&Value::from(1), &Value::from(1)));
    }
}
