use super::Value;
use std::sync::Arc;

/// Identity comparison.
///
/// Scalars and strings are identical when equal. Lists and maps are identical
/// only when they share one allocation, regardless of their contents.
pub fn identical(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::List(x), Value::List(y)) => Arc::ptr_eq(x, y),
        (Value::Map(x), Value::Map(y)) => Arc::ptr_eq(x, y),
        (Value::List(_) | Value::Map(_), _) | (_, Value::List(_) | Value::Map(_)) => false,
        // NaN is never identical to itself, matching float semantics.
        _ => a == b,
    }
}

/// First-level structural comparison.
///
/// Identical values are equal. Otherwise both sides must be composites of the
/// same kind with the same number of entries, and every top-level value must
/// be [`identical`] to its counterpart. Nested structures are not descended
/// into.
pub fn shallow_equal(a: &Value, b: &Value) -> bool {
    if identical(a, b) {
        return true;
    }
    match (a, b) {
        (Value::Map(x), Value::Map(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(key, left)| y.get(key).is_some_and(|right| identical(left, right)))
        }
        (Value::List(x), Value::List(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(l, r)| identical(l, r))
        }
        _ => false,
    }
}
