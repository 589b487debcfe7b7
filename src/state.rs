//! State shapes owned by slices and by the host store.
//!
//! A slice's state is an insertion-ordered JSON mapping. Reducers never
//! mutate a state value in place; each accepted action yields a fresh
//! [`SliceState`], and an ignored action hands back the very same `Arc`,
//! so callers can detect "unchanged" with [`Arc::ptr_eq`].
//!
//! ```rust
//! use prim_slice::state::{slice_state, State};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let state = slice_state(json!({"value1": "", "value2": 123}));
//! let same = Arc::clone(&state);
//! assert!(Arc::ptr_eq(&state, &same));
//! assert_eq!(state.get("value2"), Some(&json!(123)));
//! ```

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde_json::{Map, Value};

/// Plain mapping held by one slice.
pub type State = Map<String, Value>;

/// Shared, immutable handle to one slice's state.
pub type SliceState = Arc<State>;

/// Root state of a host store, keyed by namespace.
pub type RootState = FxHashMap<String, SliceState>;

/// Produces the state a slice starts from (and `initState` resets to).
pub type DefaultState = Arc<dyn Fn() -> State + Send + Sync>;

/// Wraps a JSON value as slice state. Non-object values yield an empty state.
pub fn slice_state(value: Value) -> SliceState {
    match value {
        Value::Object(map) => Arc::new(map),
        _ => Arc::new(State::new()),
    }
}

/// Builds a [`DefaultState`] from a fixed JSON object.
pub fn default_state_from(value: Value) -> DefaultState {
    let template = match value {
        Value::Object(map) => map,
        _ => State::new(),
    };
    Arc::new(move || template.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slice_state_from_object() {
        let state = slice_state(json!({"a": 1, "b": {"c": 2}}));
        assert_eq!(state.len(), 2);
        assert_eq!(state.get("b"), Some(&json!({"c": 2})));
    }

    #[test]
    fn test_slice_state_from_non_object_is_empty() {
        assert!(slice_state(json!([1, 2])).is_empty());
        assert!(slice_state(Value::Null).is_empty());
    }

    #[test]
    fn test_default_state_yields_independent_copies() {
        let defaults = default_state_from(json!({"p": "", "q": 1}));
        let mut first = defaults();
        first.insert("p".into(), json!("changed"));
        let second = defaults();
        assert_eq!(second.get("p"), Some(&json!("")));
    }
}
