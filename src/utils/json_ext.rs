//! JSON helpers behind the canonical updaters.
//!
//! Every helper builds a new mapping; inputs are borrowed and never touched.

use serde_json::Value;

use crate::state::State;

/// Trait for types that round-trip through JSON text.
pub trait JsonSerializable<E>: Sized {
    fn to_json_string(&self) -> Result<String, E>;
    fn from_json_str(s: &str) -> Result<Self, E>;
}

/// Copies `base` and overlays every key of `over` (keys in `over` win).
///
/// ```rust
/// use prim_slice::utils::json_ext::shallow_merge;
/// use serde_json::json;
///
/// let base = json!({"a": 1, "b": {"x": 1}}).as_object().unwrap().clone();
/// let over = json!({"b": {"y": 2}, "c": 3}).as_object().unwrap().clone();
/// let merged = shallow_merge(&base, &over);
/// assert_eq!(serde_json::Value::Object(merged), json!({"a": 1, "b": {"y": 2}, "c": 3}));
/// ```
#[must_use]
pub fn shallow_merge(base: &State, over: &State) -> State {
    let mut result = base.clone();
    for (key, value) in over {
        result.insert(key.clone(), value.clone());
    }
    result
}

/// Like [`shallow_merge`], but when both sides hold a mapping at the same
/// key those two mappings are shallow-merged instead of replaced.
/// Anything deeper than one level is replaced wholesale.
///
/// ```rust
/// use prim_slice::utils::json_ext::merge_one_level;
/// use serde_json::json;
///
/// let base = json!({"k": {"b": 2, "n": {"x": 1}}}).as_object().unwrap().clone();
/// let over = json!({"k": {"a": 1, "n": {"y": 2}}}).as_object().unwrap().clone();
/// let merged = merge_one_level(&base, &over);
/// assert_eq!(
///     serde_json::Value::Object(merged),
///     json!({"k": {"b": 2, "n": {"y": 2}, "a": 1}})
/// );
/// ```
#[must_use]
pub fn merge_one_level(base: &State, over: &State) -> State {
    let mut result = base.clone();
    for (key, incoming) in over {
        let merged = match (result.get(key), incoming) {
            (Some(Value::Object(current)), Value::Object(patch)) => {
                Value::Object(shallow_merge(current, patch))
            }
            _ => incoming.clone(),
        };
        result.insert(key.clone(), merged);
    }
    result
}
