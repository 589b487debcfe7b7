//! Action payloads.
//!
//! A payload is either absent, a JSON value, or a state function (only
//! meaningful for `setState`). [`PayloadKind`] names the runtime kind of a
//! payload for type tags and validation errors without exposing contents.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::state::State;

/// Function payload for `setState`: its result replaces the state verbatim.
pub type StateFn = Arc<dyn Fn(&State) -> State + Send + Sync>;

#[derive(Clone, Default)]
pub enum Payload {
    /// No payload was supplied.
    #[default]
    Absent,
    Value(Value),
    Function(StateFn),
}

impl Payload {
    /// Wraps a state function.
    ///
    /// ```rust
    /// use prim_slice::payload::{Payload, PayloadKind};
    /// use prim_slice::state::State;
    ///
    /// let payload = Payload::function(|state: &State| state.clone());
    /// assert_eq!(payload.kind(), PayloadKind::Function);
    /// ```
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&State) -> State + Send + Sync + 'static,
    {
        Payload::Function(Arc::new(f))
    }

    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Absent => PayloadKind::Undefined,
            Payload::Value(v) => PayloadKind::of_value(v),
            Payload::Function(_) => PayloadKind::Function,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Payload::Absent)
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Payload::Function(_))
    }

    /// True for plain mappings (JSON objects).
    pub fn is_mapping(&self) -> bool {
        self.as_mapping().is_some()
    }

    pub fn as_mapping(&self) -> Option<&State> {
        match self {
            Payload::Value(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Payload::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Absent => f.write_str("Absent"),
            Payload::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Payload::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Value(value)
    }
}

impl From<State> for Payload {
    fn from(map: State) -> Self {
        Payload::Value(Value::Object(map))
    }
}

impl From<Option<Value>> for Payload {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Payload::Absent, Payload::Value)
    }
}

/// Runtime kind of a payload, named the way type tags render it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
    Function,
}

impl PayloadKind {
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::Null => PayloadKind::Null,
            Value::Bool(_) => PayloadKind::Boolean,
            Value::Number(_) => PayloadKind::Number,
            Value::String(_) => PayloadKind::String,
            Value::Array(_) => PayloadKind::Array,
            Value::Object(_) => PayloadKind::Object,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PayloadKind::Undefined => "Undefined",
            PayloadKind::Null => "Null",
            PayloadKind::Boolean => "Boolean",
            PayloadKind::Number => "Number",
            PayloadKind::String => "String",
            PayloadKind::Array => "Array",
            PayloadKind::Object => "Object",
            PayloadKind::Function => "Function",
        }
    }

    /// Bracketed tag used in type tags, e.g. `[Array]`.
    pub fn tag(self) -> String {
        format!("[{}]", self.name())
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_of_each_value() {
        assert_eq!(Payload::Absent.kind(), PayloadKind::Undefined);
        assert_eq!(Payload::from(json!(null)).kind(), PayloadKind::Null);
        assert_eq!(Payload::from(json!(true)).kind(), PayloadKind::Boolean);
        assert_eq!(Payload::from(json!(1.5)).kind(), PayloadKind::Number);
        assert_eq!(Payload::from(json!("s")).kind(), PayloadKind::String);
        assert_eq!(Payload::from(json!([])).kind(), PayloadKind::Array);
        assert_eq!(Payload::from(json!({})).kind(), PayloadKind::Object);
    }

    #[test]
    fn test_only_objects_are_mappings() {
        assert!(Payload::from(json!({"a": 1})).is_mapping());
        assert!(!Payload::from(json!([1])).is_mapping());
        assert!(!Payload::Absent.is_mapping());
        assert!(!Payload::function(|s: &State| s.clone()).is_mapping());
    }

    #[test]
    fn test_optional_value_conversion() {
        assert!(Payload::from(None::<Value>).is_absent());
        assert_eq!(
            Payload::from(Some(json!(3))).as_value(),
            Some(&json!(3))
        );
    }

    #[test]
    fn test_debug_hides_function_body() {
        let rendered = format!("{:?}", Payload::function(|s: &State| s.clone()));
        assert_eq!(rendered, "Function(..)");
    }
}
