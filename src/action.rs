//! Actions and the values action creators hand to a host store.
//!
//! An [`Action`] carries a human-readable type tag, a payload, and optional
//! [`ActionMeta`]. When metadata is present it is the authoritative routing
//! key; the type tag is a diagnostic that doubles as a fallback routing key
//! for transports that drop metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::payload::Payload;
use crate::state::RootState;
use crate::types::{Operation, Scope};

/// In-band routing metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMeta {
    pub is_prim_action: bool,
    pub namespace: String,
    /// Absent for raw actions, which name their own operation in the type tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updater_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
}

impl ActionMeta {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            is_prim_action: true,
            namespace: namespace.into(),
            updater_name: None,
            scope: None,
        }
    }

    #[must_use]
    pub fn with_updater(mut self, name: impl Into<String>) -> Self {
        self.updater_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: Option<Scope>) -> Self {
        self.scope = scope;
        self
    }

    pub fn operation(&self) -> Option<Operation> {
        self.updater_name.as_deref().map(Operation::from_name)
    }
}

/// Immutable action record.
///
/// ```rust
/// use prim_slice::action::{Action, ActionMeta};
/// use prim_slice::payload::Payload;
///
/// let foreign = Action::new("other", Payload::Absent).with_meta(ActionMeta::new("other"));
/// assert!(foreign.is_prim_action());
/// assert_eq!(foreign.type_tag(), "other");
/// ```
#[derive(Clone, Debug)]
pub struct Action {
    type_tag: String,
    payload: Payload,
    meta: Option<ActionMeta>,
}

impl Action {
    /// An action without metadata.
    pub fn new(type_tag: impl Into<String>, payload: impl Into<Payload>) -> Self {
        Self {
            type_tag: type_tag.into(),
            payload: payload.into(),
            meta: None,
        }
    }

    #[must_use]
    pub fn with_meta(mut self, meta: ActionMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Copy of this action as seen after a transport that drops metadata.
    #[must_use]
    pub fn without_meta(&self) -> Self {
        Self {
            type_tag: self.type_tag.clone(),
            payload: self.payload.clone(),
            meta: None,
        }
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn meta(&self) -> Option<&ActionMeta> {
        self.meta.as_ref()
    }

    pub fn scope(&self) -> Option<&Scope> {
        self.meta.as_ref().and_then(|m| m.scope.as_ref())
    }

    pub fn is_prim_action(&self) -> bool {
        self.meta.as_ref().is_some_and(|m| m.is_prim_action)
    }
}

/// What a thunk sees of the host store.
pub trait ThunkContext {
    fn dispatch(&mut self, dispatchable: Dispatchable);
    fn get_state(&self) -> &RootState;
}

/// Deferred callback run by the host store, never by this crate's factory.
pub type Thunk = Box<dyn FnOnce(&mut dyn ThunkContext) + Send>;

/// Anything an action creator may return.
pub enum Dispatchable {
    Action(Action),
    Thunk(Thunk),
}

impl Dispatchable {
    pub fn thunk<F>(f: F) -> Self
    where
        F: FnOnce(&mut dyn ThunkContext) + Send + 'static,
    {
        Dispatchable::Thunk(Box::new(f))
    }

    pub fn as_action(&self) -> Option<&Action> {
        match self {
            Dispatchable::Action(action) => Some(action),
            Dispatchable::Thunk(_) => None,
        }
    }
}

impl From<Action> for Dispatchable {
    fn from(action: Action) -> Self {
        Dispatchable::Action(action)
    }
}

impl fmt::Debug for Dispatchable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatchable::Action(action) => f.debug_tuple("Action").field(action).finish(),
            Dispatchable::Thunk(_) => f.write_str("Thunk(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_meta_serializes_camel_case() {
        let meta = ActionMeta::new("slice").with_updater("setState");
        assert_eq!(
            serde_json::to_value(&meta).unwrap(),
            json!({"isPrimAction": true, "namespace": "slice", "updaterName": "setState"})
        );
    }

    #[test]
    fn test_meta_scope_round_trip() {
        let meta = ActionMeta::new("wallet")
            .with_updater("mergeState")
            .with_scope(Some(Scope::from(9)));
        let back: ActionMeta = serde_json::from_value(serde_json::to_value(&meta).unwrap()).unwrap();
        assert_eq!(back, meta);
        assert_eq!(back.operation(), Some(Operation::Merge));
    }

    #[test]
    fn test_without_meta_keeps_type_and_payload() {
        let action = Action::new("@prim/a/setState/?x=1", json!({"x": 1}))
            .with_meta(ActionMeta::new("a").with_updater("setState"));
        let stripped = action.without_meta();
        assert!(stripped.meta().is_none());
        assert!(!stripped.is_prim_action());
        assert_eq!(stripped.type_tag(), action.type_tag());
        assert_eq!(stripped.payload().as_value(), Some(&json!({"x": 1})));
    }

    #[test]
    fn test_dispatchable_from_action() {
        let d: Dispatchable = Action::new("t", Payload::Absent).into();
        assert!(d.as_action().is_some());
        let t = Dispatchable::thunk(|_ctx| {});
        assert!(t.as_action().is_none());
        assert_eq!(format!("{t:?}"), "Thunk(..)");
    }
}
