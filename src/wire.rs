//! Serializable form of an action for crossing process or storage boundaries.
//!
//! Only `type` and a JSON `payload` are guaranteed to survive. `meta` is
//! carried when the transport allows it; when it is dropped, reducers
//! configured with [`Addressing::MetaOrTypeTag`](crate::config::Addressing)
//! route by decoding the type tag.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::action::{Action, ActionMeta};
use crate::payload::Payload;
use crate::utils::json_ext::JsonSerializable;

#[derive(Debug, Error, Diagnostic)]
pub enum WireError {
    #[error("action '{type_tag}' carries a function payload and cannot be serialized")]
    #[diagnostic(
        code(prim_slice::wire::function_payload),
        help("Send a mapping payload instead of a state function across the boundary.")
    )]
    FunctionPayload { type_tag: String },

    #[error("JSON serialization/deserialization failed: {source}")]
    #[diagnostic(code(prim_slice::wire::serde))]
    Serde {
        #[from]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireAction {
    #[serde(rename = "type")]
    pub type_tag: String,
    /// `null` and a missing payload both decode as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ActionMeta>,
}

impl WireAction {
    /// Models a transport that only preserves `type` and `payload`.
    #[must_use]
    pub fn without_meta(mut self) -> Self {
        self.meta = None;
        self
    }
}

impl JsonSerializable<WireError> for WireAction {
    fn to_json_string(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }

    fn from_json_str(s: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(s)?)
    }
}

impl TryFrom<&Action> for WireAction {
    type Error = WireError;

    fn try_from(action: &Action) -> Result<Self, WireError> {
        let payload = match action.payload() {
            Payload::Absent => None,
            Payload::Value(value) => Some(value.clone()),
            Payload::Function(_) => {
                return Err(WireError::FunctionPayload {
                    type_tag: action.type_tag().to_string(),
                });
            }
        };
        Ok(WireAction {
            type_tag: action.type_tag().to_string(),
            payload,
            meta: action.meta().cloned(),
        })
    }
}

impl From<WireAction> for Action {
    fn from(wire: WireAction) -> Self {
        let action = Action::new(wire.type_tag, Payload::from(wire.payload));
        match wire.meta {
            Some(meta) => action.with_meta(meta),
            None => action,
        }
    }
}

impl Action {
    pub fn to_wire(&self) -> Result<WireAction, WireError> {
        WireAction::try_from(self)
    }

    pub fn from_wire(wire: WireAction) -> Self {
        Action::from(wire)
    }
}
