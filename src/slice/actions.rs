use std::sync::Arc;

use crate::action::{Action, ActionMeta};
use crate::config::ProtocolConfig;
use crate::errors::{Result, SliceError};
use crate::identity::{encode_raw_type, encode_type, segment_violation};
use crate::payload::Payload;
use crate::state::State;
use crate::types::{Operation, Scope};
use crate::updaters::UpdaterRegistry;

/// Updater action constructors bound to one namespace (and optionally one
/// scope). Handed to a slice's creator so custom action creators never
/// spell out namespaces or type tags themselves.
///
/// Canonical constructors validate their payload before the action exists:
///
/// ```rust
/// use prim_slice::slice::create_slice;
/// use prim_slice::state::State;
/// use serde_json::json;
///
/// let slice = create_slice("slice", State::new, |updaters| updaters).unwrap();
/// let err = slice.actions().set_state(json!(123)).unwrap_err();
/// assert_eq!(err.to_string(), "Unexpected setState payload type [object Number]");
/// ```
#[derive(Clone, Debug)]
pub struct UpdaterActions {
    namespace: Arc<str>,
    scope: Option<Scope>,
    registry: Arc<UpdaterRegistry>,
    config: Arc<ProtocolConfig>,
}

impl UpdaterActions {
    pub(crate) fn new(
        namespace: Arc<str>,
        registry: Arc<UpdaterRegistry>,
        config: Arc<ProtocolConfig>,
    ) -> Self {
        Self {
            namespace,
            scope: None,
            registry,
            config,
        }
    }

    /// Same constructors, every action now carrying `scope`.
    ///
    /// When the slice decodes type tags the scope must come back out of the
    /// tag unchanged, which rules out symbols and segments that are empty
    /// or hold `/` or `?`.
    pub fn scoped(&self, scope: Scope) -> Result<Self> {
        if self.config.decodes_type_tags() {
            let violation = match &scope {
                Scope::Symbol(_) => Some("symbol scopes cannot be recovered from a type tag"),
                other => segment_violation(&other.to_string()),
            };
            if let Some(reason) = violation {
                return Err(SliceError::InvalidScope {
                    namespace: self.namespace.to_string(),
                    scope: scope.to_string(),
                    reason,
                });
            }
        }
        Ok(Self {
            scope: Some(scope),
            ..self.clone()
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    /// One constructor exists per registered name.
    pub fn updater_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// `initState`: accepts an absent payload or a mapping.
    pub fn init_state(&self, payload: impl Into<Payload>) -> Result<Action> {
        self.create(Operation::Init, payload.into(), None)
    }

    pub fn init_state_with_intent(
        &self,
        payload: impl Into<Payload>,
        intent: &str,
    ) -> Result<Action> {
        self.create(Operation::Init, payload.into(), Some(intent))
    }

    /// `setState`: accepts a mapping or a state function.
    pub fn set_state(&self, payload: impl Into<Payload>) -> Result<Action> {
        self.create(Operation::Set, payload.into(), None)
    }

    pub fn set_state_with_intent(
        &self,
        payload: impl Into<Payload>,
        intent: &str,
    ) -> Result<Action> {
        self.create(Operation::Set, payload.into(), Some(intent))
    }

    /// `setState` with a state function; cannot fail validation.
    pub fn set_state_with<F>(&self, f: F) -> Action
    where
        F: Fn(&State) -> State + Send + Sync + 'static,
    {
        self.build(&Operation::Set, Payload::function(f), None)
    }

    /// `mergeState`: accepts a mapping.
    pub fn merge_state(&self, payload: impl Into<Payload>) -> Result<Action> {
        self.create(Operation::Merge, payload.into(), None)
    }

    /// `mergeState` whose type tag carries `intent` instead of the payload
    /// summary.
    pub fn merge_state_with_intent(
        &self,
        payload: impl Into<Payload>,
        intent: &str,
    ) -> Result<Action> {
        self.create(Operation::Merge, payload.into(), Some(intent))
    }

    /// Action for any registered updater, canonical or custom.
    pub fn updater(&self, name: &str, payload: impl Into<Payload>) -> Result<Action> {
        self.updater_with_intent(name, payload, None)
    }

    /// Like [`updater`](Self::updater), with `intent` replacing the query
    /// part of the type tag.
    pub fn updater_with_intent(
        &self,
        name: &str,
        payload: impl Into<Payload>,
        intent: Option<&str>,
    ) -> Result<Action> {
        let operation = Operation::from_name(name);
        if !operation.is_canonical() && !self.registry.contains(name) {
            return Err(SliceError::UnknownUpdater {
                namespace: self.namespace.to_string(),
                name: name.to_string(),
            });
        }
        self.create(operation, payload.into(), intent)
    }

    /// Raw action routed to the slice's custom reducer. `kind` takes the
    /// place of the updater name in the type tag and metadata carries no
    /// updater name.
    ///
    /// A kind naming a registered updater is refused, since a decoded tag
    /// would route it to that updater instead.
    pub fn raw(&self, kind: &str, payload: impl Into<Payload>) -> Result<Action> {
        if Operation::from_name(kind).is_canonical() || self.registry.contains(kind) {
            return Err(SliceError::ReservedRawKind {
                namespace: self.namespace.to_string(),
                kind: kind.to_string(),
            });
        }
        if self.config.decodes_type_tags()
            && let Some(reason) = segment_violation(kind)
        {
            return Err(SliceError::InvalidRawKind {
                namespace: self.namespace.to_string(),
                kind: kind.to_string(),
                reason,
            });
        }
        let type_tag = encode_raw_type(
            &self.config.type_prefix,
            &self.namespace,
            self.scope.as_ref(),
            kind,
        );
        Ok(Action::new(type_tag, payload).with_meta(self.meta()))
    }

    fn create(&self, operation: Operation, payload: Payload, intent: Option<&str>) -> Result<Action> {
        validate_payload(&operation, &payload)?;
        Ok(self.build(&operation, payload, intent))
    }

    fn build(&self, operation: &Operation, payload: Payload, intent: Option<&str>) -> Action {
        let type_tag = encode_type(
            &self.config.type_prefix,
            &self.namespace,
            self.scope.as_ref(),
            operation.name(),
            &payload,
            intent,
        );
        Action::new(type_tag, payload).with_meta(self.meta().with_updater(operation.name()))
    }

    fn meta(&self) -> ActionMeta {
        ActionMeta::new(&*self.namespace).with_scope(self.scope.clone())
    }
}

/// Checks a payload against the kinds a canonical operation accepts.
/// Custom operations accept anything.
pub fn validate_payload(operation: &Operation, payload: &Payload) -> Result<()> {
    let accepted = match operation {
        Operation::Init => payload.is_absent() || payload.is_mapping(),
        Operation::Set => payload.is_mapping() || payload.is_function(),
        Operation::Merge => payload.is_mapping(),
        Operation::Custom(_) => true,
    };
    if accepted {
        Ok(())
    } else {
        Err(SliceError::UnexpectedPayload {
            operation: operation.name().to_string(),
            kind: payload.kind(),
        })
    }
}
