use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::action::Action;
use crate::config::ProtocolConfig;
use crate::identity::TypeDecoder;
use crate::payload::Payload;
use crate::state::{DefaultState, SliceState, State};
use crate::types::{Operation, Scope};
use crate::updaters::{Updater, UpdaterRegistry, UpdaterType};

/// Pure `(state, action) -> state` function bound to one namespace.
///
/// Ignored actions return the incoming `Arc` untouched, so "unchanged"
/// is observable with [`Arc::ptr_eq`]. Accepted actions always produce a
/// freshly built state.
#[derive(Clone)]
pub struct SliceReducer {
    namespace: Arc<str>,
    default_state: DefaultState,
    registry: Arc<UpdaterRegistry>,
    custom: Option<Arc<dyn Updater>>,
    config: Arc<ProtocolConfig>,
    decoder: Arc<TypeDecoder>,
}

/// Target recovered from an action addressed to this slice.
struct Route {
    operation: Option<Operation>,
    scope: Option<Scope>,
}

enum Target<'a> {
    Registered(&'a UpdaterType),
    Custom(&'a dyn Updater),
}

impl Target<'_> {
    fn apply(&self, state: &State, payload: &Payload, default_state: &dyn Fn() -> State) -> State {
        match self {
            Target::Registered(updater) => updater.apply(state, payload, default_state),
            Target::Custom(updater) => updater.apply(state, payload, default_state),
        }
    }
}

impl SliceReducer {
    pub(crate) fn new(
        namespace: Arc<str>,
        default_state: DefaultState,
        registry: Arc<UpdaterRegistry>,
        custom: Option<Arc<dyn Updater>>,
        config: Arc<ProtocolConfig>,
        decoder: TypeDecoder,
    ) -> Self {
        Self {
            namespace,
            default_state,
            registry,
            custom,
            config,
            decoder: Arc::new(decoder),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// State used when the host has none for this slice yet.
    pub fn default_state(&self) -> SliceState {
        Arc::new((self.default_state)())
    }

    /// Scope bound to `state`, if any.
    pub fn bound_scope(&self, state: &State) -> Option<Scope> {
        state.get(&self.config.scope_field).and_then(Scope::from_value)
    }

    pub fn reduce(&self, state: Option<&SliceState>, action: &Action) -> SliceState {
        let current = match state {
            Some(state) => Arc::clone(state),
            None => self.default_state(),
        };

        let Some(route) = self.route(action) else {
            trace!(namespace = %self.namespace, type_tag = action.type_tag(), "action not addressed to slice");
            return current;
        };

        let target = match route.operation.as_ref().and_then(|op| self.registry.resolve(op)) {
            Some(updater) => Target::Registered(updater),
            None => match self.custom.as_deref() {
                Some(custom) => Target::Custom(custom),
                None => {
                    trace!(
                        namespace = %self.namespace,
                        type_tag = action.type_tag(),
                        "unknown operation and no custom reducer"
                    );
                    return current;
                }
            },
        };

        let is_init = route.operation == Some(Operation::Init);
        let bound = self.bound_scope(&current);
        if !is_init
            && let Some(bound) = &bound
            && !route.scope.as_ref().is_some_and(|s| s.same_instance(bound))
        {
            trace!(
                namespace = %self.namespace,
                bound = %bound,
                "action scope does not match bound scope"
            );
            return current;
        }

        debug!(
            namespace = %self.namespace,
            operation = route.operation.as_ref().map_or("<custom>", Operation::name),
            scope = ?route.scope,
            "applying action"
        );

        let default_state = || (self.default_state)();
        let next = if is_init {
            let payload = self.init_payload(action.payload(), route.scope.as_ref());
            target.apply(&current, &payload, &default_state)
        } else {
            let mut next = target.apply(&current, action.payload(), &default_state);
            // the marker is owned by the reducer, not by updaters
            if let Some(scope) = bound.or(route.scope) {
                next.insert(self.config.scope_field.clone(), scope.to_value());
            }
            next
        };
        Arc::new(next)
    }

    fn route(&self, action: &Action) -> Option<Route> {
        match action.meta() {
            Some(meta) => {
                if !meta.is_prim_action || meta.namespace.as_str() != &*self.namespace {
                    return None;
                }
                // no updater name marks a raw action for the custom reducer
                Some(Route {
                    operation: meta.operation(),
                    scope: meta.scope.clone(),
                })
            }
            None if self.config.decodes_type_tags() => {
                let decoded = self.decoder.decode(action.type_tag())?;
                Some(Route {
                    operation: Some(Operation::from_name(&decoded.operation)),
                    scope: decoded.scope(),
                })
            }
            None => None,
        }
    }

    /// `initState` payload with the scope marker merged in (or stripped when
    /// the action is unscoped, which unbinds the slice).
    fn init_payload(&self, payload: &Payload, scope: Option<&Scope>) -> Payload {
        let field = self.config.scope_field.as_str();
        let mut map: State = payload
            .as_mapping()
            .map(|m| {
                m.iter()
                    .filter(|(key, _)| key.as_str() != field)
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();
        if let Some(scope) = scope {
            map.insert(field.to_string(), scope.to_value());
        }
        Payload::Value(Value::Object(map))
    }
}

impl fmt::Debug for SliceReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliceReducer")
            .field("namespace", &self.namespace)
            .field("updaters", &self.registry.names())
            .field("custom", &self.custom.is_some())
            .field("config", &self.config)
            .finish()
    }
}
