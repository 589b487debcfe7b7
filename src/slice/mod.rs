//! Slice construction: the action factory, reducer, and selector for one
//! namespace.
//!
//! # Examples
//!
//! ```rust
//! use prim_slice::slice::SliceBuilder;
//! use serde_json::json;
//!
//! let todo = SliceBuilder::new("todo")
//!     .default_state_value(json!({"value1": "", "value2": 123}))
//!     .build(|updaters| updaters)
//!     .unwrap();
//!
//! let action = todo.actions().merge_state(json!({"value2": 456})).unwrap();
//! assert_eq!(action.type_tag(), "@prim/todo/mergeState/?value2=456");
//!
//! let next = todo.reducer().reduce(None, &action);
//! assert_eq!(serde_json::Value::Object((*next).clone()), json!({"value1": "", "value2": 456}));
//! ```

mod actions;
mod reducer;

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::debug;

pub use actions::{UpdaterActions, validate_payload};
pub use reducer::SliceReducer;

use crate::config::ProtocolConfig;
use crate::errors::{Result, SliceError};
use crate::identity::{TypeDecoder, segment_violation};
use crate::state::{DefaultState, RootState, SliceState, State, default_state_from};
use crate::types::Scope;
use crate::updaters::{Updater, UpdaterRegistry};

type Creator<A> = Arc<dyn Fn(UpdaterActions) -> A + Send + Sync>;

/// Extracts one slice's state from a root state keyed by namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    namespace: Arc<str>,
}

impl Selector {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn select(&self, root: &RootState) -> Option<SliceState> {
        root.get(&*self.namespace).cloned()
    }
}

/// The bundle of {actions, reducer, selector} for one namespace.
///
/// `A` is whatever the creator returned: typically a struct of action
/// creator methods built on top of [`UpdaterActions`].
pub struct Slice<A> {
    actions: A,
    reducer: SliceReducer,
    updaters: UpdaterActions,
    creator: Creator<A>,
}

impl<A> Slice<A> {
    pub fn namespace(&self) -> &str {
        self.reducer.namespace()
    }

    pub fn actions(&self) -> &A {
        &self.actions
    }

    /// Unscoped updater constructors bound to this slice.
    pub fn updaters(&self) -> &UpdaterActions {
        &self.updaters
    }

    /// Re-runs the creator with constructors bound to `scope`, so every
    /// action the returned set produces addresses that one instance.
    ///
    /// Fails with [`SliceError::InvalidScope`] when the slice decodes type
    /// tags and `scope` would not survive the round trip.
    pub fn scoped_actions(&self, scope: impl Into<Scope>) -> Result<A> {
        Ok((self.creator)(self.updaters.scoped(scope.into())?))
    }

    pub fn reducer(&self) -> &SliceReducer {
        &self.reducer
    }

    /// The reducer keyed by namespace, ready to merge into a host's table.
    pub fn reducers(&self) -> FxHashMap<String, SliceReducer> {
        let mut reducers = FxHashMap::default();
        reducers.insert(self.namespace().to_string(), self.reducer.clone());
        reducers
    }

    pub fn selector(&self) -> Selector {
        Selector {
            namespace: Arc::from(self.namespace()),
        }
    }

    pub fn select(&self, root: &RootState) -> Option<SliceState> {
        self.selector().select(root)
    }
}

impl<A> fmt::Debug for Slice<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slice")
            .field("namespace", &self.namespace())
            .field("reducer", &self.reducer)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Slice`]; the only required inputs are the namespace, a
/// default state, and the creator passed to [`build`](Self::build).
pub struct SliceBuilder {
    namespace: String,
    default_state: Option<DefaultState>,
    registry: Option<Arc<UpdaterRegistry>>,
    config: ProtocolConfig,
    custom_reducer: Option<Arc<dyn Updater>>,
}

impl SliceBuilder {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            default_state: None,
            registry: None,
            config: ProtocolConfig::default(),
            custom_reducer: None,
        }
    }

    #[must_use]
    pub fn default_state<F>(mut self, f: F) -> Self
    where
        F: Fn() -> State + Send + Sync + 'static,
    {
        self.default_state = Some(Arc::new(f));
        self
    }

    /// Default state given as a fixed JSON object.
    #[must_use]
    pub fn default_state_value(mut self, value: Value) -> Self {
        self.default_state = Some(default_state_from(value));
        self
    }

    /// Shares an extended registry. Without one the slice gets the three
    /// canonical updaters only.
    #[must_use]
    pub fn registry(mut self, registry: Arc<UpdaterRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub fn config(mut self, config: ProtocolConfig) -> Self {
        self.config = config;
        self
    }

    /// Reducer for raw actions and operations missing from the registry.
    #[must_use]
    pub fn custom_reducer<U>(mut self, reducer: U) -> Self
    where
        U: Updater + 'static,
    {
        self.custom_reducer = Some(Arc::new(reducer));
        self
    }

    /// Validates the configuration and runs `creator` once.
    pub fn build<A, F>(self, creator: F) -> Result<Slice<A>>
    where
        F: Fn(UpdaterActions) -> A + Send + Sync + 'static,
    {
        if self.namespace.trim().is_empty() {
            return Err(SliceError::MissingNamespace);
        }
        if self.config.decodes_type_tags()
            && let Some(reason) = segment_violation(&self.namespace)
        {
            return Err(SliceError::InvalidNamespace {
                namespace: self.namespace,
                reason,
            });
        }
        let Some(default_state) = self.default_state else {
            return Err(SliceError::MissingDefaultState {
                namespace: self.namespace,
            });
        };

        let registry = self.registry.unwrap_or_default();
        let config = Arc::new(self.config);
        let decoder = TypeDecoder::new(&config.type_prefix, &self.namespace)?;
        let namespace: Arc<str> = Arc::from(self.namespace);

        let updaters = UpdaterActions::new(Arc::clone(&namespace), Arc::clone(&registry), Arc::clone(&config));
        let reducer = SliceReducer::new(
            Arc::clone(&namespace),
            default_state,
            registry,
            self.custom_reducer,
            config,
            decoder,
        );

        let creator: Creator<A> = Arc::new(creator);
        let actions = creator(updaters.clone());
        debug!(namespace = %namespace, "slice created");

        Ok(Slice {
            actions,
            reducer,
            updaters,
            creator,
        })
    }
}

/// Builds a slice with the canonical registry and default configuration.
pub fn create_slice<A, D, F>(namespace: impl Into<String>, default_state: D, creator: F) -> Result<Slice<A>>
where
    D: Fn() -> State + Send + Sync + 'static,
    F: Fn(UpdaterActions) -> A + Send + Sync + 'static,
{
    SliceBuilder::new(namespace)
        .default_state(default_state)
        .build(creator)
}
