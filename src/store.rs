//! Minimal synchronous host store.
//!
//! Combines slice reducers by namespace, runs every dispatched action
//! through all of them, executes thunks with itself as context, and
//! notifies subscribers when any slice state changed. It exists to host
//! slices in tests and the demo binary; production hosts plug
//! [`SliceReducer`]s into their own store.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, instrument, trace};

use crate::action::{Action, Dispatchable, ThunkContext};
use crate::errors::{Result, SliceError};
use crate::slice::{Slice, SliceReducer};
use crate::state::RootState;

type Listener = Box<dyn Fn(&RootState) + Send + Sync>;

/// Handle returned by [`Store::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct Store {
    reducers: FxHashMap<String, SliceReducer>,
    state: RootState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_listener: u64,
    version: u64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a slice's reducer and seeds its default state.
    pub fn with_slice<A>(mut self, slice: &Slice<A>) -> Result<Self> {
        self.add_reducer(slice.reducer().clone())?;
        Ok(self)
    }

    pub fn add_reducer(&mut self, reducer: SliceReducer) -> Result<()> {
        let namespace = reducer.namespace().to_string();
        if self.reducers.contains_key(&namespace) {
            return Err(SliceError::DuplicateNamespace { namespace });
        }
        self.state.insert(namespace.clone(), reducer.default_state());
        debug!(namespace = %namespace, "reducer installed");
        self.reducers.insert(namespace, reducer);
        Ok(())
    }

    pub fn state(&self) -> &RootState {
        &self.state
    }

    /// Bumped once per action that changed at least one slice.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&RootState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Runs an action through every reducer, or a thunk against this store.
    pub fn dispatch(&mut self, dispatchable: impl Into<Dispatchable>) {
        match dispatchable.into() {
            Dispatchable::Action(action) => {
                self.apply(&action);
            }
            Dispatchable::Thunk(thunk) => {
                let ctx: &mut dyn ThunkContext = self;
                thunk(ctx);
            }
        }
    }

    /// Applies `action` to every slice and returns the namespaces whose
    /// state changed, sorted.
    #[instrument(skip_all, fields(type_tag = action.type_tag()))]
    pub fn apply(&mut self, action: &Action) -> Vec<String> {
        let mut updated = Vec::new();
        for (namespace, reducer) in &self.reducers {
            let Some(current) = self.state.get_mut(namespace) else {
                continue;
            };
            let next = reducer.reduce(Some(&*current), action);
            if !Arc::ptr_eq(current, &next) {
                *current = next;
                updated.push(namespace.clone());
            }
        }

        if updated.is_empty() {
            trace!("no slice changed");
            return updated;
        }

        updated.sort();
        self.version = self.version.saturating_add(1);
        debug!(updated = ?updated, version = self.version, "state updated");
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
        updated
    }
}

impl ThunkContext for Store {
    fn dispatch(&mut self, dispatchable: Dispatchable) {
        Store::dispatch(self, dispatchable);
    }

    fn get_state(&self) -> &RootState {
        &self.state
    }
}
