use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::warn;

use super::{InitState, MergeState, SetState, Updater, UpdaterType};
use crate::types::{Operation, names};

/// Table of operation name -> updater.
///
/// Seeded with `initState`, `setState`, and `mergeState`. Hosts extend it
/// once at startup and hand it to every slice behind an `Arc`; a slice sees
/// exactly the table it was built with. Later registrations for a name
/// replace earlier ones and entries are never removed.
///
/// ```rust
/// use prim_slice::updaters::{UpdaterRegistry, updater_fn};
///
/// let mut registry = UpdaterRegistry::default();
/// registry.register("reset", updater_fn(|_state, _payload, defaults| defaults()));
/// assert!(registry.contains("reset"));
/// assert_eq!(registry.names(), ["initState", "mergeState", "reset", "setState"]);
/// ```
#[derive(Clone, Debug)]
pub struct UpdaterRegistry {
    updater_map: FxHashMap<String, UpdaterType>,
}

impl Default for UpdaterRegistry {
    fn default() -> Self {
        let mut updater_map: FxHashMap<String, UpdaterType> = FxHashMap::default();

        updater_map.insert(
            names::INIT_STATE.to_string(),
            UpdaterType::InitState(InitState),
        );
        updater_map.insert(
            names::SET_STATE.to_string(),
            UpdaterType::SetState(SetState),
        );
        updater_map.insert(
            names::MERGE_STATE.to_string(),
            UpdaterType::MergeState(MergeState),
        );

        UpdaterRegistry { updater_map }
    }
}

impl UpdaterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges caller-supplied updaters into the table; last write wins.
    pub fn extend_updaters<I, N>(&mut self, named_updaters: I)
    where
        I: IntoIterator<Item = (N, Arc<dyn Updater>)>,
        N: Into<String>,
    {
        for (name, updater) in named_updaters {
            let name = name.into();
            if names::CANONICAL.contains(&name.as_str()) {
                warn!(updater = %name, "extension replaces a canonical updater");
            }
            self.updater_map.insert(name, UpdaterType::Custom(updater));
        }
    }

    /// Registers a single updater.
    pub fn register<U>(&mut self, name: impl Into<String>, updater: U) -> &mut Self
    where
        U: Updater + 'static,
    {
        let entry: Arc<dyn Updater> = Arc::new(updater);
        self.extend_updaters([(name.into(), entry)]);
        self
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with_updater<U>(mut self, name: impl Into<String>, updater: U) -> Self
    where
        U: Updater + 'static,
    {
        self.register(name, updater);
        self
    }

    pub fn get(&self, name: &str) -> Option<&UpdaterType> {
        self.updater_map.get(name)
    }

    pub fn resolve(&self, operation: &Operation) -> Option<&UpdaterType> {
        self.get(operation.name())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.updater_map.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.updater_map.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.updater_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updater_map.is_empty()
    }
}
