mod init_state;
mod merge_state;
mod set_state;
mod updater_registry;

use std::fmt;
use std::sync::Arc;

pub use init_state::InitState;
pub use merge_state::MergeState;
pub use set_state::SetState;
pub use updater_registry::*;

use crate::payload::Payload;
use crate::state::State;

/// Unified updater trait: every updater derives a new state from the current
/// state and an action payload. `default_state` yields a fresh default.
/// Implementations must not mutate their inputs.
pub trait Updater: Send + Sync {
    fn apply(&self, state: &State, payload: &Payload, default_state: &dyn Fn() -> State) -> State;
}

/// Adapter turning a closure into an [`Updater`].
pub struct UpdaterFn<F>(F);

/// Wraps a closure as an updater.
///
/// ```rust
/// use prim_slice::updaters::{Updater, updater_fn};
/// use prim_slice::payload::Payload;
/// use prim_slice::state::State;
/// use serde_json::json;
///
/// let clear = updater_fn(|_state, _payload, _defaults| State::new());
/// let state = json!({"a": 1}).as_object().unwrap().clone();
/// assert!(clear.apply(&state, &Payload::Absent, &State::new).is_empty());
/// ```
pub fn updater_fn<F>(f: F) -> UpdaterFn<F>
where
    F: Fn(&State, &Payload, &dyn Fn() -> State) -> State + Send + Sync,
{
    UpdaterFn(f)
}

impl<F> Updater for UpdaterFn<F>
where
    F: Fn(&State, &Payload, &dyn Fn() -> State) -> State + Send + Sync,
{
    fn apply(&self, state: &State, payload: &Payload, default_state: &dyn Fn() -> State) -> State {
        (self.0)(state, payload, default_state)
    }
}

/// Registry entry: one of the canonical updaters or a caller extension.
#[derive(Clone)]
pub enum UpdaterType {
    InitState(InitState),
    SetState(SetState),
    MergeState(MergeState),
    Custom(Arc<dyn Updater>),
}

impl UpdaterType {
    pub fn apply(&self, state: &State, payload: &Payload, default_state: &dyn Fn() -> State) -> State {
        match self {
            UpdaterType::InitState(u) => u.apply(state, payload, default_state),
            UpdaterType::SetState(u) => u.apply(state, payload, default_state),
            UpdaterType::MergeState(u) => u.apply(state, payload, default_state),
            UpdaterType::Custom(u) => u.apply(state, payload, default_state),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, UpdaterType::Custom(_))
    }
}

impl fmt::Debug for UpdaterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdaterType::InitState(_) => f.write_str("InitState"),
            UpdaterType::SetState(_) => f.write_str("SetState"),
            UpdaterType::MergeState(_) => f.write_str("MergeState"),
            UpdaterType::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
