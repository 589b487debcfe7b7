use super::Updater;
use crate::{payload::Payload, state::State, utils::json_ext::shallow_merge};

/// Shallow replace-merge. A function payload bypasses merging: its result
/// becomes the new state as-is.
#[derive(Debug, PartialEq, Clone, Copy, Hash, Eq)]
pub struct SetState;

impl Updater for SetState {
    fn apply(&self, state: &State, payload: &Payload, _default_state: &dyn Fn() -> State) -> State {
        match payload {
            Payload::Function(f) => f(state),
            other => match other.as_mapping() {
                Some(patch) => shallow_merge(state, patch),
                None => state.clone(),
            },
        }
    }
}
