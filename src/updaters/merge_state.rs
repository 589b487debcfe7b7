use super::Updater;
use crate::{payload::Payload, state::State, utils::json_ext::merge_one_level};

/// One-level-deep merge: nested mappings on both sides are merged, any
/// other value at a key is replaced.
#[derive(Debug, PartialEq, Clone, Copy, Hash, Eq)]
pub struct MergeState;

impl Updater for MergeState {
    fn apply(&self, state: &State, payload: &Payload, _default_state: &dyn Fn() -> State) -> State {
        match payload.as_mapping() {
            Some(patch) => merge_one_level(state, patch),
            None => state.clone(),
        }
    }
}
