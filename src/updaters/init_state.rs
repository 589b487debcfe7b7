use super::Updater;
use crate::{payload::Payload, state::State, utils::json_ext::shallow_merge};

/// Discards the current state and rebuilds it from the defaults, with the
/// payload's keys layered on top. Non-mapping payloads add nothing.
#[derive(Debug, PartialEq, Clone, Copy, Hash, Eq)]
pub struct InitState;

impl Updater for InitState {
    fn apply(&self, _state: &State, payload: &Payload, default_state: &dyn Fn() -> State) -> State {
        let defaults = default_state();
        match payload.as_mapping() {
            Some(overrides) => shallow_merge(&defaults, overrides),
            None => defaults,
        }
    }
}
