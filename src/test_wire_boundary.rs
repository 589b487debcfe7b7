use std::sync::Arc;

use serde_json::{Value, json};

use crate::action::Action;
use crate::config::{Addressing, ProtocolConfig};
use crate::identity::TypeDecoder;
use crate::slice::{Slice, SliceBuilder, UpdaterActions};
use crate::state::slice_state;
use crate::store::Store;
use crate::utils::json_ext::JsonSerializable;
use crate::wire::{WireAction, WireError};

fn session(addressing: Addressing) -> Slice<UpdaterActions> {
    SliceBuilder::new("session")
        .default_state_value(json!({"user": null, "theme": "light"}))
        .config(ProtocolConfig::default().with_addressing(addressing))
        .build(|updaters| updaters)
        .expect("session slice builds")
}

/// Serializes `action` and parses it back as a transport would.
fn transmit(action: &Action, keep_meta: bool) -> Action {
    let mut wire = action.to_wire().expect("serializable payload");
    if !keep_meta {
        wire = wire.without_meta();
    }
    let text = wire.to_json_string().expect("encodes");
    Action::from_wire(WireAction::from_json_str(&text).expect("decodes"))
}

#[test]
fn test_meta_survives_round_trip() {
    let slice = session(Addressing::MetaOnly);
    let action = slice
        .scoped_actions(7i64)
        .expect("valid scope")
        .merge_state(json!({"theme": "dark"}))
        .expect("valid");
    let received = transmit(&action, true);
    assert_eq!(received.type_tag(), action.type_tag());
    assert_eq!(received.meta(), action.meta());

    let state = slice.reducer().reduce(None, &received);
    assert_eq!(state.get("theme"), Some(&json!("dark")));
    assert_eq!(state.get("@signer"), Some(&json!(7)));
}

#[test]
fn test_dropped_meta_ignored_by_default() {
    let slice = session(Addressing::MetaOnly);
    let prior = slice_state(json!({"user": null, "theme": "light"}));
    let action = slice.actions().set_state(json!({"user": "ada"})).expect("valid");
    let received = transmit(&action, false);
    assert!(Arc::ptr_eq(&prior, &slice.reducer().reduce(Some(&prior), &received)));
}

#[test]
fn test_dropped_meta_recovered_from_type_tag() {
    let slice = session(Addressing::MetaOrTypeTag);
    let mut store = Store::new().with_slice(&slice).expect("store");

    let tab = slice.scoped_actions("tab-1").expect("valid scope");
    store.apply(&transmit(&tab.set_state(json!({"user": "ada"})).expect("valid"), false));
    let state = &store.state()["session"];
    assert_eq!(state.get("user"), Some(&json!("ada")));
    assert_eq!(state.get("@signer"), Some(&json!("tab-1")));

    let other = slice.scoped_actions("tab-2").expect("valid scope");
    let updated = store.apply(&transmit(&other.set_state(json!({"user": "eve"})).expect("valid"), false));
    assert!(updated.is_empty());
}

#[test]
fn test_hand_written_wire_action_routes_by_tag() {
    let slice = session(Addressing::MetaOrTypeTag);
    let wire: WireAction = serde_json::from_value(json!({
        "type": "@prim/session/mergeState/?theme=[String]",
        "payload": {"theme": "solarized"}
    }))
    .expect("valid wire action");
    let state = slice.reducer().reduce(None, &Action::from_wire(wire));
    assert_eq!(
        Value::Object((*state).clone()),
        json!({"user": null, "theme": "solarized"})
    );
}

#[test]
fn test_null_payload_decodes_as_absent() {
    let slice = session(Addressing::MetaOrTypeTag);
    let wire = WireAction::from_json_str(r#"{"type": "@prim/session/initState/?", "payload": null}"#)
        .expect("valid wire action");
    let action = Action::from_wire(wire);
    assert!(action.payload().is_absent());
    let prior = slice_state(json!({"user": "ada", "theme": "dark"}));
    let state = slice.reducer().reduce(Some(&prior), &action);
    assert_eq!(
        Value::Object((*state).clone()),
        json!({"user": null, "theme": "light"})
    );
}

#[test]
fn test_function_payload_stays_local() {
    let slice = session(Addressing::MetaOrTypeTag);
    let action = slice.actions().set_state_with(|state| state.clone());
    assert!(matches!(action.to_wire(), Err(WireError::FunctionPayload { .. })));
}

#[test]
fn test_metadata_and_decoded_tag_agree() {
    let slice = session(Addressing::MetaOrTypeTag);
    let decoder = TypeDecoder::new("@prim", "session").expect("pattern compiles");
    let scoped = slice.scoped_actions("tab-9").expect("valid scope");
    let actions = [
        slice.actions().init_state(json!({"user": "x"})).expect("valid"),
        slice.actions().set_state(json!({})).expect("valid"),
        scoped.merge_state(json!({"theme": "dark"})).expect("valid"),
        scoped.raw("LOGOUT", json!({"reason": "idle"})).expect("free kind"),
    ];
    for action in &actions {
        let meta = action.meta().expect("factory attaches meta");
        let decoded = decoder.decode(action.type_tag()).expect("tag decodes");
        assert_eq!(decoded.namespace, meta.namespace);
        assert_eq!(decoded.scope, meta.scope.as_ref().map(ToString::to_string));
        if let Some(name) = &meta.updater_name {
            assert_eq!(&decoded.operation, name);
            assert!(decoded.query.is_some());
        } else {
            assert_eq!(decoded.operation, "LOGOUT");
            assert!(decoded.query.is_none());
        }
    }
}
