use std::sync::Arc;
use std::sync::Mutex;

use serde_json::{Value, json};

use crate::action::{Action, ActionMeta, Dispatchable};
use crate::errors::Result;
use crate::payload::Payload;
use crate::slice::{SliceBuilder, UpdaterActions};
use crate::store::Store;
use crate::types::Scope;
use crate::updaters::{UpdaterRegistry, updater_fn};

struct TodoActions {
    updaters: UpdaterActions,
}

impl TodoActions {
    fn set_value1(&self, value: &str) -> Result<Action> {
        self.updaters.set_state(json!({"value1": value}))
    }

    fn bump_value2(&self) -> Action {
        self.updaters.set_state_with(|state| {
            let mut next = state.clone();
            let current = state.get("value2").and_then(Value::as_i64).unwrap_or(0);
            next.insert("value2".into(), json!(current + 1));
            next
        })
    }

    fn tag(&self, tag: &str) -> Result<Action> {
        self.updaters.updater("addTag", json!(tag))
    }

    fn reset(&self) -> Result<Action> {
        self.updaters.init_state(Payload::Absent)
    }

    fn tag_if_empty(&self, tag: &'static str) -> Dispatchable {
        let updaters = self.updaters.clone();
        Dispatchable::thunk(move |ctx| {
            let empty = ctx
                .get_state()
                .get(updaters.namespace())
                .and_then(|state| state.get("tags"))
                .and_then(Value::as_array)
                .is_none_or(Vec::is_empty);
            if empty && let Ok(action) = updaters.updater("addTag", json!(tag)) {
                ctx.dispatch(action.into());
            }
        })
    }
}

fn todo_store() -> (crate::slice::Slice<TodoActions>, Store) {
    let registry = UpdaterRegistry::default().with_updater(
        "addTag",
        updater_fn(|state, payload, _defaults| {
            let mut next = state.clone();
            let mut tags = state
                .get("tags")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            if let Some(tag) = payload.as_value() {
                tags.push(tag.clone());
            }
            next.insert("tags".into(), Value::Array(tags));
            next
        }),
    );
    let todo = SliceBuilder::new("todo")
        .default_state_value(json!({"value1": "", "value2": 123, "tags": []}))
        .registry(Arc::new(registry))
        .build(|updaters| TodoActions { updaters })
        .expect("todo slice builds");
    let store = Store::new().with_slice(&todo).expect("store accepts slice");
    (todo, store)
}

fn todo_value(store: &Store) -> Value {
    Value::Object((*store.state()["todo"]).clone())
}

#[test]
fn test_todo_scenario_through_store() {
    let (todo, mut store) = todo_store();
    let actions = todo.actions();

    store.dispatch(actions.set_value1("milk").expect("valid payload"));
    store.dispatch(actions.bump_value2());
    store.dispatch(actions.tag("home").expect("registered updater"));
    assert_eq!(
        todo_value(&store),
        json!({"value1": "milk", "value2": 124, "tags": ["home"]})
    );

    store.dispatch(actions.reset().expect("absent payload is valid"));
    assert_eq!(
        todo_value(&store),
        json!({"value1": "", "value2": 123, "tags": []})
    );
}

#[test]
fn test_merge_then_foreign_action_through_store() {
    let todo = SliceBuilder::new("todo")
        .default_state_value(json!({"value1": "", "value2": 123}))
        .build(|updaters| updaters)
        .expect("todo slice builds");
    let mut store = Store::new().with_slice(&todo).expect("store accepts slice");

    store.dispatch(todo.actions().merge_state(json!({"value2": 456})).expect("mapping"));
    assert_eq!(todo_value(&store), json!({"value1": "", "value2": 456}));

    let before = Arc::clone(&store.state()["todo"]);
    let version = store.version();
    store.dispatch(Action::new("other", Payload::Absent).with_meta(ActionMeta::new("other")));
    assert!(Arc::ptr_eq(&before, &store.state()["todo"]));
    assert_eq!(store.version(), version);
    assert_eq!(todo_value(&store), json!({"value1": "", "value2": 456}));
}

#[test]
fn test_thunk_consults_state_before_dispatching() {
    let (todo, mut store) = todo_store();
    store.dispatch(todo.actions().tag_if_empty("first"));
    store.dispatch(todo.actions().tag_if_empty("second"));
    assert_eq!(store.state()["todo"].get("tags"), Some(&json!(["first"])));
}

#[test]
fn test_two_slices_do_not_interfere() {
    let (todo, store) = todo_store();
    let settings = SliceBuilder::new("settings")
        .default_state_value(json!({"value1": "dark"}))
        .build(|updaters| updaters)
        .expect("settings slice builds");
    let mut store = store.with_slice(&settings).expect("distinct namespace");

    let before = Arc::clone(&store.state()["settings"]);
    let updated = store.apply(&todo.actions().set_value1("changed").expect("valid payload"));
    assert_eq!(updated, vec!["todo".to_string()]);
    assert!(Arc::ptr_eq(&before, &store.state()["settings"]));
    assert_eq!(store.state()["settings"].get("value1"), Some(&json!("dark")));
}

#[test]
fn test_scoped_slices_share_a_namespace_across_stores() {
    let wallet = SliceBuilder::new("wallet")
        .default_state_value(json!({"balance": 0}))
        .build(|updaters| updaters)
        .expect("wallet slice builds");
    let mut alice_store = Store::new().with_slice(&wallet).expect("store");
    let mut bob_store = Store::new().with_slice(&wallet).expect("store");

    let alice = wallet.scoped_actions("alice").expect("valid scope");
    let bob = wallet.scoped_actions("bob").expect("valid scope");
    let broadcast = [
        alice.init_state(Payload::Absent).expect("init"),
        bob.init_state(Payload::Absent).expect("init"),
    ];
    alice_store.apply(&broadcast[0]);
    bob_store.apply(&broadcast[1]);

    for action in [
        alice.merge_state(json!({"balance": 10})).expect("merge"),
        bob.merge_state(json!({"balance": 20})).expect("merge"),
    ] {
        alice_store.apply(&action);
        bob_store.apply(&action);
    }

    let alice_state = &alice_store.state()["wallet"];
    let bob_state = &bob_store.state()["wallet"];
    assert_eq!(alice_state.get("balance"), Some(&json!(10)));
    assert_eq!(bob_state.get("balance"), Some(&json!(20)));
    assert_eq!(wallet.reducer().bound_scope(alice_state), Some(Scope::from("alice")));
    assert_eq!(wallet.reducer().bound_scope(bob_state), Some(Scope::from("bob")));
}

#[test]
fn test_subscribers_see_each_change() {
    let (todo, mut store) = todo_store();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.subscribe(move |root| {
        if let Some(value) = root["todo"].get("value1").cloned()
            && let Ok(mut guard) = sink.lock()
        {
            guard.push(value);
        }
    });

    store.dispatch(todo.actions().set_value1("a").expect("valid"));
    store.dispatch(todo.actions().set_value1("b").expect("valid"));
    let seen = seen.lock().expect("not poisoned");
    assert_eq!(*seen, vec![json!("a"), json!("b")]);
}
