use std::sync::Arc;

use miette::{IntoDiagnostic, Result};
use prim_slice::{
    Action, Addressing, Dispatchable, Payload, ProtocolConfig, Scope, SliceBuilder, Store,
    UpdaterActions, UpdaterRegistry, updater_fn, utils::json_ext::JsonSerializable,
    wire::WireAction,
};
use serde_json::{Value, json};
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn init_tracing() {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,prim_slice=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();
}

fn init_miette() {
    miette::set_panic_hook();
}

/// Action creators of the todo demo slice.
struct TodoActions {
    updaters: UpdaterActions,
}

impl TodoActions {
    fn add(&self, item: &str) -> prim_slice::errors::Result<Action> {
        self.updaters.updater("pushItem", json!(item))
    }

    fn rename(&self, title: &str) -> prim_slice::errors::Result<Action> {
        self.updaters.merge_state(json!({"meta": {"title": title}}))
    }

    fn reset(&self) -> prim_slice::errors::Result<Action> {
        self.updaters.init_state(Payload::Absent)
    }

    /// Adds every item in `items` that is not already on the list.
    fn add_missing(&self, items: Vec<String>) -> Dispatchable {
        let updaters = self.updaters.clone();
        Dispatchable::thunk(move |ctx| {
            let namespace = updaters.namespace().to_string();
            let present: Vec<Value> = ctx
                .get_state()
                .get(&namespace)
                .and_then(|state| state.get("items"))
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            for item in items {
                if present.contains(&json!(item)) {
                    continue;
                }
                match updaters.updater("pushItem", json!(item)) {
                    Ok(action) => ctx.dispatch(action.into()),
                    Err(err) => tracing::warn!(error = %err, "skipping item"),
                }
            }
        })
    }
}

fn todo_registry() -> Arc<UpdaterRegistry> {
    let registry = UpdaterRegistry::default().with_updater(
        "pushItem",
        updater_fn(|state, payload, _defaults| {
            let mut next = state.clone();
            let mut items = next
                .get("items")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            if let Some(item) = payload.as_value() {
                items.push(item.clone());
            }
            next.insert("items".into(), Value::Array(items));
            next
        }),
    );
    Arc::new(registry)
}

fn print_state(store: &Store, namespace: &str) {
    if let Some(state) = store.state().get(namespace) {
        println!("  {namespace} = {}", Value::Object((**state).clone()));
    }
}

fn run_todo() -> Result<()> {
    let todo = SliceBuilder::new("todo")
        .default_state_value(json!({"items": [], "meta": {"title": "", "owner": "me"}}))
        .registry(todo_registry())
        .build(|updaters| TodoActions { updaters })?;

    let mut store = Store::new().with_slice(&todo)?;
    store.subscribe(|root| info!(slices = root.len(), "store changed"));

    let actions = todo.actions();
    for action in [actions.add("milk")?, actions.rename("groceries")?] {
        println!("dispatch {}", action.type_tag());
        store.dispatch(action);
    }
    print_state(&store, "todo");

    println!("dispatch thunk add_missing");
    store.dispatch(actions.add_missing(vec!["milk".into(), "eggs".into()]));
    print_state(&store, "todo");

    let reset = actions.reset()?;
    println!("dispatch {}", reset.type_tag());
    store.dispatch(reset);
    print_state(&store, "todo");
    Ok(())
}

fn run_scoped() -> Result<()> {
    let wallet = SliceBuilder::new("wallet")
        .default_state_value(json!({"balance": 0}))
        .build(|updaters| updaters)?;
    let mut store = Store::new().with_slice(&wallet)?;

    let alice = wallet.scoped_actions("alice")?;
    let bob = wallet.scoped_actions(Scope::from("bob"))?;

    for action in [
        alice.set_state(json!({"balance": 10}))?,
        bob.set_state(json!({"balance": 99}))?,
        bob.init_state(json!({"balance": 1}))?,
        alice.merge_state(json!({"balance": 11}))?,
    ] {
        let updated = store.apply(&action);
        println!("apply {} -> updated {:?}", action.type_tag(), updated);
        print_state(&store, "wallet");
    }
    Ok(())
}

fn run_wire() -> Result<()> {
    let config = ProtocolConfig::default().with_addressing(Addressing::MetaOrTypeTag);
    let session = SliceBuilder::new("session")
        .default_state_value(json!({"user": null}))
        .config(config)
        .build(|updaters| updaters)?;
    let mut store = Store::new().with_slice(&session)?;

    let action = session.scoped_actions("tab-1")?.set_state(json!({"user": "ada"}))?;
    let text = action.to_wire()?.without_meta().to_json_string()?;
    println!("sent {text}");

    let received = Action::from_wire(WireAction::from_json_str(&text)?);
    let updated = store.apply(&received);
    println!("received without meta -> updated {updated:?}");
    print_state(&store, "session");

    let raw: WireAction = serde_json::from_str(r#"{"type": "@prim/session/tab-2/setState/?user=[String]", "payload": {"user": "eve"}}"#)
        .into_diagnostic()?;
    let updated = store.apply(&Action::from_wire(raw));
    println!("foreign scope -> updated {updated:?}");
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    init_miette();

    // cargo run -- [todo|scoped|wire]
    let which = std::env::args().nth(1).unwrap_or_else(|| "todo".to_string());
    match which.as_str() {
        "todo" => run_todo(),
        "scoped" => run_scoped(),
        "wire" => run_wire(),
        other => {
            println!("Unknown demo '{other}'. Available: todo, scoped, wire");
            Ok(())
        }
    }
}
