//! # prim-slice: namespaced state slices with self-describing actions
//!
//! A slice is one namespace of application state together with the action
//! creators that target it and the reducer that applies them. Every action
//! a slice produces carries a human-readable type tag and routing metadata,
//! so hosts and tooling can tell at a glance which slice, which scope, and
//! which update an action is for.
//!
//! ## Core Concepts
//!
//! - **Updaters**: named state transitions (`initState`, `setState`,
//!   `mergeState`, plus any registered extension)
//! - **Action factory**: validated constructors bound to one namespace
//! - **Reducer**: applies an action only when it targets this slice and,
//!   once bound, this slice's scope
//! - **Type tags**: `@prim/<namespace>[/<scope>]/<operation>/?<query>`
//!
//! ## Quick Start
//!
//! ```
//! use prim_slice::create_slice;
//! use serde_json::json;
//!
//! let todo = create_slice(
//!     "todo",
//!     || json!({"value1": "", "value2": 123}).as_object().cloned().unwrap_or_default(),
//!     |updaters| updaters,
//! )
//! .unwrap();
//!
//! let action = todo.actions().set_state(json!({"value1": "milk"})).unwrap();
//! assert_eq!(action.type_tag(), "@prim/todo/setState/?value1=[String]");
//!
//! let next = todo.reducer().reduce(None, &action);
//! assert_eq!(next.get("value1"), Some(&json!("milk")));
//! assert_eq!(next.get("value2"), Some(&json!(123)));
//! ```
//!
//! ### Scoped instances
//!
//! Scoped action creators bind a slice to one instance. After the first
//! accepted scoped action, actions for other scopes leave the state alone
//! until an `initState` rebinds it.
//!
//! ```
//! use std::sync::Arc;
//! use prim_slice::slice::SliceBuilder;
//! use serde_json::json;
//!
//! let wallet = SliceBuilder::new("wallet")
//!     .default_state_value(json!({"balance": 0}))
//!     .build(|updaters| updaters)
//!     .unwrap();
//!
//! let alice = wallet.scoped_actions("alice").unwrap();
//! let bob = wallet.scoped_actions("bob").unwrap();
//!
//! let state = wallet.reducer().reduce(None, &alice.set_state(json!({"balance": 5})).unwrap());
//! let after_bob = wallet.reducer().reduce(Some(&state), &bob.set_state(json!({"balance": 9})).unwrap());
//! assert!(Arc::ptr_eq(&state, &after_bob));
//! ```
//!
//! ### Error Handling
//!
//! Construction errors are [`SliceError`] values implementing
//! [`miette::Diagnostic`]; routing mismatches are never errors.
//!
//! ```
//! use prim_slice::{SliceError, create_slice, state::State};
//! use serde_json::json;
//!
//! let slice = create_slice("slice", State::new, |updaters| updaters).unwrap();
//! let err = slice.actions().merge_state(json!([])).unwrap_err();
//! assert!(matches!(err, SliceError::UnexpectedPayload { .. }));
//! ```
//!
//! ## Module Guide
//!
//! - [`slice`] - slice builder, action factory, reducer, and selector
//! - [`updaters`] - updater trait, canonical updaters, and the registry
//! - [`identity`] - payload stringification and type-tag encoding
//! - [`action`] - actions, metadata, and thunks
//! - [`wire`] - JSON form of actions for crossing boundaries
//! - [`store`] - minimal host store for tests and demos
//! - [`config`] - protocol configuration

pub mod action;
pub mod config;
pub mod errors;
pub mod identity;
pub mod payload;
pub mod slice;
pub mod state;
pub mod store;
pub mod types;
pub mod updaters;
pub mod utils;
pub mod wire;

pub use action::{Action, ActionMeta, Dispatchable, ThunkContext};
pub use config::{Addressing, ProtocolConfig};
pub use errors::SliceError;
pub use payload::{Payload, PayloadKind};
pub use slice::{Slice, SliceBuilder, SliceReducer, UpdaterActions, create_slice};
pub use store::Store;
pub use types::{Operation, Scope};
pub use updaters::{Updater, UpdaterRegistry, updater_fn};

#[cfg(test)]
mod test_end_to_end;
#[cfg(test)]
mod test_wire_boundary;
