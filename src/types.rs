use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

/// Canonical updater names as they appear in metadata and type tags.
pub mod names {
    pub const INIT_STATE: &str = "initState";
    pub const SET_STATE: &str = "setState";
    pub const MERGE_STATE: &str = "mergeState";

    pub const CANONICAL: [&str; 3] = [INIT_STATE, SET_STATE, MERGE_STATE];
}

/// The operation an action asks a slice to perform.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Init,
    Set,
    Merge,
    Custom(String),
}

impl Operation {
    pub fn from_name(name: &str) -> Self {
        match name {
            names::INIT_STATE => Operation::Init,
            names::SET_STATE => Operation::Set,
            names::MERGE_STATE => Operation::Merge,
            other => Operation::Custom(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Operation::Init => names::INIT_STATE,
            Operation::Set => names::SET_STATE,
            Operation::Merge => names::MERGE_STATE,
            Operation::Custom(name) => name,
        }
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, Operation::Custom(_))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque scope identity. Two symbols are the same instance only if they
/// were created by the same [`Symbol::new`] call.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    #[serde(rename = "symbol")]
    id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Symbol {
    pub fn new(description: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.map(str::to_string),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Identifies one instance among slices that share a namespace.
///
/// Strings and numbers compare by their rendered form, so a scope decoded
/// from a type tag (always a string) matches the numeric scope it was
/// encoded from. Symbols compare by identity only.
///
/// ```rust
/// use prim_slice::types::Scope;
///
/// assert!(Scope::from(7).same_instance(&Scope::from("7")));
/// assert!(!Scope::from("u1").same_instance(&Scope::from("u2")));
/// let sym = Scope::symbol("session");
/// assert!(sym.same_instance(&sym.clone()));
/// assert!(!sym.same_instance(&Scope::symbol("session")));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scope {
    Num(i64),
    Str(String),
    Symbol(Symbol),
}

impl Scope {
    /// Creates a fresh opaque scope.
    pub fn symbol(description: &str) -> Self {
        Scope::Symbol(Symbol::new(Some(description)))
    }

    pub fn same_instance(&self, other: &Scope) -> bool {
        match (self, other) {
            (Scope::Symbol(a), Scope::Symbol(b)) => a.id == b.id,
            (Scope::Symbol(_), _) | (_, Scope::Symbol(_)) => false,
            (a, b) => a.to_string() == b.to_string(),
        }
    }

    /// Representation stored under the reserved scope field of a state.
    pub fn to_value(&self) -> Value {
        match self {
            Scope::Num(n) => Value::from(*n),
            Scope::Str(s) => Value::String(s.clone()),
            Scope::Symbol(sym) => match &sym.description {
                Some(desc) => json!({"symbol": sym.id.to_string(), "description": desc}),
                None => json!({"symbol": sym.id.to_string()}),
            },
        }
    }

    /// Reads a bound scope back out of a state field; `null` means unbound.
    pub fn from_value(value: &Value) -> Option<Scope> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(Scope::Str(s.clone())),
            Value::Number(n) => Some(n.as_i64().map_or_else(|| Scope::Str(n.to_string()), Scope::Num)),
            Value::Bool(b) => Some(Scope::Str(b.to_string())),
            Value::Object(_) => serde_json::from_value::<Symbol>(value.clone())
                .ok()
                .map(Scope::Symbol),
            Value::Array(_) => None,
        }
    }
}

/// Segment written into type tags.
impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Num(n) => write!(f, "{n}"),
            Scope::Str(s) => f.write_str(s),
            Scope::Symbol(sym) => write!(f, "Symbol({})", sym.description.as_deref().unwrap_or("")),
        }
    }
}

impl From<&str> for Scope {
    fn from(s: &str) -> Self {
        Scope::Str(s.to_string())
    }
}

impl From<String> for Scope {
    fn from(s: String) -> Self {
        Scope::Str(s)
    }
}

impl From<i64> for Scope {
    fn from(n: i64) -> Self {
        Scope::Num(n)
    }
}

impl From<i32> for Scope {
    fn from(n: i32) -> Self {
        Scope::Num(i64::from(n))
    }
}

impl From<Symbol> for Scope {
    fn from(sym: Symbol) -> Self {
        Scope::Symbol(sym)
    }
}
