//! Action identity: payload stringification and type-tag encoding.
//!
//! A type tag reads `<prefix>/<namespace>[/<scope>]/<operation>/?<query>`.
//! It exists for logs and devtools, and as a fallback routing key when an
//! action crosses a boundary that drops its metadata. The query summarises
//! the payload's keys and scalar values but never the contents of strings,
//! arrays, objects, or functions.
//!
//! ```rust
//! use prim_slice::identity::{TypeDecoder, encode_type};
//! use prim_slice::payload::Payload;
//! use prim_slice::types::Scope;
//! use serde_json::json;
//!
//! let payload = Payload::from(json!({"a": 1, "b": "secret"}));
//! let tag = encode_type("@prim", "todo", Some(&Scope::from("u1")), "setState", &payload, None);
//! assert_eq!(tag, "@prim/todo/u1/setState/?a=1&b=[String]");
//!
//! let decoded = TypeDecoder::new("@prim", "todo").unwrap().decode(&tag).unwrap();
//! assert_eq!(decoded.scope.as_deref(), Some("u1"));
//! assert_eq!(decoded.operation, "setState");
//! ```

use regex::Regex;
use serde_json::Value;

use crate::errors::{Result, SliceError};
use crate::payload::{Payload, PayloadKind};
use crate::types::Scope;

/// Short descriptor of a payload: scalars verbatim, everything else as a
/// bracketed kind tag.
pub fn stringify(payload: &Payload) -> String {
    match payload {
        Payload::Absent => "undefined".to_string(),
        Payload::Value(value) => stringify_value(value),
        Payload::Function(_) => PayloadKind::Function.tag(),
    }
}

pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => PayloadKind::of_value(other).tag(),
    }
}

/// Query part of a type tag. An explicit intent replaces it verbatim.
pub fn querify(payload: &Payload, intent: Option<&str>) -> String {
    if let Some(intent) = intent {
        return intent.to_string();
    }
    match payload {
        Payload::Absent => String::new(),
        Payload::Value(Value::Object(map)) => map
            .iter()
            .map(|(key, value)| format!("{key}={}", stringify_value(value)))
            .collect::<Vec<_>>()
            .join("&"),
        other => stringify(other),
    }
}

/// Reason `segment` cannot be one path segment of a decodable type tag.
pub fn segment_violation(segment: &str) -> Option<&'static str> {
    if segment.is_empty() {
        Some("segment is empty")
    } else if segment.contains(['/', '?']) {
        Some("segment contains '/' or '?'")
    } else {
        None
    }
}

fn path(prefix: &str, namespace: &str, scope: Option<&Scope>) -> String {
    match scope {
        Some(scope) => format!("{prefix}/{namespace}/{scope}"),
        None => format!("{prefix}/{namespace}"),
    }
}

/// Type tag of an updater action.
pub fn encode_type(
    prefix: &str,
    namespace: &str,
    scope: Option<&Scope>,
    operation: &str,
    payload: &Payload,
    intent: Option<&str>,
) -> String {
    format!(
        "{}/{operation}/?{}",
        path(prefix, namespace, scope),
        querify(payload, intent)
    )
}

/// Type tag of a raw action, which carries its own kind and no query.
pub fn encode_raw_type(prefix: &str, namespace: &str, scope: Option<&Scope>, kind: &str) -> String {
    format!("{}/{kind}", path(prefix, namespace, scope))
}

/// Identity recovered from a type tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedType {
    pub namespace: String,
    /// Scope segments always decode as strings.
    pub scope: Option<String>,
    pub operation: String,
    /// `None` for raw actions, which have no query part.
    pub query: Option<String>,
}

impl DecodedType {
    pub fn scope(&self) -> Option<Scope> {
        self.scope.as_deref().map(Scope::from)
    }
}

/// Namespace-anchored type-tag parser.
///
/// Scope and operation segments may not contain `/` or `?`; tags whose
/// path does not fit that shape do not decode.
#[derive(Clone, Debug)]
pub struct TypeDecoder {
    namespace: String,
    pattern: Regex,
}

impl TypeDecoder {
    pub fn new(prefix: &str, namespace: &str) -> Result<Self> {
        let source = format!(
            r"^{}/{}/(?:([^/?]+)/)?([^/?]+)(?:/\?(.*))?$",
            regex::escape(prefix),
            regex::escape(namespace)
        );
        let pattern = Regex::new(&source).map_err(|source| SliceError::Pattern {
            namespace: namespace.to_string(),
            source,
        })?;
        Ok(Self {
            namespace: namespace.to_string(),
            pattern,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn decode(&self, type_tag: &str) -> Option<DecodedType> {
        let caps = self.pattern.captures(type_tag)?;
        Some(DecodedType {
            namespace: self.namespace.clone(),
            scope: caps.get(1).map(|m| m.as_str().to_string()),
            operation: caps.get(2)?.as_str().to_string(),
            query: caps.get(3).map(|m| m.as_str().to_string()),
        })
    }
}
