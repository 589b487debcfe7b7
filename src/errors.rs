use miette::Diagnostic;
use thiserror::Error;

use crate::payload::PayloadKind;

/// Errors raised while building slices or constructing actions.
///
/// Routing mismatches are never errors: a reducer that receives an action
/// meant for another namespace or scope simply returns its state unchanged.
#[derive(Debug, Error, Diagnostic)]
pub enum SliceError {
    /// The slice was built without a namespace.
    #[error("slice namespace is missing")]
    #[diagnostic(
        code(prim_slice::config::missing_namespace),
        help("Pass a non-empty namespace to SliceBuilder::new.")
    )]
    MissingNamespace,

    /// The namespace cannot be addressed through the type tag.
    #[error("invalid namespace '{namespace}': {reason}")]
    #[diagnostic(code(prim_slice::config::invalid_namespace))]
    InvalidNamespace {
        namespace: String,
        reason: &'static str,
    },

    /// The slice was built without a default state factory.
    #[error("default state is not defined for slice '{namespace}'")]
    #[diagnostic(
        code(prim_slice::config::missing_default_state),
        help("Call SliceBuilder::default_state before build.")
    )]
    MissingDefaultState { namespace: String },

    /// The scope cannot travel as one segment of a decodable type tag.
    #[error("invalid scope '{scope}' for slice '{namespace}': {reason}")]
    #[diagnostic(
        code(prim_slice::scope::invalid),
        help("Type-tag addressing needs a string or integer scope that is non-empty and free of '/' and '?'.")
    )]
    InvalidScope {
        namespace: String,
        scope: String,
        reason: &'static str,
    },

    /// A raw action kind names a registered updater.
    #[error("raw action kind '{kind}' is reserved by a registered updater of slice '{namespace}'")]
    #[diagnostic(
        code(prim_slice::registry::reserved_raw_kind),
        help("Build registered updaters with UpdaterActions::updater, or pick another kind.")
    )]
    ReservedRawKind { namespace: String, kind: String },

    /// A raw action kind cannot travel as one segment of a decodable type tag.
    #[error("invalid raw action kind '{kind}' for slice '{namespace}': {reason}")]
    #[diagnostic(code(prim_slice::identity::invalid_raw_kind))]
    InvalidRawKind {
        namespace: String,
        kind: String,
        reason: &'static str,
    },

    /// Two slices with the same namespace were installed into one store.
    #[error("a slice with namespace '{namespace}' is already installed")]
    #[diagnostic(code(prim_slice::config::duplicate_namespace))]
    DuplicateNamespace { namespace: String },

    /// A canonical constructor received a payload of the wrong kind.
    #[error("Unexpected {operation} payload type [object {kind}]")]
    #[diagnostic(code(prim_slice::payload::unexpected_kind))]
    UnexpectedPayload {
        operation: String,
        kind: PayloadKind,
    },

    /// An action was requested for an updater the registry does not know.
    #[error("updater '{name}' is not registered for slice '{namespace}'")]
    #[diagnostic(
        code(prim_slice::registry::unknown_updater),
        help("Register it with UpdaterRegistry::extend_updaters before building the slice.")
    )]
    UnknownUpdater { namespace: String, name: String },

    /// Protocol configuration could not be parsed.
    #[error("invalid protocol configuration: {source}")]
    #[diagnostic(code(prim_slice::config::parse))]
    Config {
        #[source]
        source: serde_json::Error,
    },

    /// The namespace-anchored type decoder could not be compiled.
    #[error("could not build type decoder for '{namespace}': {source}")]
    #[diagnostic(code(prim_slice::identity::pattern))]
    Pattern {
        namespace: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, SliceError>;
