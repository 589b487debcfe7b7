//! Protocol configuration shared by the action factory and slice reducers.
//!
//! The defaults reproduce the canonical wire shape: type tags start with
//! `@prim`, the bound scope lives under `@signer`, and reducers route on
//! metadata only. Deployments whose transport drops `meta` switch the
//! addressing mode to [`Addressing::MetaOrTypeTag`].

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SliceError};

pub const DEFAULT_TYPE_PREFIX: &str = "@prim";
pub const DEFAULT_SCOPE_FIELD: &str = "@signer";

/// How a reducer recovers the target of an action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Addressing {
    /// Actions without metadata are ignored. The type tag is only decoded
    /// when metadata lacks an updater name.
    #[default]
    MetaOnly,
    /// Actions without metadata are routed by decoding the type tag.
    MetaOrTypeTag,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Leading segment of every generated type tag.
    pub type_prefix: String,
    /// Reserved state field holding the bound scope.
    pub scope_field: String,
    pub addressing: Addressing,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            type_prefix: DEFAULT_TYPE_PREFIX.to_string(),
            scope_field: DEFAULT_SCOPE_FIELD.to_string(),
            addressing: Addressing::MetaOnly,
        }
    }
}

impl ProtocolConfig {
    pub fn new(
        type_prefix: impl Into<String>,
        scope_field: impl Into<String>,
        addressing: Addressing,
    ) -> Self {
        Self {
            type_prefix: type_prefix.into(),
            scope_field: scope_field.into(),
            addressing,
        }
    }

    /// Parses a configuration document; missing fields take their defaults.
    ///
    /// ```rust
    /// use prim_slice::config::{Addressing, ProtocolConfig};
    ///
    /// let config = ProtocolConfig::from_json_str(r#"{"addressing": "meta_or_type_tag"}"#).unwrap();
    /// assert_eq!(config.addressing, Addressing::MetaOrTypeTag);
    /// assert_eq!(config.type_prefix, "@prim");
    /// ```
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|source| SliceError::Config { source })
    }

    #[must_use]
    pub fn with_type_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.type_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_scope_field(mut self, field: impl Into<String>) -> Self {
        self.scope_field = field.into();
        self
    }

    #[must_use]
    pub fn with_addressing(mut self, addressing: Addressing) -> Self {
        self.addressing = addressing;
        self
    }

    /// True when reducers must be able to route from the type tag alone.
    pub fn decodes_type_tags(&self) -> bool {
        self.addressing == Addressing::MetaOrTypeTag
    }
}
