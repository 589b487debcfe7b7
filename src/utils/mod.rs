//! Utilities shared across modules.
//!
//! - `json_ext`: non-mutating shallow and one-level JSON merges, plus the
//!   `JsonSerializable` round-trip trait used by the wire form.

pub mod json_ext;
