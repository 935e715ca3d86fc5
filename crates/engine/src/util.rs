//! Internal helpers for model conversion.
//!
//! These utilities are **not** part of the public API. They centralize the
//! mapping between stored GUID strings and typed ids so every entity converts
//! the same way.

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Parse a GUID from storage and return a labeled error on failure.
///
/// The ledger stores GUIDs as 32 lowercase hex digits without dashes, which
/// `Uuid` reads as its "simple" form.
pub(crate) fn parse_guid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| EngineError::InvalidId(format!("invalid {label} guid: {value}")))
}

/// Parse a nullable GUID column. Empty strings count as absent.
pub(crate) fn parse_optional_guid(value: Option<&str>, label: &str) -> ResultEngine<Option<Uuid>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_guid(raw, label).map(Some),
    }
}

/// Storage form of an id.
pub(crate) fn guid_string(id: Uuid) -> String {
    id.simple().to_string()
}

/// Text columns declared `NOT NULL` use `''` for "no value".
pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
