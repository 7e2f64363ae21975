//! Helpers for partial-update payloads.
//!
//! A PATCH body distinguishes three states per optional field: key absent
//! (keep the stored value), key present with `null` (clear it), and key present
//! with a value (replace it). Those map to `None`, `Some(None)` and
//! `Some(Some(v))` of an `Option<Option<T>>` field declared as
//!
//! ```ignore
//! #[serde(default, deserialize_with = "mediatrack_core::patch::nullable")]
//! pub plot: Option<Option<String>>,
//! ```

use serde::{Deserialize, Deserializer};

/// Deserialize a present key into `Some(..)`, keeping `null` as `Some(None)`.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Split a tri-state field into the `(provided, value)` pair bound by
/// `CASE WHEN $n THEN $m ELSE col END` updates.
pub fn split<T>(field: &Option<Option<T>>) -> (bool, Option<&T>) {
    match field {
        None => (false, None),
        Some(inner) => (true, inner.as_ref()),
    }
}
