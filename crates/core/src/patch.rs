//! Partial-update fields that can be cleared.
//!
//! A nullable column in a PATCH body has three states: absent (keep the
//! current value), `null` (clear it) and a value (set it). Such fields are
//! typed `Option<Option<T>>` and deserialized with [`nullable`]:
//!
//! ```ignore
//! #[serde(default, deserialize_with = "fabula_core::patch::nullable")]
//! pub synopsis: Option<Option<String>>,
//! ```
//!
//! Repositories bind the pair returned by [`split`] and write
//! `col = CASE WHEN $n THEN $m ELSE col END`.

use serde::{Deserialize, Deserializer};

/// Deserialize a present field (including `null`) as `Some(..)`.
///
/// Used together with `#[serde(default)]`, which yields `None` when the
/// field is absent.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Whether the field was provided, and the value to store if it was.
pub fn split<T>(field: &Option<Option<T>>) -> (bool, Option<&T>) {
    (field.is_some(), field.as_ref().and_then(Option::as_ref))
}
