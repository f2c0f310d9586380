//! Presence-aware deserialization for partial updates

use serde::{Deserialize, Deserializer};

/// Deserialize a key that was present in the payload.
///
/// Pair with `#[serde(default)]` on an `Option<Option<T>>` field: an absent
/// key stays `None`, `null` becomes `Some(None)` and a value `Some(Some(v))`.
pub fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
