use serde::{Deserialize, Deserializer};

/// `#[serde(default, deserialize_with = "crate::de::or_default")]`
///
/// Collectors dump unknown values as `null`; those read the same as a
/// missing key.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
