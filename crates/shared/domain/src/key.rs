use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Namespace assumed when a key is written without one (`"item_stack"`).
pub const SPONGE_NAMESPACE: &str = "sponge";

const SEPARATOR: char = ':';

/// Stable `namespace:value` identifier of a serializable type or registration.
///
/// Cloning is cheap: both parts are reference counted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceKey {
    namespace: Arc<str>,
    value: Arc<str>,
}

/// Returned when a string is not a valid [`ResourceKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidResourceKey {
    pub input: String,
    pub reason: &'static str,
}

impl fmt::Display for InvalidResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid resource key '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for InvalidResourceKey {}

impl ResourceKey {
    /// Builds a key from its two parts. Both are lower-cased and validated.
    ///
    /// # Errors
    /// Returns [`InvalidResourceKey`] if either part is empty or contains characters
    /// outside `[a-z0-9_.-/]`.
    pub fn new(namespace: &str, value: &str) -> Result<Self, InvalidResourceKey> {
        let namespace = normalize(namespace, "namespace")?;
        let value = normalize(value, "value")?;
        Ok(Self { namespace: namespace.into(), value: value.into() })
    }

    /// Shorthand for a key in the [`SPONGE_NAMESPACE`].
    ///
    /// # Errors
    /// See [`ResourceKey::new`].
    pub fn sponge(value: &str) -> Result<Self, InvalidResourceKey> {
        Self::new(SPONGE_NAMESPACE, value)
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

fn normalize(part: &str, which: &'static str) -> Result<String, InvalidResourceKey> {
    let lowered = part.to_lowercase();
    if lowered.is_empty() {
        return Err(InvalidResourceKey {
            input: part.to_owned(),
            reason: if which == "namespace" { "empty namespace" } else { "empty value" },
        });
    }
    if !lowered.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '/')) {
        return Err(InvalidResourceKey { input: part.to_owned(), reason: "illegal characters" });
    }
    Ok(lowered)
}

impl TryFrom<&str> for ResourceKey {
    type Error = InvalidResourceKey;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        match raw.split_once(SEPARATOR) {
            Some((namespace, value)) => Self::new(namespace, value).map_err(|mut e| {
                e.input = raw.to_owned();
                e
            }),
            None => Self::sponge(raw),
        }
    }
}

impl TryFrom<String> for ResourceKey {
    type Error = InvalidResourceKey;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::try_from(raw.as_str())
    }
}

impl From<ResourceKey> for String {
    fn from(key: ResourceKey) -> Self {
        key.to_string()
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.namespace, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_namespaced_and_bare_keys() {
        let key = ResourceKey::try_from("minecraft:item_stack").unwrap();
        assert_eq!(key.namespace(), "minecraft");
        assert_eq!(key.value(), "item_stack");

        let bare = ResourceKey::try_from("Player_Data").unwrap();
        assert_eq!(bare.to_string(), "sponge:player_data");
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!(ResourceKey::try_from(":value").is_err());
        assert!(ResourceKey::try_from("ns:").is_err());

        let err = ResourceKey::try_from("ns:has space").unwrap_err();
        assert_eq!(err.input, "ns:has space");
        assert_eq!(err.reason, "illegal characters");
    }
}
