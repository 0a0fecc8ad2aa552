#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Annotations
//!
//! Free-form key/value metadata attached to a primitive container at
//! assembly time, for observability and telemetry. Immutable once the
//! container is frozen; never interpreted by the container itself.

use std::collections::BTreeMap;

/// Immutable observability metadata for a primitive container.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Annotations {
    entries: BTreeMap<String, String>,
}

impl Annotations {
    /// The empty annotation set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add or replace one entry, returning the updated set.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Look up one annotation value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterate all annotations in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of annotation entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no annotations are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for Annotations {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_annotations() {
        let a = Annotations::empty();
        assert!(a.is_empty());
        assert_eq!(a.len(), 0);
        assert_eq!(a.get("anything"), None);
    }

    #[test]
    fn with_adds_and_replaces() {
        let a = Annotations::empty().with("service", "billing").with("service", "payments");
        assert_eq!(a.len(), 1);
        assert_eq!(a.get("service"), Some("payments"));
    }

    #[test]
    fn iteration_is_key_ordered() {
        let a = Annotations::empty().with("b", "2").with("a", "1");
        let keys: Vec<&str> = a.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn serializes_to_json_object() {
        let a = Annotations::empty().with("env", "prod");
        let json = serde_json::to_string(&a).unwrap();
        assert!(json.contains("\"env\":\"prod\""));
    }
}
