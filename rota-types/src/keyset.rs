#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Keyset Value Model
//!
//! The already-parsed, already-validated view of a logical key collection
//! that the assembly step in `rota-core` consumes: an ordered sequence of
//! (descriptor, metadata) pairs plus the id of the key designated for new
//! output. Parsing, size/version validation, and (de)serialization of
//! keysets happen upstream and are out of scope here.

use std::sync::Arc;

use crate::key::{KeyDescriptor, KeyMetadata};

/// One key of a keyset: its descriptor plus metadata.
#[derive(Debug, Clone)]
pub struct KeysetKey {
    descriptor: Arc<dyn KeyDescriptor>,
    metadata: KeyMetadata,
}

impl KeysetKey {
    /// Pair a descriptor with its metadata.
    #[must_use]
    pub fn new(descriptor: Arc<dyn KeyDescriptor>, metadata: KeyMetadata) -> Self {
        Self { descriptor, metadata }
    }

    /// Shared, read-only handle to the key's descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &Arc<dyn KeyDescriptor> {
        &self.descriptor
    }

    /// The key's metadata.
    #[must_use]
    pub fn metadata(&self) -> &KeyMetadata {
        &self.metadata
    }
}

/// An ordered, immutable collection of keys with at most one designated
/// primary.
#[derive(Debug, Clone)]
pub struct Keyset {
    keys: Vec<KeysetKey>,
    primary_key_id: Option<u32>,
}

impl Keyset {
    /// Assemble a keyset from its keys and the primary key id, if any.
    ///
    /// Key-id uniqueness is an inherited invariant of the upstream
    /// keyset layer and is not re-checked here.
    #[must_use]
    pub fn new(keys: Vec<KeysetKey>, primary_key_id: Option<u32>) -> Self {
        Self { keys, primary_key_id }
    }

    /// The keys in their original keyset order.
    #[must_use]
    pub fn keys(&self) -> &[KeysetKey] {
        &self.keys
    }

    /// Id of the key designated for new-output operations, if any.
    #[must_use]
    pub fn primary_key_id(&self) -> Option<u32> {
        self.primary_key_id
    }

    /// Number of keys in the keyset.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True for a keyset with no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
