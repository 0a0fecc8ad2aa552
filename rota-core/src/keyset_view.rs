#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Capability-Erased Keyset View
//!
//! Key-rotation tooling and key-usage auditing need to walk the entries
//! of any primitive container — how many, which is primary, what id and
//! status each has — without being generic over the container's
//! capability type. [`KeysetView`] is that read-only positional surface,
//! and [`KeysetEntry`] the erased per-entry handle it hands out.
//!
//! Narrowing an erased entry back to its concrete primitive happens
//! through [`PrimitiveSet::primitive_for_entry`], a single explicit,
//! fallible downcast — never an implicit cast.
//!
//! [`PrimitiveSet::primitive_for_entry`]: crate::PrimitiveSet::primitive_for_entry

use std::any::Any;

use rota_types::{KeyDescriptor, KeyStatus, OutputPrefix};

use crate::error::CoreError;
use crate::primitive_set::Entry;

/// A capability-erased handle to one container entry.
pub trait KeysetEntry: Send + Sync {
    /// The key's 32-bit id.
    fn key_id(&self) -> u32;

    /// The key's status; always enabled in this layer.
    fn status(&self) -> KeyStatus;

    /// True for the entry designated for new-output operations.
    fn is_primary(&self) -> bool;

    /// The wire-format tag of this key's outputs.
    fn output_prefix(&self) -> &OutputPrefix;

    /// The originating key's descriptor.
    fn descriptor(&self) -> &dyn KeyDescriptor;

    /// Upcast for the explicit capability downcast.
    fn as_any(&self) -> &dyn Any;
}

impl std::fmt::Debug for dyn KeysetEntry + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeysetEntry")
            .field("key_id", &self.key_id())
            .field("status", &self.status())
            .field("is_primary", &self.is_primary())
            .field("output_prefix", &self.output_prefix())
            .field("descriptor", &self.descriptor())
            .finish()
    }
}

impl<P: Send + Sync + 'static> KeysetEntry for Entry<P> {
    fn key_id(&self) -> u32 {
        Entry::key_id(self)
    }

    fn status(&self) -> KeyStatus {
        Entry::status(self)
    }

    fn is_primary(&self) -> bool {
        Entry::is_primary(self)
    }

    fn output_prefix(&self) -> &OutputPrefix {
        Entry::output_prefix(self)
    }

    fn descriptor(&self) -> &dyn KeyDescriptor {
        Entry::descriptor(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Read-only positional view over a frozen primitive container.
pub trait KeysetView: Send + Sync {
    /// Number of entries in the container.
    fn len(&self) -> usize;

    /// True for a container with no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The entry at position `index` in original keyset order.
    ///
    /// # Errors
    /// Returns [`CoreError::IndexOutOfRange`] for out-of-range indices.
    fn entry_at(&self, index: usize) -> Result<&dyn KeysetEntry, CoreError>;

    /// The designated primary entry, if one was set.
    fn primary(&self) -> Option<&dyn KeysetEntry>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rota_types::{KeyMetadata, OutputPrefixVariant};

    use super::*;
    use crate::primitive_set::PrimitiveSet;

    #[derive(Debug)]
    struct TestKey;

    impl KeyDescriptor for TestKey {
        fn type_name(&self) -> &'static str {
            "TestKey"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn build_set() -> PrimitiveSet<String> {
        let mut builder = PrimitiveSet::<String>::builder();
        builder
            .add(
                "one".to_string(),
                Arc::new(TestKey),
                KeyMetadata::new(1, KeyStatus::Enabled, OutputPrefixVariant::Tink),
            )
            .unwrap();
        builder
            .add_primary(
                "two".to_string(),
                Arc::new(TestKey),
                KeyMetadata::new(2, KeyStatus::Enabled, OutputPrefixVariant::Raw),
            )
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn view_walks_entries_without_knowing_the_capability() {
        let set = build_set();
        let view: &dyn KeysetView = set.keyset_view();

        assert_eq!(view.len(), 2);
        assert!(!view.is_empty());
        assert_eq!(view.entry_at(0).unwrap().key_id(), 1);
        assert_eq!(view.entry_at(1).unwrap().key_id(), 2);
        assert!(view.entry_at(1).unwrap().is_primary());
        assert_eq!(view.primary().unwrap().key_id(), 2);
    }

    #[test]
    fn out_of_range_access_is_an_explicit_error() {
        let set = build_set();
        let err = set.keyset_view().entry_at(2).unwrap_err();
        assert_eq!(err, CoreError::IndexOutOfRange { index: 2, size: 2 });
    }

    #[test]
    fn erased_entry_exposes_prefix_and_descriptor() {
        let set = build_set();
        let entry = set.keyset_view().entry_at(0).unwrap();
        assert_eq!(entry.output_prefix().len(), 5);
        assert_eq!(entry.status(), KeyStatus::Enabled);
        assert_eq!(entry.descriptor().type_name(), "TestKey");
    }

    #[test]
    fn empty_container_view() {
        let mut builder = PrimitiveSet::<String>::builder();
        let set = builder.build().unwrap();
        let view = set.keyset_view();
        assert!(view.is_empty());
        assert!(view.primary().is_none());
        assert!(view.entry_at(0).is_err());
    }
}
