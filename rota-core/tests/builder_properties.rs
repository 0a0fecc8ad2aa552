//! Property tests for the assembly step's invariants: at most one
//! primary, rejected adds leave no trace, enumeration order equals
//! insertion order, and prefix buckets partition the entry set.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use proptest::prelude::*;
use rota_core::{CoreError, PrimitiveSet};
use rota_types::{KeyDescriptor, KeyMetadata, KeyStatus, OutputPrefixVariant};

#[derive(Debug)]
struct TestKey;

impl KeyDescriptor for TestKey {
    fn type_name(&self) -> &'static str {
        "TestKey"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

fn variant_strategy() -> impl Strategy<Value = OutputPrefixVariant> {
    prop_oneof![
        Just(OutputPrefixVariant::Tink),
        Just(OutputPrefixVariant::Crunchy),
        Just(OutputPrefixVariant::Legacy),
        Just(OutputPrefixVariant::Raw),
    ]
}

fn status_strategy() -> impl Strategy<Value = KeyStatus> {
    prop_oneof![
        3 => Just(KeyStatus::Enabled),
        1 => Just(KeyStatus::Disabled),
        1 => Just(KeyStatus::Destroyed),
    ]
}

proptest! {
    #[test]
    fn builder_invariants_hold_for_arbitrary_sequences(
        keys in prop::collection::vec(
            (any::<u32>(), variant_strategy(), status_strategy(), any::<bool>()),
            0..32,
        )
    ) {
        let mut builder = PrimitiveSet::<u32>::builder();
        let mut accepted: Vec<u32> = Vec::new();
        let mut primary_id: Option<u32> = None;

        for (key_id, variant, status, as_primary) in keys {
            let metadata = KeyMetadata::new(key_id, status, variant);
            let descriptor: Arc<dyn KeyDescriptor> = Arc::new(TestKey);
            let result = if as_primary {
                builder.add_primary(key_id, descriptor, metadata)
            } else {
                builder.add(key_id, descriptor, metadata)
            };

            match result {
                Ok(()) => {
                    accepted.push(key_id);
                    if as_primary {
                        prop_assert!(primary_id.is_none());
                        primary_id = Some(key_id);
                    }
                }
                Err(CoreError::KeyNotEnabled { .. }) => {
                    prop_assert_ne!(status, KeyStatus::Enabled);
                }
                Err(CoreError::DuplicatePrimary) => {
                    prop_assert!(as_primary && primary_id.is_some());
                }
                Err(other) => return Err(TestCaseError::fail(format!("unexpected: {other}"))),
            }
        }

        let set = builder.build().unwrap();

        // Enumeration order equals insertion order of accepted adds.
        let order: Vec<u32> = set.entries_in_keyset_order().iter().map(|e| *e.primitive()).collect();
        prop_assert_eq!(&order, &accepted);

        // At most one primary, and it is the first successfully-designated one.
        prop_assert_eq!(set.primary().map(|e| *e.primitive()), primary_id);
        let primaries = set.entries_in_keyset_order().iter().filter(|e| e.is_primary()).count();
        prop_assert!(primaries <= 1);

        // Buckets partition the same entries, preserving relative order.
        let bucketed: usize = set.prefix_groups().map(|(_, bucket)| bucket.len()).sum();
        prop_assert_eq!(bucketed, accepted.len());
        for (_, bucket) in set.prefix_groups() {
            let in_bucket: Vec<u32> = bucket.iter().map(|e| *e.primitive()).collect();
            let expected: Vec<u32> = set
                .entries_in_keyset_order()
                .iter()
                .filter(|e| e.output_prefix() == bucket[0].output_prefix())
                .map(|e| *e.primitive())
                .collect();
            prop_assert_eq!(in_bucket, expected);
        }
    }
}
