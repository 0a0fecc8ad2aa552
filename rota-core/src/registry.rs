#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Primitive Constructor Registry
//!
//! A pluggable mapping from a key-descriptor type to the function that
//! builds a capability-typed primitive from it. Primitive families
//! register one constructor per key type they support; [`materialize`]
//! then walks a keyset, constructs one primitive per enabled key, and
//! assembles the frozen [`PrimitiveSet`] in a single pass.
//!
//! The container itself never constructs primitives — it only receives
//! what the registry produced.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use rota_types::{Annotations, KeyDescriptor, KeyStatus, Keyset};

use crate::error::CoreError;
use crate::primitive_set::PrimitiveSet;

type Constructor<P> = Box<dyn Fn(&dyn KeyDescriptor) -> Result<P, CoreError> + Send + Sync>;

/// Registry of primitive constructors for one capability type `P`.
pub struct PrimitiveRegistry<P> {
    constructors: HashMap<TypeId, Constructor<P>>,
}

impl<P> PrimitiveRegistry<P> {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { constructors: HashMap::new() }
    }

    /// Register the constructor for key-descriptor type `K`, replacing
    /// any previous registration for `K`.
    pub fn register<K, F>(&mut self, constructor: F)
    where
        K: KeyDescriptor,
        F: Fn(&K) -> Result<P, CoreError> + Send + Sync + 'static,
    {
        self.constructors.insert(
            TypeId::of::<K>(),
            Box::new(move |descriptor| {
                let key = descriptor
                    .as_any()
                    .downcast_ref::<K>()
                    .ok_or(CoreError::UnknownKeyType(descriptor.type_name()))?;
                constructor(key)
            }),
        );
    }

    /// Construct a primitive for one key descriptor.
    ///
    /// # Errors
    /// Returns [`CoreError::UnknownKeyType`] when no constructor is
    /// registered for the descriptor's type, or the constructor's own
    /// failure.
    pub fn create(&self, descriptor: &dyn KeyDescriptor) -> Result<P, CoreError> {
        let constructor = self
            .constructors
            .get(&descriptor.as_any().type_id())
            .ok_or(CoreError::UnknownKeyType(descriptor.type_name()))?;
        constructor(descriptor)
    }

    /// Number of registered key types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl<P> Default for PrimitiveRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> std::fmt::Debug for PrimitiveRegistry<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimitiveRegistry").field("key_types", &self.constructors.len()).finish()
    }
}

/// Materialize a keyset into a frozen primitive container.
///
/// Non-enabled keys are skipped — disabling a key upstream removes it
/// from the container on the next load without touching the others. The
/// key named by the keyset's primary id becomes the primary entry.
///
/// # Errors
/// Fails when a constructor is missing or fails, or when the keyset's
/// primary id names a key that is absent or not enabled.
pub fn materialize<P: Send + Sync + 'static>(
    keyset: &Keyset,
    registry: &PrimitiveRegistry<P>,
    annotations: Annotations,
) -> Result<PrimitiveSet<P>, CoreError> {
    let mut builder = PrimitiveSet::builder();
    builder.set_annotations(annotations)?;

    let mut primary_seen = false;
    for key in keyset.keys() {
        if key.metadata().status() != KeyStatus::Enabled {
            continue;
        }
        let primitive = registry.create(key.descriptor().as_ref())?;
        if keyset.primary_key_id() == Some(key.metadata().key_id()) {
            builder.add_primary(primitive, Arc::clone(key.descriptor()), *key.metadata())?;
            primary_seen = true;
        } else {
            builder.add(primitive, Arc::clone(key.descriptor()), *key.metadata())?;
        }
    }

    if let Some(primary_key_id) = keyset.primary_key_id() {
        if !primary_seen {
            return Err(CoreError::InvalidKeyset(format!(
                "primary key {primary_key_id} is missing or not enabled"
            )));
        }
    }

    tracing::debug!(
        keys = keyset.len(),
        entries = keyset.keys().iter().filter(|k| k.metadata().status() == KeyStatus::Enabled).count(),
        "materialized primitive set"
    );
    builder.build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rota_types::{KeyMetadata, KeysetKey, OutputPrefixVariant};

    use super::*;

    #[derive(Debug)]
    struct UpperKey(&'static str);

    impl KeyDescriptor for UpperKey {
        fn type_name(&self) -> &'static str {
            "UpperKey"
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[derive(Debug)]
    struct UnregisteredKey;

    impl KeyDescriptor for UnregisteredKey {
        fn type_name(&self) -> &'static str {
            "UnregisteredKey"
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    fn registry() -> PrimitiveRegistry<String> {
        let mut registry = PrimitiveRegistry::new();
        registry.register::<UpperKey, _>(|key| Ok(key.0.to_uppercase()));
        registry
    }

    fn keyset_key(name: &'static str, key_id: u32, status: KeyStatus) -> KeysetKey {
        KeysetKey::new(
            Arc::new(UpperKey(name)),
            KeyMetadata::new(key_id, status, OutputPrefixVariant::Tink),
        )
    }

    #[test]
    fn create_dispatches_on_descriptor_type() {
        let registry = registry();
        assert_eq!(registry.len(), 1);
        let primitive = registry.create(&UpperKey("aead")).unwrap();
        assert_eq!(primitive, "AEAD");
    }

    #[test]
    fn unknown_key_type_is_an_explicit_error() {
        let registry = registry();
        let err = registry.create(&UnregisteredKey).unwrap_err();
        assert_eq!(err, CoreError::UnknownKeyType("UnregisteredKey"));
    }

    #[test]
    fn constructor_failure_propagates() {
        let mut registry: PrimitiveRegistry<String> = PrimitiveRegistry::new();
        registry.register::<UpperKey, _>(|_| {
            Err(CoreError::ConstructorFailed("no usable primitive".to_string()))
        });
        let err = registry.create(&UpperKey("x")).unwrap_err();
        assert!(matches!(err, CoreError::ConstructorFailed(_)));
    }

    #[test]
    fn materialize_builds_container_with_primary() {
        let keyset = Keyset::new(
            vec![
                keyset_key("old", 1, KeyStatus::Enabled),
                keyset_key("new", 2, KeyStatus::Enabled),
            ],
            Some(2),
        );
        let set = materialize(&keyset, &registry(), Annotations::empty()).unwrap();

        assert_eq!(set.entries_in_keyset_order().len(), 2);
        let primary = set.primary().unwrap();
        assert_eq!(primary.key_id(), 2);
        assert_eq!(primary.primitive(), "NEW");
    }

    #[test]
    fn materialize_skips_disabled_keys() {
        let keyset = Keyset::new(
            vec![
                keyset_key("live", 1, KeyStatus::Enabled),
                keyset_key("retired", 2, KeyStatus::Disabled),
            ],
            Some(1),
        );
        let set = materialize(&keyset, &registry(), Annotations::empty()).unwrap();
        let ids: Vec<u32> = set.entries_in_keyset_order().iter().map(|e| e.key_id()).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn materialize_rejects_disabled_primary() {
        let keyset = Keyset::new(vec![keyset_key("retired", 2, KeyStatus::Disabled)], Some(2));
        let err = materialize(&keyset, &registry(), Annotations::empty()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidKeyset(_)));
    }

    #[test]
    fn materialize_carries_annotations() {
        let keyset = Keyset::new(vec![keyset_key("k", 1, KeyStatus::Enabled)], None);
        let annotations = Annotations::empty().with("origin", "kms");
        let set = materialize(&keyset, &registry(), annotations).unwrap();
        assert_eq!(set.annotations().get("origin"), Some("kms"));
    }
}
