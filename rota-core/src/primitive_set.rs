#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Primitive Container
//!
//! [`PrimitiveSet`] holds one constructed primitive per enabled key of a
//! keyset and is the data structure every primitive family is built on.
//! Entries are indexed two ways: a map from output prefix to the ordered
//! list of entries sharing that prefix (the verify/decrypt candidate
//! index), and a single list in original keyset order (positional
//! enumeration). At most one entry is the primary, used for new-output
//! operations.
//!
//! Assembly happens once, sequentially, through
//! [`PrimitiveSetBuilder`]; after [`build`](PrimitiveSetBuilder::build)
//! the container is frozen and may be read concurrently without
//! synchronization.
//!
//! The prefix itself is computed by the pure rule in
//! [`rota_types::prefix`] — this module treats prefixes as opaque byte
//! keys and performs no variant-specific branching.

use std::collections::HashMap;
use std::sync::Arc;

use rota_types::{output_prefix, Annotations, KeyDescriptor, KeyMetadata, KeyStatus, OutputPrefix};

use crate::error::CoreError;
use crate::keyset_view::{KeysetEntry, KeysetView};

/// One enabled key's materialized primitive, with the metadata the
/// container needs to index and enumerate it.
///
/// Entries are immutable and only ever created by the builder.
pub struct Entry<P> {
    primitive: P,
    descriptor: Arc<dyn KeyDescriptor>,
    output_prefix: OutputPrefix,
    metadata: KeyMetadata,
    is_primary: bool,
}

// Manual impl: primitives (e.g. `Box<dyn Aead>`) need not be `Debug`,
// and key material must never be printed.
impl<P> std::fmt::Debug for Entry<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("descriptor", &self.descriptor)
            .field("output_prefix", &self.output_prefix)
            .field("metadata", &self.metadata)
            .field("is_primary", &self.is_primary)
            .finish_non_exhaustive()
    }
}

impl<P> Entry<P> {
    fn new(
        primitive: P,
        descriptor: Arc<dyn KeyDescriptor>,
        output_prefix: OutputPrefix,
        metadata: KeyMetadata,
        is_primary: bool,
    ) -> Self {
        Self { primitive, descriptor, output_prefix, metadata, is_primary }
    }

    /// The constructed primitive for this key.
    #[must_use]
    pub fn primitive(&self) -> &P {
        &self.primitive
    }

    /// The originating key's descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &dyn KeyDescriptor {
        self.descriptor.as_ref()
    }

    /// The wire-format tag this key's outputs carry (empty for raw keys).
    #[must_use]
    pub fn output_prefix(&self) -> &OutputPrefix {
        &self.output_prefix
    }

    /// The originating key's metadata.
    #[must_use]
    pub fn metadata(&self) -> &KeyMetadata {
        &self.metadata
    }

    /// The key's 32-bit id.
    #[must_use]
    pub fn key_id(&self) -> u32 {
        self.metadata.key_id()
    }

    /// The key's status; always [`KeyStatus::Enabled`] in this layer.
    #[must_use]
    pub fn status(&self) -> KeyStatus {
        self.metadata.status()
    }

    /// True for the entry designated for new-output operations.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }
}

/// An immutable container of primitives corresponding to the keys of a
/// keyset.
///
/// Created only by [`PrimitiveSetBuilder::build`]. Shared via
/// [`Arc`] by every primitive wrapper that captures it; all accessors
/// are non-mutating and safe for unlimited concurrent callers.
pub struct PrimitiveSet<P> {
    /// Prefix → entries sharing that prefix, in insertion order. All raw
    /// keys share the empty prefix, so raw candidates are one lookup too.
    entries: HashMap<OutputPrefix, Vec<Arc<Entry<P>>>>,
    /// All entries in original keyset order.
    entries_in_keyset_order: Vec<Arc<Entry<P>>>,
    primary: Option<Arc<Entry<P>>>,
    annotations: Annotations,
}

// Manual impl so the container is `Debug` for any primitive type,
// including trait objects; see the note on `Entry`'s impl.
impl<P> std::fmt::Debug for PrimitiveSet<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimitiveSet")
            .field("entries", &self.entries)
            .field("entries_in_keyset_order", &self.entries_in_keyset_order)
            .field("primary", &self.primary)
            .field("annotations", &self.annotations)
            .finish()
    }
}

impl<P> PrimitiveSet<P> {
    /// Start a new single-use assembly step.
    #[must_use]
    pub fn builder() -> PrimitiveSetBuilder<P> {
        PrimitiveSetBuilder::new()
    }

    /// The designated primary entry, if one was set.
    #[must_use]
    pub fn primary(&self) -> Option<&Entry<P>> {
        self.primary.as_deref()
    }

    /// All entries in original keyset order.
    #[must_use]
    pub fn entries_in_keyset_order(&self) -> &[Arc<Entry<P>>] {
        &self.entries_in_keyset_order
    }

    /// The candidate entries whose outputs start with `prefix`, in
    /// insertion order. Empty when no key uses that prefix.
    #[must_use]
    pub fn entries_for_prefix(&self, prefix: &[u8]) -> &[Arc<Entry<P>>] {
        self.entries.get(prefix).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The entries of raw (unprefixed) keys, the fallback candidates on
    /// the verify/decrypt path.
    #[must_use]
    pub fn raw_entries(&self) -> &[Arc<Entry<P>>] {
        self.entries_for_prefix(&[])
    }

    /// Iterate every (prefix, bucket) group.
    pub fn prefix_groups(&self) -> impl Iterator<Item = (&OutputPrefix, &[Arc<Entry<P>>])> {
        self.entries.iter().map(|(prefix, bucket)| (prefix, bucket.as_slice()))
    }

    /// Observability metadata attached at assembly time.
    #[must_use]
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

impl<P: Send + Sync + 'static> PrimitiveSet<P> {
    /// A capability-erased positional view over this container, for
    /// rotation and audit tooling that must not be generic over `P`.
    #[must_use]
    pub fn keyset_view(&self) -> &dyn KeysetView {
        self
    }

    /// Narrow a capability-erased entry back to this container's
    /// primitive type.
    ///
    /// This is the single, explicit downcast of the design: generic
    /// tooling walks entries through [`KeysetView`], and callers that
    /// need the actual primitive come back through here.
    ///
    /// # Errors
    /// Returns [`CoreError::WrongCapability`] if the entry was produced
    /// by a container of a different capability type.
    pub fn primitive_for_entry<'a>(
        &self,
        entry: &'a dyn KeysetEntry,
    ) -> Result<&'a P, CoreError> {
        entry
            .as_any()
            .downcast_ref::<Entry<P>>()
            .map(Entry::primitive)
            .ok_or(CoreError::WrongCapability)
    }
}

impl<P: Send + Sync + 'static> KeysetView for PrimitiveSet<P> {
    fn len(&self) -> usize {
        self.entries_in_keyset_order.len()
    }

    fn entry_at(&self, index: usize) -> Result<&dyn KeysetEntry, CoreError> {
        self.entries_in_keyset_order
            .get(index)
            .map(|entry| entry.as_ref() as &dyn KeysetEntry)
            .ok_or(CoreError::IndexOutOfRange { index, size: self.entries_in_keyset_order.len() })
    }

    fn primary(&self) -> Option<&dyn KeysetEntry> {
        self.primary.as_ref().map(|entry| entry.as_ref() as &dyn KeysetEntry)
    }
}

/// Single-use sequential assembly step for a [`PrimitiveSet`].
///
/// Not safe for concurrent use: construction happens once, at
/// keyset-load time, on one thread. Every `add` validates its inputs
/// before touching any state, so a rejected call leaves the builder
/// exactly as it was. [`build`](Self::build) freezes the accumulated
/// entries and invalidates the builder for further use.
#[derive(Debug)]
pub struct PrimitiveSetBuilder<P> {
    // None marks the builder as consumed by build().
    entries: Option<HashMap<OutputPrefix, Vec<Arc<Entry<P>>>>>,
    entries_in_keyset_order: Vec<Arc<Entry<P>>>,
    primary: Option<Arc<Entry<P>>>,
    annotations: Annotations,
}

impl<P> PrimitiveSetBuilder<P> {
    fn new() -> Self {
        Self {
            entries: Some(HashMap::new()),
            entries_in_keyset_order: Vec::new(),
            primary: None,
            annotations: Annotations::empty(),
        }
    }

    /// Add a non-primary entry for one enabled key.
    ///
    /// # Errors
    /// Returns [`CoreError::BuilderConsumed`] after `build()` and
    /// [`CoreError::KeyNotEnabled`] for a key whose status is not
    /// enabled.
    pub fn add(
        &mut self,
        primitive: P,
        descriptor: Arc<dyn KeyDescriptor>,
        metadata: KeyMetadata,
    ) -> Result<(), CoreError> {
        self.add_entry(primitive, descriptor, metadata, false)
    }

    /// Add the primary entry. Expected to be called at most once per
    /// assembly step.
    ///
    /// # Errors
    /// As [`add`](Self::add), plus [`CoreError::DuplicatePrimary`] if a
    /// primary was already designated; the first primary is retained.
    pub fn add_primary(
        &mut self,
        primitive: P,
        descriptor: Arc<dyn KeyDescriptor>,
        metadata: KeyMetadata,
    ) -> Result<(), CoreError> {
        self.add_entry(primitive, descriptor, metadata, true)
    }

    // The one validated path both entry points route through.
    fn add_entry(
        &mut self,
        primitive: P,
        descriptor: Arc<dyn KeyDescriptor>,
        metadata: KeyMetadata,
        as_primary: bool,
    ) -> Result<(), CoreError> {
        // Validate everything before mutating anything.
        let entries = self.entries.as_mut().ok_or(CoreError::BuilderConsumed)?;
        if metadata.status() != KeyStatus::Enabled {
            return Err(CoreError::KeyNotEnabled {
                key_id: metadata.key_id(),
                status: metadata.status(),
            });
        }
        if as_primary && self.primary.is_some() {
            return Err(CoreError::DuplicatePrimary);
        }

        let prefix = output_prefix(&metadata);
        let entry = Arc::new(Entry::new(primitive, descriptor, prefix.clone(), metadata, as_primary));

        entries.entry(prefix).or_default().push(Arc::clone(&entry));
        self.entries_in_keyset_order.push(Arc::clone(&entry));
        if as_primary {
            self.primary = Some(entry);
        }
        Ok(())
    }

    /// Replace the pending annotation metadata.
    ///
    /// # Errors
    /// Returns [`CoreError::BuilderConsumed`] after `build()`.
    pub fn set_annotations(&mut self, annotations: Annotations) -> Result<(), CoreError> {
        if self.entries.is_none() {
            return Err(CoreError::BuilderConsumed);
        }
        self.annotations = annotations;
        Ok(())
    }

    /// Freeze the accumulated state into an immutable [`PrimitiveSet`]
    /// and invalidate this builder.
    ///
    /// A primary is deliberately not required: containers used purely
    /// for verification or decryption have none, and new-output families
    /// enforce their own primary requirement at wrap time.
    ///
    /// # Errors
    /// Returns [`CoreError::BuilderConsumed`] on the second and every
    /// later call; the first call's output stays valid.
    pub fn build(&mut self) -> Result<PrimitiveSet<P>, CoreError> {
        let entries = self.entries.take().ok_or(CoreError::BuilderConsumed)?;
        Ok(PrimitiveSet {
            entries,
            entries_in_keyset_order: std::mem::take(&mut self.entries_in_keyset_order),
            primary: self.primary.take(),
            annotations: std::mem::take(&mut self.annotations),
        })
    }
}
