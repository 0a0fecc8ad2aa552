#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Key Model
//!
//! The metadata every key in a keyset carries: a 32-bit id, a lifecycle
//! status, and the wire-format variant that determines its output prefix.
//! Concrete key material lives behind the [`KeyDescriptor`] trait so the
//! container layer never depends on any particular algorithm.

use std::any::Any;

/// Lifecycle status of a key within a keyset.
///
/// Only [`KeyStatus::Enabled`] keys may be materialized into a primitive
/// container; the assembly step rejects everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum KeyStatus {
    /// The key may be used for all operations.
    Enabled,
    /// The key is retained but must not be used.
    Disabled,
    /// The key material has been destroyed; only metadata remains.
    Destroyed,
}

/// Wire-format variant of a key, controlling the output prefix its
/// ciphertexts, tags, and signatures carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum OutputPrefixVariant {
    /// 5-byte prefix `0x01 || key_id` (big-endian).
    Tink,
    /// 5-byte prefix `0x00 || key_id` (big-endian).
    Crunchy,
    /// Same prefix as [`OutputPrefixVariant::Crunchy`]; MACs additionally
    /// authenticate a trailing `0x00` version byte.
    Legacy,
    /// No prefix at all.
    Raw,
}

/// Immutable per-key metadata: id, status, and prefix variant.
///
/// This is the already-validated tuple the keyset layer hands to the
/// assembly step; the container never re-validates key material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMetadata {
    key_id: u32,
    status: KeyStatus,
    variant: OutputPrefixVariant,
}

impl KeyMetadata {
    /// Create metadata for one key.
    #[must_use]
    pub fn new(key_id: u32, status: KeyStatus, variant: OutputPrefixVariant) -> Self {
        Self { key_id, status, variant }
    }

    /// The key's 32-bit identifier, unique within its keyset.
    #[must_use]
    pub fn key_id(&self) -> u32 {
        self.key_id
    }

    /// The key's lifecycle status.
    #[must_use]
    pub fn status(&self) -> KeyStatus {
        self.status
    }

    /// The key's wire-format variant.
    #[must_use]
    pub fn variant(&self) -> OutputPrefixVariant {
        self.variant
    }
}

/// An immutable value describing one cryptographic key's parameters and,
/// where relevant, its public or secret material.
///
/// Descriptors are produced by key parsing/validation (outside this
/// workspace) and consumed read-only by the container layer. The
/// [`as_any`](KeyDescriptor::as_any) hook lets primitive constructors
/// recover the concrete descriptor type they were registered for.
pub trait KeyDescriptor: std::fmt::Debug + Send + Sync + 'static {
    /// Stable name of the key type, used in registry error messages.
    fn type_name(&self) -> &'static str;

    /// Upcast to [`Any`] for constructor-side downcasting.
    fn as_any(&self) -> &dyn Any;
}
